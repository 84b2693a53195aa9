use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("invalid clock time `{0}`, expected HH:MM")]
    InvalidClock(String),
    #[error("invalid gregorian date `{0}`, expected DD-MM-YYYY")]
    InvalidDate(String),
    #[error("record has no gregorian date")]
    MissingDate,
    #[error("record has no usable timings")]
    NoTimings,
    #[error("unknown calculation method `{0}`")]
    UnknownMethod(String),
}
