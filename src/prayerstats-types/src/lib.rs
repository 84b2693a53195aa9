#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

mod prayer;
pub use prayer::{INTERVAL_SEQUENCE, Prayer};

mod error;
pub use error::RecordError;

mod record;
pub use record::{ClockTime, DayRecord, GregorianDate, HijriDate, HijriMonth, PrayerTime, Timings};

pub mod method;
pub use method::CalculationMethod;

pub mod provider;
pub use provider::{CalendarResponse, ingest};
