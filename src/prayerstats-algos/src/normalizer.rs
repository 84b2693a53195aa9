//! Maps a provider timing onto a single continuous clock for the year.
//!
//! The wall-clock reading of a timing is interpreted in a resolved zone and
//! measured as elapsed time since Jan 1 00:00 of the same year in that zone,
//! modulo one day. A DST transition therefore shifts the normalized value
//! instead of the series jumping by an hour, and every consumer (tables and
//! chart alike) sees the same number.

use chrono::{
    Datelike as _, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use chrono_tz::Tz;
use prayerstats_types::{ClockTime, DayRecord, GregorianDate, PrayerTime, RecordError};
use thiserror::Error;

use crate::helpers::time_math::{MINUTES_PER_DAY, hours_to_minutes};

/// Zone used when nothing else resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostZone {
    #[default]
    System,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedZone {
    Iana(Tz),
    Fixed(FixedOffset),
    Host(HostZone),
}

/// Zone resolution strategies, tried in [`ZoneStrategy::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneStrategy {
    MetaTimezone,
    OffsetHint,
    ZoneHint,
    HostLocal,
}

impl ZoneStrategy {
    pub const ORDER: [ZoneStrategy; 4] = [
        ZoneStrategy::MetaTimezone,
        ZoneStrategy::OffsetHint,
        ZoneStrategy::ZoneHint,
        ZoneStrategy::HostLocal,
    ];

    pub fn resolve(
        self,
        tz_hint: Option<&str>,
        meta_timezone: Option<&str>,
        host: HostZone,
    ) -> Option<ResolvedZone> {
        match self {
            ZoneStrategy::MetaTimezone => {
                let name = meta_timezone?;
                match name.parse::<Tz>() {
                    Ok(tz) => Some(ResolvedZone::Iana(tz)),
                    Err(_) => {
                        debug!("Unknown meta timezone `{}`", name);
                        None
                    }
                }
            }
            ZoneStrategy::OffsetHint => parse_offset_hint(tz_hint?).map(ResolvedZone::Fixed),
            ZoneStrategy::ZoneHint => {
                let hint = tz_hint.filter(|h| !h.is_empty())?;
                match hint.parse::<Tz>() {
                    Ok(tz) => Some(ResolvedZone::Iana(tz)),
                    Err(_) => {
                        debug!("Could not resolve timezone `{}`, using host zone", hint);
                        None
                    }
                }
            }
            ZoneStrategy::HostLocal => Some(ResolvedZone::Host(host)),
        }
    }
}

/// `+07` / `-02` style hints.
fn parse_offset_hint(hint: &str) -> Option<FixedOffset> {
    let bytes = hint.as_bytes();
    let [sign @ (b'+' | b'-'), tens, units] = bytes else {
        return None;
    };
    if !tens.is_ascii_digit() || !units.is_ascii_digit() {
        return None;
    }

    let hours = i32::from(tens - b'0') * 10 + i32::from(units - b'0');
    let seconds = hours * 3600;
    match *sign {
        b'+' => FixedOffset::east_opt(seconds),
        _ => FixedOffset::west_opt(seconds),
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Date(#[from] RecordError),
    #[error("local time {0} does not exist in the resolved zone")]
    NonexistentLocalTime(NaiveDateTime),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeNormalizer {
    host: HostZone,
}

impl TimeNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host_zone(host: HostZone) -> Self {
        Self { host }
    }

    pub fn resolve_zone(&self, tz_hint: Option<&str>, meta_timezone: Option<&str>) -> ResolvedZone {
        ZoneStrategy::ORDER
            .iter()
            .find_map(|strategy| strategy.resolve(tz_hint, meta_timezone, self.host))
            .unwrap_or(ResolvedZone::Host(self.host))
    }

    /// Normalized decimal hour in `[0, 24)` for a raw `HH:MM` string.
    ///
    /// Only an unreadable clock string is an error; zone and date problems
    /// fall back to the wall-clock reading.
    pub fn normalize(
        &self,
        time: &str,
        tz_hint: Option<&str>,
        date: &str,
        meta_timezone: Option<&str>,
    ) -> Result<f64, RecordError> {
        let clock = time.parse::<ClockTime>()?;
        Ok(self.normalize_clock(clock, tz_hint, date, meta_timezone))
    }

    pub fn normalize_clock(
        &self,
        clock: ClockTime,
        tz_hint: Option<&str>,
        date: &str,
        meta_timezone: Option<&str>,
    ) -> f64 {
        let zone = self.resolve_zone(tz_hint, meta_timezone);
        match Self::elapsed_in_zone(zone, clock, date) {
            Ok(minutes) => minutes as f64 / 60.0,
            Err(error) => {
                warn!(
                    "Error normalizing time {} with timezone {:?} for date {}: {}. Using wall clock.",
                    clock, tz_hint, date, error
                );
                clock.decimal_hours()
            }
        }
    }

    pub fn normalize_timing(&self, record: &DayRecord, timing: &PrayerTime) -> f64 {
        self.normalize_clock(
            timing.clock,
            timing.tz_hint.as_deref(),
            &record.gregorian.date,
            record.meta_timezone.as_deref(),
        )
    }

    /// Normalized minutes since the start of the normalized day.
    pub fn minutes(&self, record: &DayRecord, timing: &PrayerTime) -> i64 {
        hours_to_minutes(self.normalize_timing(record, timing))
    }

    fn elapsed_in_zone(zone: ResolvedZone, clock: ClockTime, date: &str) -> Result<i64, NormalizeError> {
        let date = GregorianDate::new(date).parse()?;
        let time = NaiveTime::from_hms_opt(clock.hour, clock.minute, 0)
            .ok_or_else(|| RecordError::InvalidClock(clock.to_string()))?;

        match zone {
            ResolvedZone::Iana(tz) => elapsed_since_year_start(&tz, date, time),
            ResolvedZone::Fixed(offset) => elapsed_since_year_start(&offset, date, time),
            ResolvedZone::Host(HostZone::System) => elapsed_since_year_start(&Local, date, time),
            ResolvedZone::Host(HostZone::Fixed(offset)) => {
                elapsed_since_year_start(&offset, date, time)
            }
        }
    }
}

/// Minutes between Jan 1 00:00 and `date time`, both local to `zone`,
/// reduced into one day.
fn elapsed_since_year_start<Z: TimeZone>(
    zone: &Z,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<i64, NormalizeError> {
    let year_start = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| RecordError::InvalidDate(date.to_string()))?;

    let reference = localize(zone, year_start)?;
    let actual = localize(zone, date.and_time(time))?;

    Ok((actual - reference).num_minutes().rem_euclid(MINUTES_PER_DAY))
}

fn localize<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Result<chrono::DateTime<Z>, NormalizeError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(NormalizeError::NonexistentLocalTime(local)),
    }
}
