use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use chrono::NaiveDate;

use crate::{Prayer, RecordError};

/// Wall-clock reading of a provider timing, always within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn decimal_hours(self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0
    }

    pub fn minutes(self) -> i64 {
        i64::from(self.hour * 60 + self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecordError::InvalidClock(s.to_owned());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A single timing as delivered by the provider, e.g. `05:47 (EEST)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTime {
    pub raw: String,
    pub clock: ClockTime,
    pub tz_hint: Option<String>,
}

impl FromStr for PrayerTime {
    type Err = RecordError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split_whitespace();
        let clock = parts
            .next()
            .ok_or_else(|| RecordError::InvalidClock(raw.to_owned()))?
            .parse()?;

        let tz_hint = parts.next().map(|tz| {
            tz.strip_prefix('(')
                .and_then(|tz| tz.strip_suffix(')'))
                .unwrap_or(tz)
                .to_owned()
        });

        Ok(Self {
            raw: raw.to_owned(),
            clock,
            tz_hint: tz_hint.filter(|tz| !tz.is_empty()),
        })
    }
}

pub type Timings = BTreeMap<Prayer, PrayerTime>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GregorianDate {
    /// `DD-MM-YYYY`
    pub date: String,
    pub readable: Option<String>,
}

impl GregorianDate {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            readable: None,
        }
    }

    pub fn parse(&self) -> Result<NaiveDate, RecordError> {
        NaiveDate::parse_from_str(&self.date, "%d-%m-%Y")
            .map_err(|_| RecordError::InvalidDate(self.date.clone()))
    }

    pub fn display(&self) -> &str {
        self.readable.as_deref().unwrap_or(&self.date)
    }

    /// `YYYY-MM-DD`, lexically ordered. Malformed dates sort by their raw text.
    pub fn sort_key(&self) -> String {
        match self.parts() {
            Some([day, month, year]) => format!("{year}-{month}-{day}"),
            None => self.date.clone(),
        }
    }

    /// `(year, month)` as written in the date string.
    pub fn month_key(&self) -> Option<(&str, &str)> {
        self.parts().map(|[_, month, year]| (year, month))
    }

    fn parts(&self) -> Option<[&str; 3]> {
        let mut parts = self.date.split('-');
        let day = parts.next()?;
        let month = parts.next()?;
        let year = parts.next()?;
        parts.next().is_none().then_some([day, month, year])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriMonth {
    pub number: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: u32,
    pub month: HijriMonth,
    pub year: i32,
}

impl HijriDate {
    pub const RAMADAN: u32 = 9;

    pub fn is_ramadan(&self) -> bool {
        self.month.number == Self::RAMADAN
    }
}

impl Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month.name, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub gregorian: GregorianDate,
    pub hijri: Option<HijriDate>,
    pub timings: Timings,
    pub meta_timezone: Option<String>,
}

impl DayRecord {
    pub fn timing(&self, prayer: Prayer) -> Option<&PrayerTime> {
        self.timings.get(&prayer)
    }

    pub fn is_ramadan(&self) -> bool {
        self.hijri.as_ref().is_some_and(HijriDate::is_ramadan)
    }

    pub fn display_date(&self) -> &str {
        self.gregorian.display()
    }

    pub fn hijri_display(&self) -> String {
        self.hijri
            .as_ref()
            .map_or_else(|| String::from("Unknown"), ToString::to_string)
    }
}
