//! Wire schema of the prayer-time provider and the ingestion boundary that
//! turns it into validated [`DayRecord`]s.

use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use crate::{DayRecord, GregorianDate, HijriDate, HijriMonth, Prayer, PrayerTime, RecordError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    pub data: CalendarData,
}

/// Calendar endpoints key days by month; month keys carry no ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarData {
    Months(BTreeMap<String, Vec<Option<RawDay>>>),
    Days(Vec<Option<RawDay>>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDay {
    #[serde(default)]
    pub timings: Option<HashMap<String, String>>,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDate {
    #[serde(default)]
    pub readable: Option<String>,
    #[serde(default)]
    pub gregorian: Option<RawGregorian>,
    #[serde(default)]
    pub hijri: Option<RawHijri>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGregorian {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHijri {
    #[serde(default)]
    pub day: Option<NumberOrString>,
    #[serde(default)]
    pub month: Option<RawHijriMonth>,
    #[serde(default)]
    pub year: Option<NumberOrString>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHijriMonth {
    #[serde(default)]
    pub number: Option<NumberOrString>,
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMeta {
    #[serde(default)]
    pub timezone: Option<String>,
}

/// The provider sends most numbers as strings (`"day": "01"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl CalendarResponse {
    pub fn into_days(self) -> impl Iterator<Item = RawDay> {
        let days = match self.data {
            CalendarData::Months(months) => months.into_values().flatten().collect::<Vec<_>>(),
            CalendarData::Days(days) => days,
        };
        days.into_iter().flatten()
    }
}

/// Flattens a provider response into validated records, dropping the days
/// that cannot contribute anything.
pub fn ingest(response: CalendarResponse) -> Vec<DayRecord> {
    response
        .into_days()
        .filter_map(|day| match DayRecord::try_from(day) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!("Skipping provider day: {}", error);
                None
            }
        })
        .collect()
}

impl TryFrom<RawDay> for DayRecord {
    type Error = RecordError;

    fn try_from(day: RawDay) -> Result<Self, Self::Error> {
        let date = day.date.unwrap_or_default();
        let gregorian = date
            .gregorian
            .and_then(|g| g.date)
            .filter(|d| !d.trim().is_empty())
            .ok_or(RecordError::MissingDate)?;

        let timings = day
            .timings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, raw)| {
                let prayer = Prayer::from_str(&name).ok()?;
                match raw.parse::<PrayerTime>() {
                    Ok(time) => Some((prayer, time)),
                    Err(error) => {
                        warn!("Dropping {} on {}: {}", prayer, gregorian, error);
                        None
                    }
                }
            })
            .collect::<BTreeMap<_, _>>();

        if timings.is_empty() {
            return Err(RecordError::NoTimings);
        }

        let hijri = date.hijri.and_then(|hijri| {
            let converted = hijri_date(&hijri);
            if converted.is_none() {
                debug!("Ignoring incomplete hijri date on {}", gregorian);
            }
            converted
        });

        Ok(Self {
            gregorian: GregorianDate {
                date: gregorian,
                readable: date.readable,
            },
            hijri,
            timings,
            meta_timezone: day
                .meta
                .and_then(|meta| meta.timezone)
                .filter(|tz| !tz.trim().is_empty()),
        })
    }
}

fn hijri_date(hijri: &RawHijri) -> Option<HijriDate> {
    let month = hijri.month.as_ref()?;
    let number = u32::try_from(month.number.as_ref()?.as_i64()?).ok()?;
    if !(1..=12).contains(&number) {
        return None;
    }

    Some(HijriDate {
        day: u32::try_from(hijri.day.as_ref()?.as_i64()?).ok()?,
        month: HijriMonth {
            number,
            name: month.en.clone().unwrap_or_default(),
        },
        year: i32::try_from(hijri.year.as_ref()?.as_i64()?).ok()?,
    })
}
