use std::collections::BTreeMap;

use prayerstats_types::{DayRecord, Prayer};

use crate::{StatSummary, TimeNormalizer};

/// Normalized minutes of one prayer across the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerStats {
    pub times: Vec<i64>,
    pub dates: Vec<String>,
    pub summary: Option<StatSummary>,
}

impl PrayerStats {
    pub fn min_date(&self) -> Option<&str> {
        let summary = self.summary.as_ref()?;
        self.dates.get(summary.min_index).map(String::as_str)
    }

    pub fn max_date(&self) -> Option<&str> {
        let summary = self.summary.as_ref()?;
        self.dates.get(summary.max_index).map(String::as_str)
    }
}

pub type PrayerExtremes = BTreeMap<Prayer, PrayerStats>;

pub struct ExtremesCalculator;

impl ExtremesCalculator {
    /// Records are expected in chronological order; ties resolve to the
    /// earliest record.
    pub fn calculate(records: &[DayRecord], normalizer: &TimeNormalizer) -> PrayerExtremes {
        let mut stats = Prayer::all()
            .map(|prayer| (prayer, PrayerStats::default()))
            .collect::<PrayerExtremes>();

        for record in records {
            for (prayer, timing) in &record.timings {
                let entry = stats.entry(*prayer).or_default();
                entry.times.push(normalizer.minutes(record, timing));
                entry.dates.push(record.display_date().to_owned());
            }
        }

        for entry in stats.values_mut() {
            entry.summary = StatSummary::from_minutes(&entry.times);
        }

        stats
    }
}
