use prayerstats_types::{DayRecord, Prayer};

use crate::{
    TimeNormalizer,
    helpers::time_math::{floor_mean, forward_minutes, round_minutes, std_dev},
};

/// One fasting day, Fajr to Maghrib.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingEntry {
    pub duration: i64,
    pub hijri_date: String,
    pub gregorian_date: String,
    pub fajr: String,
    pub maghrib: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingSummary {
    pub min: i64,
    pub max: i64,
    /// Truncated, unlike the rounded means elsewhere.
    pub avg: i64,
    pub stdev: i64,
    pub range: i64,
    pub min_entry: FastingEntry,
    pub max_entry: FastingEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingPeriod {
    pub entries: Vec<FastingEntry>,
    pub summary: Option<FastingSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingStats {
    pub all_year: FastingPeriod,
    pub ramadan: FastingPeriod,
}

pub struct FastingCalculator;

impl FastingCalculator {
    pub fn calculate(records: &[DayRecord], normalizer: &TimeNormalizer) -> FastingStats {
        let mut stats = FastingStats::default();

        for record in records {
            let (Some(fajr), Some(maghrib)) =
                (record.timing(Prayer::Fajr), record.timing(Prayer::Maghrib))
            else {
                continue;
            };

            let entry = FastingEntry {
                duration: forward_minutes(
                    normalizer.minutes(record, fajr),
                    normalizer.minutes(record, maghrib),
                ),
                hijri_date: record.hijri_display(),
                gregorian_date: record.display_date().to_owned(),
                fajr: fajr.raw.clone(),
                maghrib: maghrib.raw.clone(),
            };

            if record.is_ramadan() {
                stats.ramadan.entries.push(entry.clone());
            }
            stats.all_year.entries.push(entry);
        }

        stats.all_year.summary = FastingSummary::from_entries(&stats.all_year.entries);
        stats.ramadan.summary = FastingSummary::from_entries(&stats.ramadan.entries);
        stats
    }
}

impl FastingSummary {
    pub fn from_entries(entries: &[FastingEntry]) -> Option<Self> {
        let durations = entries.iter().map(|e| e.duration).collect::<Vec<_>>();
        let min = durations.iter().copied().min()?;
        let max = durations.iter().copied().max()?;

        let avg = floor_mean(&durations);
        // deviation is measured from the truncated average
        let stdev = if durations.len() > 1 {
            round_minutes(std_dev(&durations, avg as f64))
        } else {
            0
        };

        Some(Self {
            min,
            max,
            avg,
            stdev,
            range: max - min,
            min_entry: entries.iter().find(|e| e.duration == min)?.clone(),
            max_entry: entries.iter().find(|e| e.duration == max)?.clone(),
        })
    }
}
