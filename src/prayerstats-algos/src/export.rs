//! Self-contained JSON document of one calculation.

use crate::{
    FastingPeriod, PrayerStatistics,
    helpers::{date_labels::strip_year, format_hm::FormatHM},
};

/// Request parameters the statistics were computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsMetadata {
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub calculation_method: String,
    pub year_type: YearType,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearType {
    Gregorian,
    Hijri,
}

impl std::fmt::Display for YearType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearType::Gregorian => f.write_str("Gregorian"),
            YearType::Hijri => f.write_str("Hijri"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub location: ExportLocation,
    pub prayer_time_extremes: Vec<PrayerExtremeExport>,
    pub intervals: Vec<IntervalExport>,
    pub fasting: FastingExport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub calculation_method: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOnDate {
    pub time: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerExtremeExport {
    pub prayer: String,
    pub earliest: Option<TimeOnDate>,
    pub latest: Option<TimeOnDate>,
    pub average: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalExtremeExport {
    pub duration: String,
    pub date: String,
    pub from_time: String,
    pub to_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalExport {
    pub interval: String,
    pub shortest: Option<IntervalExtremeExport>,
    pub longest: Option<IntervalExtremeExport>,
    pub average: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingDayExport {
    pub duration: String,
    pub hijri_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gregorian_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fajr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maghrib: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingPeriodExport {
    pub longest: Option<FastingDayExport>,
    pub shortest: Option<FastingDayExport>,
    pub range: Option<String>,
    pub average: Option<String>,
    pub stdev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingExport {
    pub all_year: FastingPeriodExport,
    pub ramadan: Option<FastingPeriodExport>,
}

impl ExportDocument {
    pub fn new(stats: &PrayerStatistics, metadata: &StatsMetadata) -> Self {
        let prayer_time_extremes = stats
            .prayer_stats
            .iter()
            .map(|(prayer, data)| {
                let at = |index: usize| {
                    Some(TimeOnDate {
                        time: data.times.get(index)?.format_hm(),
                        date: data.dates.get(index)?.clone(),
                    })
                };

                PrayerExtremeExport {
                    prayer: prayer.to_string(),
                    earliest: data.summary.and_then(|s| at(s.min_index)),
                    latest: data.summary.and_then(|s| at(s.max_index)),
                    average: data.summary.map(|s| s.mean.format_hm()),
                }
            })
            .collect();

        let intervals = stats
            .interval_stats
            .iter()
            .map(|data| {
                let export = |extreme: crate::IntervalExtreme<'_>| IntervalExtremeExport {
                    duration: extreme.duration.format_hm(),
                    date: extreme.date.to_owned(),
                    from_time: extreme.from_time.to_owned(),
                    to_time: extreme.to_time.to_owned(),
                };

                IntervalExport {
                    interval: data.key.label(),
                    shortest: data.shortest().map(export),
                    longest: data.longest().map(export),
                    average: data.summary.map(|s| s.mean.format_hm()),
                }
            })
            .collect();

        let fasting = FastingExport {
            all_year: fasting_period(&stats.fasting_stats.all_year, FastingDetail::GregorianDate),
            ramadan: stats
                .fasting_stats
                .ramadan
                .summary
                .is_some()
                .then(|| fasting_period(&stats.fasting_stats.ramadan, FastingDetail::Times)),
        };

        Self {
            location: ExportLocation {
                latitude: metadata.latitude,
                longitude: metadata.longitude,
                calculation_method: metadata.calculation_method.clone(),
                year: metadata.year.clone(),
            },
            prayer_time_extremes,
            intervals,
            fasting,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `PS-stats-{method}-Lat_{lat}_Long_{lon}_{year type}_{year}.json`
    pub fn file_name(method_label: &str, metadata: &StatsMetadata) -> String {
        format!(
            "PS-stats-{}-Lat_{:.2}_Long_{:.2}_{}_{}.json",
            method_label, metadata.latitude, metadata.longitude, metadata.year_type, metadata.year
        )
    }
}

#[derive(Clone, Copy)]
enum FastingDetail {
    GregorianDate,
    Times,
}

fn fasting_period(period: &FastingPeriod, detail: FastingDetail) -> FastingPeriodExport {
    let Some(summary) = &period.summary else {
        return FastingPeriodExport {
            longest: None,
            shortest: None,
            range: None,
            average: None,
            stdev: None,
        };
    };

    let day = |entry: &crate::FastingEntry| {
        let (gregorian_date, fajr, maghrib) = match detail {
            FastingDetail::GregorianDate => {
                (Some(strip_year(&entry.gregorian_date).to_owned()), None, None)
            }
            FastingDetail::Times => (None, Some(entry.fajr.clone()), Some(entry.maghrib.clone())),
        };
        FastingDayExport {
            duration: entry.duration.format_hm(),
            hijri_date: entry.hijri_date.clone(),
            gregorian_date,
            fajr,
            maghrib,
        }
    };

    FastingPeriodExport {
        longest: Some(day(&summary.max_entry)),
        shortest: Some(day(&summary.min_entry)),
        range: Some(summary.range.format_hm()),
        average: Some(summary.avg.format_hm()),
        stdev: Some(summary.stdev.format_hm()),
    }
}
