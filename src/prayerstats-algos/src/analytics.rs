use prayerstats_types::{CalendarResponse, DayRecord, ingest};
use thiserror::Error;

use crate::{
    ChartSeries, ExtremesCalculator, FastingCalculator, FastingStats, IntervalCalculator,
    IntervalStats, PrayerExtremes, TimeNormalizer,
};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("dataset contains no usable prayer times")]
    NoUsableRecords,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerStatistics {
    pub prayer_stats: PrayerExtremes,
    pub interval_stats: Vec<IntervalStats>,
    pub fasting_stats: FastingStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub statistics: PrayerStatistics,
    pub chart: ChartSeries,
}

/// Runs every calculator over one dataset with a shared normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrayerAnalytics {
    normalizer: TimeNormalizer,
}

impl PrayerAnalytics {
    pub fn new(normalizer: TimeNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn calculate(&self, mut records: Vec<DayRecord>) -> Result<AnalyticsReport, AnalyticsError> {
        if records.is_empty() {
            return Err(AnalyticsError::NoUsableRecords);
        }

        sort_chronologically(&mut records);
        debug!("Calculating statistics over {} days", records.len());

        let statistics = PrayerStatistics {
            prayer_stats: ExtremesCalculator::calculate(&records, &self.normalizer),
            interval_stats: IntervalCalculator::calculate(&records, &self.normalizer),
            fasting_stats: FastingCalculator::calculate(&records, &self.normalizer),
        };
        let chart = ChartSeries::build(&records, &self.normalizer);

        Ok(AnalyticsReport { statistics, chart })
    }

    pub fn calculate_response(
        &self,
        response: CalendarResponse,
    ) -> Result<AnalyticsReport, AnalyticsError> {
        self.calculate(ingest(response))
    }
}

/// Stable sort on the `YYYY-MM-DD` form of each record's date.
pub fn sort_chronologically(records: &mut [DayRecord]) {
    records.sort_by_cached_key(|record| record.gregorian.sort_key());
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use prayerstats_types::Prayer;

    use super::*;
    use crate::HostZone;

    fn analytics() -> PrayerAnalytics {
        PrayerAnalytics::new(TimeNormalizer::with_host_zone(HostZone::Fixed(
            FixedOffset::east_opt(0).unwrap(),
        )))
    }

    fn response() -> CalendarResponse {
        serde_json::from_value(serde_json::json!({
            "code": 200,
            "data": {
                "3": [{
                    "timings": { "Fajr": "04:50 (+03)", "Maghrib": "18:10 (+03)", "Isha": "19:30 (+03)" },
                    "date": {
                        "readable": "01 Mar 2024",
                        "gregorian": { "date": "01-03-2024" },
                        "hijri": { "day": "20", "month": { "number": 8, "en": "Shaʿbān" }, "year": "1445" }
                    }
                }],
                "2": [
                    {
                        "timings": { "Fajr": "05:10 (+03)", "Maghrib": "17:50 (+03)", "Isha": "19:10 (+03)" },
                        "date": { "readable": "28 Feb 2024", "gregorian": { "date": "28-02-2024" } }
                    },
                    {
                        "timings": { "Fajr": "05:10 (+03)", "Maghrib": "17:55 (+03)", "Isha": "19:15 (+03)" },
                        "date": { "readable": "29 Feb 2024", "gregorian": { "date": "29-02-2024" } }
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn empty_dataset_is_an_error() {
        assert!(matches!(
            analytics().calculate(Vec::new()),
            Err(AnalyticsError::NoUsableRecords)
        ));
    }

    #[test]
    fn full_pipeline_over_unordered_months() {
        let report = analytics().calculate_response(response()).unwrap();
        let stats = &report.statistics;

        let fajr = &stats.prayer_stats[&Prayer::Fajr];
        assert_eq!(fajr.dates, ["28 Feb 2024", "29 Feb 2024", "01 Mar 2024"]);
        // tie on 05:10 resolves to the first day
        assert_eq!(fajr.max_date(), Some("28 Feb 2024"));
        assert_eq!(fajr.min_date(), Some("01 Mar 2024"));

        assert_eq!(stats.fasting_stats.all_year.entries.len(), 3);
        assert_eq!(stats.fasting_stats.all_year.summary.as_ref().unwrap().min, 760);
        assert!(stats.fasting_stats.ramadan.entries.is_empty());

        assert_eq!(report.chart.month_boundaries, [2]);
        assert_eq!(report.chart.labels[2][1], "Shb 20th");
    }

    #[test]
    fn calculation_is_deterministic() {
        let a = analytics().calculate_response(response()).unwrap();
        let b = analytics().calculate_response(response()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unparseable_payload_days_only_is_an_error() {
        let response: CalendarResponse = serde_json::from_value(serde_json::json!({
            "data": [ { "timings": {} } ]
        }))
        .unwrap();
        assert!(analytics().calculate_response(response).is_err());
    }
}
