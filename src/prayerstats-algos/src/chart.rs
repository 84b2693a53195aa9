use prayerstats_types::{DayRecord, Prayer};

use crate::{
    TimeNormalizer,
    helpers::date_labels::{format_date_with_ordinal, format_hijri_with_ordinal},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub prayer: Prayer,
    /// Normalized decimal hours, `None` where the day lacks the timing.
    pub points: Vec<Option<f64>>,
    /// Provider strings, for tooltips.
    pub formatted_times: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// `[gregorian, hijri]` two-line labels.
    pub labels: Vec<[String; 2]>,
    pub datasets: Vec<ChartDataset>,
    /// Index of the first day of every month after the first.
    pub month_boundaries: Vec<usize>,
}

impl ChartSeries {
    pub fn build(records: &[DayRecord], normalizer: &TimeNormalizer) -> Self {
        let mut sorted = records.iter().collect::<Vec<_>>();
        sorted.sort_by_cached_key(|record| record.gregorian.sort_key());

        let labels = sorted
            .iter()
            .map(|record| {
                let hijri = record
                    .hijri
                    .as_ref()
                    .map(format_hijri_with_ordinal)
                    .unwrap_or_default();
                [format_date_with_ordinal(&record.gregorian.date), hijri]
            })
            .collect();

        let datasets = Prayer::all()
            .map(|prayer| {
                let (points, formatted_times) = sorted
                    .iter()
                    .map(|record| match record.timing(prayer) {
                        Some(timing) => (
                            Some(normalizer.normalize_timing(record, timing)),
                            Some(timing.raw.clone()),
                        ),
                        None => (None, None),
                    })
                    .unzip();

                ChartDataset {
                    prayer,
                    points,
                    formatted_times,
                }
            })
            .collect();

        let month_boundaries = sorted
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].gregorian.month_key() != pair[1].gregorian.month_key())
            .map(|(index, _)| index + 1)
            .collect();

        Self {
            labels,
            datasets,
            month_boundaries,
        }
    }

    pub fn dataset(&self, prayer: Prayer) -> Option<&ChartDataset> {
        self.datasets.iter().find(|d| d.prayer == prayer)
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use prayerstats_types::{GregorianDate, HijriDate, HijriMonth, Timings};

    use super::*;
    use crate::HostZone;

    fn record(date: &str, hijri: Option<(u32, u32)>, fajr: Option<&str>) -> DayRecord {
        DayRecord {
            gregorian: GregorianDate::new(date),
            hijri: hijri.map(|(day, month)| HijriDate {
                day,
                month: HijriMonth {
                    number: month,
                    name: String::new(),
                },
                year: 1445,
            }),
            timings: fajr
                .into_iter()
                .map(|t| (Prayer::Fajr, t.parse().unwrap()))
                .collect::<Timings>(),
            meta_timezone: Some(String::from("Asia/Krasnoyarsk")),
        }
    }

    fn normalizer() -> TimeNormalizer {
        TimeNormalizer::with_host_zone(HostZone::Fixed(FixedOffset::east_opt(0).unwrap()))
    }

    #[test]
    fn series_sorted_with_one_boundary() {
        let records = [
            record("02-03-2024", Some((22, 8)), Some("04:40 (+07)")),
            record("28-02-2024", None, Some("05:00 (+07)")),
            record("01-03-2024", Some((21, 8)), Some("04:45 (+07)")),
            record("29-02-2024", None, Some("04:55 (+07)")),
        ];
        let series = ChartSeries::build(&records, &normalizer());

        let gregorian = series.labels.iter().map(|l| l[0].as_str()).collect::<Vec<_>>();
        assert_eq!(gregorian, ["Feb 28th", "Feb 29th", "Mar 1st", "Mar 2nd"]);
        assert_eq!(series.labels[2][1], "Shb 21st");
        assert_eq!(series.labels[0][1], "");
        assert_eq!(series.month_boundaries, [2]);
    }

    #[test]
    fn dataset_points_are_decimal_hours() {
        let records = [
            record("01-01-2024", None, Some("06:30 (+07)")),
            record("02-01-2024", None, None),
        ];
        let series = ChartSeries::build(&records, &normalizer());
        let fajr = series.dataset(Prayer::Fajr).unwrap();

        assert_eq!(series.datasets.len(), 6);
        assert_eq!(fajr.points, [Some(6.5), None]);
        assert_eq!(fajr.formatted_times[0].as_deref(), Some("06:30 (+07)"));
        assert!(series.dataset(Prayer::Isha).unwrap().points.iter().all(Option::is_none));
    }

    #[test]
    fn single_month_has_no_boundaries() {
        let records = [
            record("01-01-2024", None, Some("06:30")),
            record("02-01-2024", None, Some("06:30")),
        ];
        assert!(ChartSeries::build(&records, &normalizer()).month_boundaries.is_empty());
    }

    #[test]
    fn invalid_date_label() {
        let records = [record("2024-01-01", None, Some("06:30"))];
        let series = ChartSeries::build(&records, &normalizer());
        assert_eq!(series.labels[0][0], "Invalid Date");
    }
}
