use std::fmt::Display;

use prayerstats_types::{DayRecord, INTERVAL_SEQUENCE, Prayer};

use crate::{StatSummary, TimeNormalizer, helpers::time_math::forward_minutes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntervalKey {
    pub from: Prayer,
    pub to: Prayer,
}

impl IntervalKey {
    /// The six adjacent pairs, starting with `Isha_to_Fajr`.
    pub fn all() -> impl Iterator<Item = IntervalKey> {
        INTERVAL_SEQUENCE.windows(2).map(|pair| IntervalKey {
            from: pair[0],
            to: pair[1],
        })
    }

    /// `Isha to Fajr`
    pub fn label(&self) -> String {
        format!("{} to {}", self.from, self.to)
    }
}

impl Display for IntervalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_to_{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub key: IntervalKey,
    pub values: Vec<i64>,
    pub dates: Vec<String>,
    /// Raw provider strings of the two ends of each interval.
    pub times: Vec<(String, String)>,
    pub summary: Option<StatSummary>,
}

impl IntervalStats {
    fn new(key: IntervalKey) -> Self {
        Self {
            key,
            values: Vec::new(),
            dates: Vec::new(),
            times: Vec::new(),
            summary: None,
        }
    }

    pub fn shortest(&self) -> Option<IntervalExtreme<'_>> {
        self.extreme(self.summary?.min_index)
    }

    pub fn longest(&self) -> Option<IntervalExtreme<'_>> {
        self.extreme(self.summary?.max_index)
    }

    fn extreme(&self, index: usize) -> Option<IntervalExtreme<'_>> {
        let (from_time, to_time) = self.times.get(index)?;
        Some(IntervalExtreme {
            duration: *self.values.get(index)?,
            date: self.dates.get(index)?,
            from_time,
            to_time,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalExtreme<'a> {
    pub duration: i64,
    pub date: &'a str,
    pub from_time: &'a str,
    pub to_time: &'a str,
}

pub struct IntervalCalculator;

impl IntervalCalculator {
    pub fn calculate(records: &[DayRecord], normalizer: &TimeNormalizer) -> Vec<IntervalStats> {
        let mut intervals = IntervalKey::all().map(IntervalStats::new).collect::<Vec<_>>();

        for record in records {
            let mut previous: Option<(Prayer, i64, &str)> = None;

            for prayer in INTERVAL_SEQUENCE {
                let Some(timing) = record.timing(prayer) else {
                    continue;
                };
                let current = normalizer.minutes(record, timing);

                if let Some((prev_prayer, prev_minutes, prev_raw)) = previous {
                    let key = IntervalKey {
                        from: prev_prayer,
                        to: prayer,
                    };
                    // a gap in the sequence yields a non-adjacent pair, which is not tracked
                    if let Some(stats) = intervals.iter_mut().find(|s| s.key == key) {
                        stats.values.push(forward_minutes(prev_minutes, current));
                        stats.dates.push(record.display_date().to_owned());
                        stats.times.push((prev_raw.to_owned(), timing.raw.clone()));
                    }
                }

                previous = Some((prayer, current, timing.raw.as_str()));
            }
        }

        for stats in &mut intervals {
            stats.summary = StatSummary::from_minutes(&stats.values);
        }

        intervals
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use prayerstats_types::{GregorianDate, Timings};

    use super::*;
    use crate::HostZone;

    fn record(date: &str, timings: &[(Prayer, &str)]) -> DayRecord {
        DayRecord {
            gregorian: GregorianDate::new(date),
            hijri: None,
            timings: timings
                .iter()
                .map(|(p, t)| (*p, t.parse().unwrap()))
                .collect::<Timings>(),
            meta_timezone: None,
        }
    }

    fn normalizer() -> TimeNormalizer {
        TimeNormalizer::with_host_zone(HostZone::Fixed(FixedOffset::east_opt(0).unwrap()))
    }

    fn find<'a>(stats: &'a [IntervalStats], from: Prayer, to: Prayer) -> &'a IntervalStats {
        stats.iter().find(|s| s.key == IntervalKey { from, to }).unwrap()
    }

    #[test]
    fn keys_follow_sequence() {
        let keys = IntervalKey::all().map(|k| k.to_string()).collect::<Vec<_>>();
        assert_eq!(
            keys,
            [
                "Isha_to_Fajr",
                "Fajr_to_Sunrise",
                "Sunrise_to_Dhuhr",
                "Dhuhr_to_Asr",
                "Asr_to_Maghrib",
                "Maghrib_to_Isha"
            ]
        );
        assert_eq!(IntervalKey::all().next().unwrap().label(), "Isha to Fajr");
    }

    #[test]
    fn isha_to_fajr_wraps_midnight() {
        let records = [record(
            "21-06-2024",
            &[(Prayer::Isha, "23:50 (+03)"), (Prayer::Fajr, "00:10 (+03)")],
        )];
        let stats = IntervalCalculator::calculate(&records, &normalizer());
        let isha_fajr = find(&stats, Prayer::Isha, Prayer::Fajr);

        assert_eq!(isha_fajr.values, [20]);
        assert_eq!(
            isha_fajr.times,
            [(String::from("23:50 (+03)"), String::from("00:10 (+03)"))]
        );
    }

    #[test]
    fn full_day_yields_six_intervals_summing_to_a_day() {
        let records = [record(
            "01-03-2024",
            &[
                (Prayer::Fajr, "05:00"),
                (Prayer::Sunrise, "06:30"),
                (Prayer::Dhuhr, "12:15"),
                (Prayer::Asr, "15:40"),
                (Prayer::Maghrib, "18:05"),
                (Prayer::Isha, "19:35"),
            ],
        )];
        let stats = IntervalCalculator::calculate(&records, &normalizer());

        assert!(stats.iter().all(|s| s.values.len() == 1));
        assert_eq!(find(&stats, Prayer::Isha, Prayer::Fajr).values, [565]);
        assert_eq!(find(&stats, Prayer::Fajr, Prayer::Sunrise).values, [90]);
        assert_eq!(stats.iter().map(|s| s.values[0]).sum::<i64>(), 1440);
    }

    #[test]
    fn missing_prayer_skips_both_adjacent_pairs() {
        let records = [record(
            "01-03-2024",
            &[
                (Prayer::Fajr, "05:00"),
                (Prayer::Dhuhr, "12:15"),
                (Prayer::Asr, "15:40"),
            ],
        )];
        let stats = IntervalCalculator::calculate(&records, &normalizer());

        assert!(find(&stats, Prayer::Fajr, Prayer::Sunrise).values.is_empty());
        assert!(find(&stats, Prayer::Sunrise, Prayer::Dhuhr).values.is_empty());
        assert_eq!(find(&stats, Prayer::Dhuhr, Prayer::Asr).values, [205]);
        assert_eq!(find(&stats, Prayer::Isha, Prayer::Fajr).summary, None);
    }

    #[test]
    fn extremes_keep_raw_times() {
        let records = [
            record("01-06-2024", &[(Prayer::Asr, "16:00"), (Prayer::Maghrib, "20:00")]),
            record("01-12-2024", &[(Prayer::Asr, "14:00"), (Prayer::Maghrib, "16:30")]),
        ];
        let stats = IntervalCalculator::calculate(&records, &normalizer());
        let asr_maghrib = find(&stats, Prayer::Asr, Prayer::Maghrib);

        let shortest = asr_maghrib.shortest().unwrap();
        assert_eq!(shortest.duration, 150);
        assert_eq!((shortest.from_time, shortest.to_time), ("14:00", "16:30"));
        assert_eq!(shortest.date, "01-12-2024");

        let longest = asr_maghrib.longest().unwrap();
        assert_eq!(longest.duration, 240);
        assert_eq!(asr_maghrib.summary.unwrap().range, 90);
    }
}
