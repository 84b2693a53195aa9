use std::fmt::{self, Display};

use prayerstats_algos::{
    FastingPeriod, FastingStats, IntervalExtreme, IntervalStats, PrayerExtremes, PrayerStatistics,
    helpers::{date_labels::format_date_with_ordinal, format_hm::FormatHM},
};

pub const NO_DATA: &str = "No data available";

fn on_date(minutes: i64, date: &str) -> String {
    format!("{} on {}", minutes.format_hm(), format_date_with_ordinal(date))
}

/// `04:40 → 06:30`, dropping any zone suffix from the raw timings.
fn time_detail(from: &str, to: &str) -> String {
    let clock = |raw: &str| raw.split_whitespace().next().unwrap_or_default().to_owned();
    format!("{} → {}", clock(from), clock(to))
}

fn header(f: &mut fmt::Formatter<'_>, first: &str, low: &str, high: &str) -> fmt::Result {
    writeln!(
        f,
        "{:<16}{:<24}{:<8}{:<24}{:<9}StDev",
        first, low, "Range", high, "Average"
    )
}

fn row(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    low: &str,
    range: i64,
    high: &str,
    average: i64,
    stdev: i64,
) -> fmt::Result {
    writeln!(
        f,
        "{:<16}{:<24}{:<8}{:<24}{:<9}{}",
        name,
        low,
        range.format_hm(),
        high,
        average.format_hm(),
        stdev.format_hm()
    )
}

fn detail_row(f: &mut fmt::Formatter<'_>, low: &str, high: &str) -> fmt::Result {
    writeln!(f, "{:<16}{:<24}{:<8}{}", "", low, "", high)
}

pub struct PrayerTable<'a>(pub &'a PrayerExtremes);

impl Display for PrayerTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        header(f, "Prayer", "Earliest", "Latest")?;

        let mut rendered = false;
        for (prayer, stats) in self.0 {
            let (Some(summary), Some(min_date), Some(max_date)) =
                (stats.summary, stats.min_date(), stats.max_date())
            else {
                continue;
            };

            row(
                f,
                prayer.name(),
                &on_date(summary.min, min_date),
                summary.range,
                &on_date(summary.max, max_date),
                summary.mean,
                summary.stdev,
            )?;
            rendered = true;
        }

        if !rendered {
            writeln!(f, "{NO_DATA}")?;
        }
        Ok(())
    }
}

pub struct IntervalTable<'a>(pub &'a [IntervalStats]);

impl Display for IntervalTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        header(f, "Interval", "Shortest", "Longest")?;

        let cell = |extreme: &IntervalExtreme<'_>| on_date(extreme.duration, extreme.date);
        let detail = |extreme: &IntervalExtreme<'_>| time_detail(extreme.from_time, extreme.to_time);

        let mut rendered = false;
        for stats in self.0 {
            let (Some(summary), Some(shortest), Some(longest)) =
                (stats.summary, stats.shortest(), stats.longest())
            else {
                continue;
            };

            row(
                f,
                &stats.key.label(),
                &cell(&shortest),
                summary.range,
                &cell(&longest),
                summary.mean,
                summary.stdev,
            )?;
            detail_row(f, &detail(&shortest), &detail(&longest))?;
            rendered = true;
        }

        if !rendered {
            writeln!(f, "{NO_DATA}")?;
        }
        Ok(())
    }
}

pub struct FastingTable<'a>(pub &'a FastingStats);

impl FastingTable<'_> {
    fn period(f: &mut fmt::Formatter<'_>, name: &str, period: &FastingPeriod) -> fmt::Result {
        let Some(summary) = &period.summary else {
            return writeln!(f, "{name:<16}{NO_DATA}");
        };
        let (shortest, longest) = (&summary.min_entry, &summary.max_entry);

        row(
            f,
            name,
            &on_date(shortest.duration, &shortest.gregorian_date),
            summary.range,
            &on_date(longest.duration, &longest.gregorian_date),
            summary.avg,
            summary.stdev,
        )?;
        detail_row(
            f,
            &time_detail(&shortest.fajr, &shortest.maghrib),
            &time_detail(&longest.fajr, &longest.maghrib),
        )
    }
}

impl Display for FastingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        header(f, "Period", "Shortest", "Longest")?;
        Self::period(f, "All Year", &self.0.all_year)?;
        Self::period(f, "Ramadan", &self.0.ramadan)
    }
}

/// All three tables with section titles.
pub struct StatisticsReport<'a>(pub &'a PrayerStatistics);

impl Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prayer times:\n{}", PrayerTable(&self.0.prayer_stats))?;
        writeln!(f, "Intervals:\n{}", IntervalTable(&self.0.interval_stats))?;
        write!(f, "Fasting:\n{}", FastingTable(&self.0.fasting_stats))
    }
}
