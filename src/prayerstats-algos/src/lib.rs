#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

pub(crate) mod summary;
pub use summary::StatSummary;

pub(crate) mod normalizer;
pub use normalizer::{HostZone, NormalizeError, ResolvedZone, TimeNormalizer, ZoneStrategy};

pub(crate) mod extremes;
pub use extremes::{ExtremesCalculator, PrayerExtremes, PrayerStats};

pub(crate) mod intervals;
pub use intervals::{IntervalCalculator, IntervalExtreme, IntervalKey, IntervalStats};

pub(crate) mod fasting;
pub use fasting::{FastingCalculator, FastingEntry, FastingPeriod, FastingStats, FastingSummary};

pub(crate) mod chart;
pub use chart::{ChartDataset, ChartSeries};

pub(crate) mod analytics;
pub use analytics::{
    AnalyticsError, AnalyticsReport, PrayerAnalytics, PrayerStatistics, sort_chronologically,
};

pub mod export;
pub use export::{ExportDocument, StatsMetadata, YearType};

pub mod helpers;
