use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use prayerstats_algos::{
    AnalyticsReport, ChartSeries, ExportDocument, PrayerAnalytics, StatsMetadata, YearType,
};
use prayerstats_types::{CalculationMethod, CalendarResponse};
use tokio_util::sync::CancellationToken;

use crate::{
    AladhanClient, GeocodingClient, ResultStore, StoredResults,
    api::{CalendarRequest, FALLBACK_HIJRI_YEAR},
};

/// Where the statistics are computed for.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    Address(String),
}

pub struct Calculation {
    pub results: StoredResults,
    /// Absent when stored results were reused.
    pub chart: Option<ChartSeries>,
}

pub struct PrayerStats {
    pub api: AladhanClient,
    pub geocoder: GeocodingClient,
    pub store: ResultStore,
    pub analytics: PrayerAnalytics,
}

impl PrayerStats {
    pub fn new(
        api: AladhanClient,
        geocoder: GeocodingClient,
        store: ResultStore,
        analytics: PrayerAnalytics,
    ) -> Self {
        Self {
            api,
            geocoder,
            store,
            analytics,
        }
    }

    /// Cached Hijri year, else today's from the provider, else a fixed default.
    pub async fn default_hijri_year(&self) -> String {
        if let Some(hijri) = self.store.cached_hijri() {
            debug!("Using cached Hijri year {}", hijri.year);
            return hijri.year;
        }

        match self.api.today_hijri().await {
            Ok(hijri) => {
                if let Err(error) = self.store.save_hijri(&hijri) {
                    warn!("Failed to cache Hijri year: {error:#}");
                }
                hijri.year
            }
            Err(error) => {
                warn!("Using default Hijri year {FALLBACK_HIJRI_YEAR}: {error:#}");
                String::from(FALLBACK_HIJRI_YEAR)
            }
        }
    }

    pub async fn resolve_location(
        &self,
        location: Location,
        cancel: &CancellationToken,
    ) -> anyhow::Result<(f64, f64, Option<String>)> {
        match location {
            Location::Coordinates {
                latitude,
                longitude,
            } => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    bail!("coordinates out of range: {latitude}, {longitude}");
                }
                Ok((latitude, longitude, None))
            }
            Location::Address(address) => {
                let place = self.geocoder.locate(&address, cancel).await?;
                info!("Using {} ({}, {})", place.display_name, place.latitude, place.longitude);
                Ok((place.latitude, place.longitude, Some(place.display_name)))
            }
        }
    }

    pub async fn calculate(
        &self,
        location: Location,
        year_type: YearType,
        year: Option<String>,
        method: CalculationMethod,
        force: bool,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Calculation> {
        let (latitude, longitude, address) = self.resolve_location(location, cancel).await?;
        let year = match (year, year_type) {
            (Some(year), _) => year,
            (None, YearType::Gregorian) => {
                use chrono::Datelike as _;
                chrono::Local::now().year().to_string()
            }
            (None, YearType::Hijri) => self.default_hijri_year().await,
        };

        let request = CalendarRequest {
            year_type,
            year,
            latitude,
            longitude,
            method,
        };
        let request_url = self.api.request_url(&request);

        if !force {
            if let Some(results) = self.store.lookup(&request_url)? {
                info!("Same request as last run, reusing stored results");
                return Ok(Calculation {
                    results,
                    chart: None,
                });
            }
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => bail!("cancelled"),
            response = self.api.calendar(&request) => response?,
        };
        let report = self.analytics.calculate_response(response)?;

        let results = StoredResults {
            request_url,
            metadata: StatsMetadata {
                address,
                latitude,
                longitude,
                calculation_method: method.query_value(),
                year_type,
                year: request.year,
            },
            statistics: report.statistics,
        };
        self.store.save_last(&results)?;

        Ok(Calculation {
            results,
            chart: Some(report.chart),
        })
    }

    /// Statistics over a calendar payload saved on disk.
    pub fn analyze_file(&self, path: &Path) -> anyhow::Result<AnalyticsReport> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let response: CalendarResponse = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a calendar response", path.display()))?;
        Ok(self.analytics.calculate_response(response)?)
    }
}

/// Writes the export document into `dir` and returns its path.
pub fn export(dir: &Path, results: &StoredResults) -> anyhow::Result<PathBuf> {
    let metadata = &results.metadata;
    let method_label = metadata
        .calculation_method
        .parse::<CalculationMethod>()
        .map_or_else(|_| metadata.calculation_method.clone(), |m| m.file_label());

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(ExportDocument::file_name(&method_label, metadata));
    let document = ExportDocument::new(&results.statistics, metadata);
    std::fs::write(&path, document.to_json()?)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use prayerstats_algos::{HostZone, PrayerStatistics, TimeNormalizer};

    use super::*;

    const CALENDAR: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": [
            {
                "timings": {"Fajr": "05:10 (+02)", "Sunrise": "07:00 (+02)", "Dhuhr": "12:30 (+02)",
                            "Asr": "15:00 (+02)", "Maghrib": "17:50 (+02)", "Isha": "19:30 (+02)"},
                "date": {"readable": "28 Feb 2024",
                         "gregorian": {"date": "28-02-2024"},
                         "hijri": {"day": "18", "month": {"number": 8, "en": "Shaʿbān"}, "year": "1445"}},
                "meta": {"timezone": "Europe/Helsinki"}
            }
        ]
    }"#;

    fn app(dir: &Path) -> PrayerStats {
        PrayerStats::new(
            AladhanClient::new("http://127.0.0.1:9"),
            GeocodingClient::new("http://127.0.0.1:9").unwrap(),
            ResultStore::new(dir),
            PrayerAnalytics::new(TimeNormalizer::with_host_zone(HostZone::Fixed(
                chrono::FixedOffset::east_opt(0).unwrap(),
            ))),
        )
    }

    fn stored(url: &str) -> StoredResults {
        StoredResults {
            request_url: url.to_owned(),
            metadata: StatsMetadata {
                address: None,
                latitude: 60.1699,
                longitude: 24.9384,
                calculation_method: String::from("3"),
                year_type: YearType::Gregorian,
                year: String::from("2024"),
            },
            statistics: PrayerStatistics::default(),
        }
    }

    #[test]
    fn analyze_saved_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, CALENDAR).unwrap();

        let report = app(dir.path()).analyze_file(&path).unwrap();
        let fasting = report.statistics.fasting_stats.all_year.summary.unwrap();
        assert_eq!(fasting.min, 760);
        assert_eq!(report.chart.labels.len(), 1);
    }

    #[tokio::test]
    async fn repeated_request_reuses_stored_results() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let request = CalendarRequest {
            year_type: YearType::Gregorian,
            year: String::from("2024"),
            latitude: 60.1699,
            longitude: 24.9384,
            method: CalculationMethod::Id(3),
        };
        app.store.save_last(&stored(&app.api.request_url(&request))).unwrap();

        let calculation = app
            .calculate(
                Location::Coordinates {
                    latitude: 60.1699,
                    longitude: 24.9384,
                },
                YearType::Gregorian,
                Some(String::from("2024")),
                CalculationMethod::Id(3),
                false,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(calculation.chart.is_none());
        assert_eq!(calculation.results.metadata.year, "2024");
    }

    #[tokio::test]
    async fn out_of_range_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let result = app(dir.path())
            .resolve_location(
                Location::Coordinates {
                    latitude: 91.0,
                    longitude: 0.0,
                },
                &CancellationToken::new(),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn hijri_year_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(app(dir.path()).default_hijri_year().await, FALLBACK_HIJRI_YEAR);
    }

    #[test]
    fn export_file_lands_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&dir.path().join("out"), &stored("u")).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "PS-stats-Muslim_World_League-Lat_60.17_Long_24.94_Gregorian_2024.json"
        );
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["location"]["calculation_method"], "3");
        assert!(json["fasting"]["ramadan"].is_null());
    }
}
