use std::path::{Path, PathBuf};

use anyhow::Context;
use prayerstats_algos::{PrayerStatistics, StatsMetadata};

use crate::api::TodayHijri;

const LAST_RESULTS_FILE: &str = "last_results.json";
const HIJRI_FILE: &str = "hijri.json";

/// The most recent calculation, keyed by the provider URL it was fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResults {
    pub request_url: String,
    pub metadata: StatsMetadata,
    pub statistics: PrayerStatistics,
}

/// JSON files in a state directory, shared between runs.
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_last(&self) -> anyhow::Result<Option<StoredResults>> {
        self.read(LAST_RESULTS_FILE)
    }

    /// Stored results for exactly this request, if any.
    pub fn lookup(&self, request_url: &str) -> anyhow::Result<Option<StoredResults>> {
        Ok(self
            .load_last()?
            .filter(|stored| stored.request_url == request_url))
    }

    pub fn save_last(&self, results: &StoredResults) -> anyhow::Result<()> {
        self.write(LAST_RESULTS_FILE, results)
    }

    /// Cached Hijri date; an unreadable cache counts as empty.
    pub fn cached_hijri(&self) -> Option<TodayHijri> {
        match self.read::<TodayHijri>(HIJRI_FILE) {
            Ok(hijri) => hijri.filter(|h| !h.year.trim().is_empty()),
            Err(error) => {
                warn!("Ignoring Hijri cache: {error:#}");
                None
            }
        }
    }

    pub fn save_hijri(&self, hijri: &TodayHijri) -> anyhow::Result<()> {
        self.write(HIJRI_FILE, hijri)
    }

    fn read<T: serde::de::DeserializeOwned>(&self, name: &str) -> anyhow::Result<Option<T>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;
        Ok(Some(value))
    }

    fn write<T: serde::Serialize>(&self, name: &str, value: &T) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create state dir {}", self.dir.display()))?;

        let path = self.dir.join(name);
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use prayerstats_algos::YearType;

    use super::*;

    fn results(url: &str) -> StoredResults {
        StoredResults {
            request_url: url.to_owned(),
            metadata: StatsMetadata {
                address: Some(String::from("Helsinki, Finland")),
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
    fn empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("state"));

        assert_eq!(store.load_last().unwrap(), None);
        assert_eq!(store.cached_hijri(), None);
    }

    #[test]
    fn identical_request_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("state"));
        store.save_last(&results("https://a/v1/calendar/2024")).unwrap();

        assert!(store.lookup("https://a/v1/calendar/2024").unwrap().is_some());
        assert!(store.lookup("https://a/v1/calendar/2025").unwrap().is_none());
        assert_eq!(
            store.load_last().unwrap(),
            Some(results("https://a/v1/calendar/2024"))
        );
    }

    #[test]
    fn hijri_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let hijri = TodayHijri {
            date: Some(String::from("15-04-1446")),
            year: String::from("1446"),
        };
        store.save_hijri(&hijri).unwrap();
        assert_eq!(store.cached_hijri(), Some(hijri));

        std::fs::write(dir.path().join(HIJRI_FILE), "{not json").unwrap();
        assert_eq!(store.cached_hijri(), None);
    }
}
