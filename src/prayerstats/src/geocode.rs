use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use thiserror::Error;
use tokio::time::{Instant, sleep_until, timeout};
use tokio_util::sync::CancellationToken;

pub const GEOCODE_BASE: &str = "https://nominatim.openstreetmap.org";

const CACHE_MAX_SIZE: usize = 50;
const CACHE_EXPIRY: Duration = Duration::from_secs(30 * 60);
const RATE_LIMIT: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoding service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("geocoding request timed out")]
    Timeout,
    #[error("geocoding request was cancelled")]
    Cancelled,
    #[error("no results found for address: {0}")]
    NoResults(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct RawPlace {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    fn from_raw(raw: RawPlace) -> Option<Self> {
        Some(Self {
            latitude: raw.lat.trim().parse().ok()?,
            longitude: raw.lon.trim().parse().ok()?,
            display_name: raw.display_name,
        })
    }
}

struct CacheEntry {
    places: Vec<Place>,
    stored_at: Instant,
}

/// Query results, bounded in size and age.
#[derive(Default)]
struct GeoCache {
    entries: HashMap<String, CacheEntry>,
}

impl GeoCache {
    fn get(&mut self, query: &str, now: Instant) -> Option<Vec<Place>> {
        let entry = self.entries.get(query)?;
        if now.saturating_duration_since(entry.stored_at) < CACHE_EXPIRY {
            debug!("Geocode cache hit for {query}");
            return Some(entry.places.clone());
        }

        debug!("Removing expired geocode cache entry for {query}");
        self.entries.remove(query);
        None
    }

    fn insert(&mut self, query: &str, places: Vec<Place>, now: Instant) {
        if !self.entries.contains_key(query) && self.entries.len() >= CACHE_MAX_SIZE {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!("Geocode cache full, removed {oldest}");
                self.entries.remove(&oldest);
            }
        }

        self.entries.insert(
            query.to_owned(),
            CacheEntry {
                places,
                stored_at: now,
            },
        );
    }
}

/// Address search against a Nominatim instance.
///
/// A new search cancels the one still in flight, and requests are spaced at
/// least a second apart.
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    cache: Mutex<GeoCache>,
    last_request: Mutex<Option<Instant>>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl GeocodingClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("prayerstats/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            cache: Mutex::default(),
            last_request: Mutex::default(),
            in_flight: Mutex::default(),
        })
    }

    pub async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if let Some(places) = self.lock_cache().get(query, Instant::now()) {
            return Ok(places);
        }

        let token = cancel.child_token();
        if let Some(previous) = lock(&self.in_flight).replace(token.clone()) {
            debug!("Cancelling previous geocode request");
            previous.cancel();
        }

        let start_at = self.reserve_slot();
        let request = async {
            sleep_until(start_at).await;
            match timeout(REQUEST_TIMEOUT, self.fetch(query)).await {
                Ok(result) => result,
                Err(_) => Err(GeocodeError::Timeout),
            }
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(GeocodeError::Cancelled),
            result = request => result,
        };

        let places = result?;
        self.lock_cache().insert(query, places.clone(), Instant::now());
        Ok(places)
    }

    /// First result for `query`, or [`GeocodeError::NoResults`].
    pub async fn locate(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Place, GeocodeError> {
        self.search(query, cancel)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoResults(query.trim().to_owned()))
    }

    /// Claims the next request slot and returns when it opens.
    fn reserve_slot(&self) -> Instant {
        let mut last = lock(&self.last_request);
        let now = Instant::now();
        let slot = match *last {
            Some(previous) if previous + RATE_LIMIT > now => previous + RATE_LIMIT,
            _ => now,
        };
        *last = Some(slot);
        slot
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        info!("Geocoding {query}");
        let resp = self
            .client
            .get(format!("{}/search", self.base_url.trim_end_matches('/')))
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status()));
        }

        let raw: Vec<RawPlace> = resp.json().await?;
        debug!("Geocoder returned {} results", raw.len());
        Ok(raw.into_iter().filter_map(Place::from_raw).collect())
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, GeoCache> {
        lock(&self.cache)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
