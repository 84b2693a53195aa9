use anyhow::{Context, bail};
use prayerstats_algos::YearType;
use prayerstats_types::{CalculationMethod, CalendarResponse};

pub const API_BASE: &str = "https://api.aladhan.com";

/// Used when no Hijri year is cached and the provider cannot be reached.
pub const FALLBACK_HIJRI_YEAR: &str = "1446";

#[derive(Deserialize)]
struct ErrorResponse {
    data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ConversionResponse {
    data: ConversionData,
}

#[derive(Deserialize)]
struct ConversionData {
    hijri: TodayHijri,
}

/// Today's date in the Hijri calendar, as cached between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayHijri {
    pub date: Option<String>,
    pub year: String,
}

/// One calendar request. Identical requests produce identical URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRequest {
    pub year_type: YearType,
    pub year: String,
    pub latitude: f64,
    pub longitude: f64,
    pub method: CalculationMethod,
}

impl CalendarRequest {
    fn path(&self) -> &'static str {
        match self.year_type {
            YearType::Gregorian => "calendar",
            YearType::Hijri => "hijriCalendar",
        }
    }

    pub fn url(&self, base: &str) -> String {
        format!(
            "{}/v1/{}/{}?latitude={}&longitude={}&method={}",
            base.trim_end_matches('/'),
            self.path(),
            self.year,
            self.latitude,
            self.longitude,
            self.method.query_value()
        )
    }
}

pub struct AladhanClient {
    client: reqwest::Client,
    base_url: String,
}

impl AladhanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn request_url(&self, request: &CalendarRequest) -> String {
        request.url(&self.base_url)
    }

    pub async fn calendar(&self, request: &CalendarRequest) -> anyhow::Result<CalendarResponse> {
        let url = self.request_url(request);
        info!("Fetching prayer times: {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to reach prayer times provider")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "Failed to fetch prayer times ({status}): {}",
                provider_message(&body)
            );
        }

        resp.json().await.context("invalid prayer times response")
    }

    pub async fn today_hijri(&self) -> anyhow::Result<TodayHijri> {
        let resp = self
            .client
            .get(format!("{}/v1/gToH", self.base_url.trim_end_matches('/')))
            .send()
            .await
            .context("failed to reach date conversion endpoint")?;

        if !resp.status().is_success() {
            bail!("date conversion failed ({})", resp.status());
        }

        let conversion: ConversionResponse =
            resp.json().await.context("invalid date conversion response")?;
        debug!("Current Hijri year: {}", conversion.data.hijri.year);
        Ok(conversion.data.hijri)
    }
}

/// The provider reports failures as `{ "data": "<message>" }`.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            data: Some(serde_json::Value::String(message)),
        }) => message,
        Ok(ErrorResponse { data: Some(other) }) => other.to_string(),
        _ => String::from("Unknown error occurred"),
    }
}
