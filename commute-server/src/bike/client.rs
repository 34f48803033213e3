//! HelloCycling GBFS feed client.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::BikeError;

/// Default URL for the station-information feed.
const DEFAULT_INFO_URL: &str =
    "https://api-public.odpt.org/api/v4/gbfs/hellocycling/station_information.json";

/// Default URL for the station-status feed.
const DEFAULT_STATUS_URL: &str =
    "https://api-public.odpt.org/api/v4/gbfs/hellocycling/station_status.json";

/// Static station metadata from the information feed.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInformation {
    pub station_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// Real-time availability from the status feed.
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatus {
    pub station_id: String,
    #[serde(default)]
    pub num_bikes_available: i64,
    /// Absent at some stations; capacity-derived fallback applies then.
    #[serde(default)]
    pub num_docks_available: Option<i64>,
}

/// GBFS documents wrap their payload in `{"data": {"stations": [...]}}`.
#[derive(Debug, Deserialize)]
struct FeedEnvelope<T> {
    data: FeedData<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct FeedData<T> {
    #[serde(default)]
    stations: Vec<T>,
}

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsConfig {
    /// Station-information feed URL
    pub info_url: String,
    /// Station-status feed URL
    pub status_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GbfsConfig {
    fn default() -> Self {
        Self {
            info_url: DEFAULT_INFO_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl GbfsConfig {
    /// Point both feeds at custom URLs (for testing).
    pub fn with_urls(mut self, info: impl Into<String>, status: impl Into<String>) -> Self {
        self.info_url = info.into();
        self.status_url = status.into();
        self
    }
}

/// Client for the two GBFS feeds.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
    info_url: String,
    status_url: String,
}

impl GbfsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GbfsConfig) -> Result<Self, BikeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            info_url: config.info_url,
            status_url: config.status_url,
        })
    }

    /// Fetch the station-information feed.
    pub async fn fetch_info(&self) -> Result<Vec<StationInformation>, BikeError> {
        self.fetch_stations(&self.info_url).await
    }

    /// Fetch the station-status feed.
    pub async fn fetch_status(&self) -> Result<Vec<StationStatus>, BikeError> {
        self.fetch_stations(&self.status_url).await
    }

    /// Fetch both feeds for one aggregation pass.
    pub async fn fetch_both(
        &self,
    ) -> Result<(Vec<StationInformation>, Vec<StationStatus>), BikeError> {
        let info = self.fetch_info().await?;
        let status = self.fetch_status().await?;
        Ok((info, status))
    }

    async fn fetch_stations<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, BikeError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(BikeError::Feed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: FeedEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| BikeError::Json {
                message: e.to_string(),
            })?;

        Ok(envelope.data.stations)
    }
}
