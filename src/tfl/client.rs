use crate::error::FetchError;
use crate::tfl::types::{ArrivalRecord, LineRecord, RouteSequence};

const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Thin client over the three TfL unified-API endpoints the pipeline
/// consumes. One instance is shared across all concurrent per-line fetches.
#[derive(Debug, Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: String,
    app_key: Option<String>,
}

impl TflClient {
    pub fn new(app_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, app_key)
    }

    pub fn with_base_url(base_url: &str, app_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_key,
        }
    }

    /// `/Line/Mode/tube` — the set of lines to track, in provider order.
    pub async fn tube_lines(&self) -> Result<Vec<LineRecord>, FetchError> {
        self.get_json(&format!("{}/Line/Mode/tube", self.base_url))
            .await
    }

    /// `/Line/{id}/Route/Sequence/outbound` — stations and geometry.
    pub async fn route_sequence(&self, line_id: &str) -> Result<RouteSequence, FetchError> {
        self.get_json(&format!(
            "{}/Line/{}/Route/Sequence/outbound",
            self.base_url, line_id
        ))
        .await
    }

    /// `/Line/{id}/Arrivals` — current predictions for the line.
    pub async fn arrivals(&self, line_id: &str) -> Result<Vec<ArrivalRecord>, FetchError> {
        self.get_json(&format!("{}/Line/{}/Arrivals", self.base_url, line_id))
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let mut request = self.http.get(url);
        if let Some(key) = &self.app_key {
            request = request.query(&[("app_key", key.as_str())]);
        }
        // Transport is trusted to be reachable; the body content is not.
        // Decoding through serde_json keeps malformed content as a typed
        // error distinct from transport failures.
        let body = request.send().await?.error_for_status()?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
