// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, error-body extraction,
// and one inherent method per backend endpoint. Every method performs
// exactly one HTTP call: no retry, no caching, no de-duplication.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{
    Ack, ApiErrorBody, HealthStatus, LightingControl, LightingStatus, SensorData, SystemStatus,
    WateringControl, WateringStatus,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for the plant-wall backend.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections across all panels.
#[derive(Debug, Clone)]
pub struct PlantWallClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl PlantWallClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the backend root (e.g. `http://localhost:5000`);
    /// endpoint paths are appended to it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/health`
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get("api/health")
            .await
            .inspect_err(|e| warn!(error = %e, "health check failed"))
    }

    /// `GET /api/status`
    pub async fn status(&self) -> Result<SystemStatus, Error> {
        self.get("api/status")
            .await
            .inspect_err(|e| warn!(error = %e, "fetching system status failed"))
    }

    /// `GET /api/lighting`
    pub async fn lighting(&self) -> Result<LightingStatus, Error> {
        self.get("api/lighting")
            .await
            .inspect_err(|e| warn!(error = %e, "fetching lighting status failed"))
    }

    /// `POST /api/lighting` with a partial control body.
    pub async fn update_lighting(&self, control: &LightingControl) -> Result<Ack, Error> {
        self.post("api/lighting", control)
            .await
            .inspect_err(|e| warn!(error = %e, "updating lighting failed"))
    }

    /// `GET /api/watering`
    pub async fn watering(&self) -> Result<WateringStatus, Error> {
        self.get("api/watering")
            .await
            .inspect_err(|e| warn!(error = %e, "fetching watering status failed"))
    }

    /// `POST /api/watering` with a partial control body.
    pub async fn update_watering(&self, control: &WateringControl) -> Result<Ack, Error> {
        self.post("api/watering", control)
            .await
            .inspect_err(|e| warn!(error = %e, "triggering watering failed"))
    }

    /// `GET /api/sensors`
    pub async fn sensors(&self) -> Result<SensorData, Error> {
        self.get("api/sensors")
            .await
            .inspect_err(|e| warn!(error = %e, "fetching sensor data failed"))
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an endpoint path onto the base URL, keeping any path prefix
    /// the base URL already carries (e.g. behind a reverse proxy).
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_body(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_body(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Decode a 2xx body, or turn a non-2xx response into `Error::Http`
    /// carrying the most human-readable message available.
    async fn parse_body<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body).map_or_else(
                |_| {
                    let trimmed = body.trim();
                    if trimmed.is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("request failed")
                            .to_owned()
                    } else {
                        preview(trimmed).to_owned()
                    }
                },
                |err| err.error,
            );
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
