//! Client configuration.

use crate::court::CourtType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production base URL for district courts.
pub const DISTRICT_COURT_BASE_URL: &str = "https://app.ecourts.gov.in/ecourt_mobile_DC/";

/// Production base URL for high courts.
pub const HIGH_COURT_BASE_URL: &str = "https://app.ecourts.gov.in/ecourt_mobile_HC/";

/// User agent of the mobile client the upstream expects.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Linux; Android 10; SM-G975F) AppleWebKit/537.36";

/// Base URL per court type. Endpoint names are appended verbatim, so URLs end with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrls {
    /// District court deployment.
    pub district_court: String,
    /// High court deployment.
    pub high_court: String,
}

impl BaseUrls {
    /// Base URL for `court`.
    pub fn get(&self, court: CourtType) -> &str {
        match court {
            CourtType::DistrictCourt => &self.district_court,
            CourtType::HighCourt => &self.high_court,
        }
    }

    fn set(&mut self, court: CourtType, url: String) {
        match court {
            CourtType::DistrictCourt => self.district_court = url,
            CourtType::HighCourt => self.high_court = url,
        }
    }
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            district_court: DISTRICT_COURT_BASE_URL.into(),
            high_court: HIGH_COURT_BASE_URL.into(),
        }
    }
}

/// Configuration shared by the transport and session layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Upstream base URLs.
    pub base_urls: BaseUrls,
    /// Per-request deadline in milliseconds.
    pub request_timeout_ms: u64,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Client version reported at registration.
    pub client_version: String,
    /// Device identifier used in the `uid` field.
    pub device_id: String,
    /// Application identifier used in the `uid` field.
    pub app_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_urls: BaseUrls::default(),
            request_timeout_ms: 30_000,
            user_agent: DEFAULT_USER_AGENT.into(),
            client_version: "3.0".into(),
            device_id: "324456".into(),
            app_id: "in.gov.ecourts.eCourtsServices".into(),
        }
    }
}

impl ClientConfig {
    /// Override the base URL for one court type. A missing trailing `/` is added.
    pub fn with_base_url(mut self, court: CourtType, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_urls.set(court, url);
        self
    }

    /// Override the per-request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Full URL of `endpoint` for `court`.
    pub fn endpoint(&self, court: CourtType, endpoint: &str) -> String {
        format!("{}{}", self.base_urls.get(court), endpoint)
    }

    /// `uid` field value for `device` (`"<device>:<app_id>"`).
    pub fn uid(&self, device: &str) -> String {
        format!("{}:{}", device, self.app_id)
    }

    /// `uid` for the configured device.
    pub fn default_uid(&self) -> String {
        self.uid(&self.device_id)
    }

    /// Reject values that would make every exchange fail.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            return Err(Error::InvalidConfig("request_timeout_ms must be > 0".into()));
        }
        for court in CourtType::ALL {
            let url = self.base_urls.get(court);
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfig(format!(
                    "base URL for {court} must be http(s): {url}"
                )));
            }
        }
        if self.device_id.is_empty() || self.app_id.is_empty() {
            return Err(Error::InvalidConfig("device_id and app_id are required".into()));
        }
        Ok(())
    }
}
