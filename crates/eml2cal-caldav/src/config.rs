//! CalDAV client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{CaldavError, CaldavResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between successive uploads.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Connection settings for a CalDAV calendar collection.
#[derive(Debug, Clone)]
pub struct CaldavConfig {
    /// URL of the calendar collection events are uploaded into.
    pub calendar_url: Url,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Delay between successive uploads.
    pub pacing: Duration,
}

impl CaldavConfig {
    pub fn new(calendar_url: &str, username: &str, password: &str) -> CaldavResult<Self> {
        let calendar_url = Url::parse(calendar_url).map_err(|source| CaldavError::InvalidUrl {
            url: calendar_url.to_string(),
            source,
        })?;
        Ok(Self {
            calendar_url,
            username: username.to_string(),
            password: password.to_string(),
            timeout: DEFAULT_TIMEOUT,
            pacing: DEFAULT_PACING,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// The calendar URL as a string.
    pub fn url_str(&self) -> &str {
        self.calendar_url.as_str()
    }
}
