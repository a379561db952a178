//! HTTP client for CalDAV operations.
//!
//! Two operations are needed: a REPORT calendar-query to search for
//! overlapping events, and a PUT to store a new event resource.

use reqwest::{Client, Method, Response, StatusCode};
use tracing::trace;

use crate::config::CaldavConfig;
use crate::error::{CaldavError, CaldavResult};

/// HTTP client bound to one calendar collection.
pub struct CaldavClient {
    client: Client,
    config: CaldavConfig,
}

impl CaldavClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: CaldavConfig) -> CaldavResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CaldavError::Client)?;
        Ok(Self { client, config })
    }

    /// Performs a REPORT calendar-query against the calendar collection.
    pub async fn report(&self, body: &str) -> CaldavResult<String> {
        let url = self.config.url_str();
        let method = Method::from_bytes(b"REPORT").expect("valid method");
        trace!(url = %url, "sending REPORT");
        let response = self
            .client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Depth", "1")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(body.to_string())
            .send()
            .await
            .map_err(|source| CaldavError::Network {
                url: url.to_string(),
                source,
            })?;
        self.read_body(response).await
    }

    /// Stores an event resource under the calendar collection.
    pub async fn put_event(&self, uid: &str, ics: &str) -> CaldavResult<()> {
        let url = self.event_url(uid);
        trace!(url = %url, "sending PUT");
        let response = self
            .client
            .put(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Content-Type", "text/calendar; charset=utf-8")
            .body(ics.to_string())
            .send()
            .await
            .map_err(|source| CaldavError::Network {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED {
            Err(CaldavError::Authentication)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CaldavError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn event_url(&self, uid: &str) -> String {
        let base = self.config.url_str();
        if base.ends_with('/') {
            format!("{base}{uid}.ics")
        } else {
            format!("{base}/{uid}.ics")
        }
    }

    async fn read_body(&self, response: Response) -> CaldavResult<String> {
        let status = response.status();
        trace!(status = %status, "received response");
        match status {
            StatusCode::OK | StatusCode::MULTI_STATUS => {
                response.text().await.map_err(|source| CaldavError::Network {
                    url: self.config.url_str().to_string(),
                    source,
                })
            }
            StatusCode::UNAUTHORIZED => Err(CaldavError::Authentication),
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(CaldavError::UnexpectedStatus {
                    status: s.as_u16(),
                    body,
                })
            }
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CaldavConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let config =
            CaldavConfig::new("https://caldav.example.com/cal/", "user", "pass").unwrap();
        assert!(CaldavClient::new(config).is_ok());
    }

    #[test]
    fn event_url_handles_trailing_slash() {
        let with_slash =
            CaldavConfig::new("https://caldav.example.com/cal/", "u", "p").unwrap();
        let client = CaldavClient::new(with_slash).unwrap();
        assert_eq!(
            client.event_url("abc"),
            "https://caldav.example.com/cal/abc.ics"
        );

        let without_slash =
            CaldavConfig::new("https://caldav.example.com/cal", "u", "p").unwrap();
        let client = CaldavClient::new(without_slash).unwrap();
        assert_eq!(
            client.event_url("abc"),
            "https://caldav.example.com/cal/abc.ics"
        );
    }
}
