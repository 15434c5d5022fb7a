//! Backend access for driverboard.
//!
//! The board talks to its backend only through the [`DriverApi`] trait. The
//! production implementation, [`HttpDriverApi`], speaks the REST contract:
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET    | `/drivers` | | array of drivers |
//! | POST   | `/drivers` | [`DriverPayload`] | created driver |
//! | PUT    | `/drivers/:id` | [`DriverPayload`] | updated driver |
//! | DELETE | `/drivers/:id` | | ignored |

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::driver::{Driver, DriverId, DriverPayload};
use crate::error::{Error, Result};

/// The REST collection the board reads and mutates.
///
/// Implementors perform exactly one request per call; retries, caching and
/// reconciliation are out of scope.
#[async_trait]
pub trait DriverApi: Send + Sync {
    /// Fetch every driver, in the backend's order.
    async fn list(&self) -> Result<Vec<Driver>>;

    /// Create a driver. The backend assigns its id.
    async fn create(&self, payload: &DriverPayload) -> Result<Driver>;

    /// Replace the editable fields of a driver.
    async fn update(&self, id: DriverId, payload: &DriverPayload) -> Result<Driver>;

    /// Remove a driver.
    async fn delete(&self, id: DriverId) -> Result<()>;
}

/// [`DriverApi`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpDriverApi {
    http: reqwest::Client,
    collection: Url,
    resource: String,
}

impl HttpDriverApi {
    /// Create a client from the `[api]` configuration section.
    ///
    /// A `timeout_secs` of 0 leaves requests without a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let collection = config.collection_url()?;

        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder.build().map_err(|source| Error::Http {
            endpoint: "client_init".into(),
            source,
        })?;

        debug!("Driver collection at {}", collection);
        Ok(Self {
            http,
            collection,
            resource: config.resource.trim_matches('/').to_string(),
        })
    }

    /// URL of the driver collection.
    #[must_use]
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn item_url(&self, id: DriverId) -> String {
        format!("{}/{id}", self.collection.as_str().trim_end_matches('/'))
    }

    fn endpoint(&self, method: &str, id: Option<DriverId>) -> String {
        match id {
            Some(id) => format!("{method} /{}/{id}", self.resource),
            None => format!("{method} /{}", self.resource),
        }
    }

    async fn send(
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        debug!("{}", endpoint);
        let resp = request.send().await.map_err(|source| {
            warn!("{} failed: {}", endpoint, source);
            Error::Http {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("{} returned {}", endpoint, status);
            return Err(Error::Api {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        Ok(resp)
    }

    async fn decode<T>(endpoint: String, resp: reqwest::Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        resp.json()
            .await
            .map_err(|source| Error::Decode { endpoint, source })
    }
}

#[async_trait]
impl DriverApi for HttpDriverApi {
    async fn list(&self) -> Result<Vec<Driver>> {
        let endpoint = self.endpoint("GET", None);
        let resp = Self::send(&endpoint, self.http.get(self.collection.clone())).await?;
        Self::decode(endpoint, resp).await
    }

    async fn create(&self, payload: &DriverPayload) -> Result<Driver> {
        let endpoint = self.endpoint("POST", None);
        let request = self.http.post(self.collection.clone()).json(payload);
        let resp = Self::send(&endpoint, request).await?;
        Self::decode(endpoint, resp).await
    }

    async fn update(&self, id: DriverId, payload: &DriverPayload) -> Result<Driver> {
        let endpoint = self.endpoint("PUT", Some(id));
        let request = self.http.put(self.item_url(id)).json(payload);
        let resp = Self::send(&endpoint, request).await?;
        Self::decode(endpoint, resp).await
    }

    async fn delete(&self, id: DriverId) -> Result<()> {
        let endpoint = self.endpoint("DELETE", Some(id));
        Self::send(&endpoint, self.http.delete(self.item_url(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config(base_url: &str, resource: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            resource: resource.to_string(),
            timeout_secs: 0,
        }
    }

    #[test]
    fn test_default_collection_url() {
        let api = HttpDriverApi::new(&ApiConfig::default()).unwrap();
        assert_eq!(api.collection_url().as_str(), "http://localhost:3004/drivers");
    }

    #[test]
    fn test_item_url() {
        let api = HttpDriverApi::new(&api_config("http://example.test/api/", "drivers")).unwrap();
        assert_eq!(api.item_url(DriverId(5)), "http://example.test/api/drivers/5");
    }

    #[test]
    fn test_endpoint_labels() {
        let api = HttpDriverApi::new(&api_config("http://example.test", "/drivers/")).unwrap();
        assert_eq!(api.endpoint("GET", None), "GET /drivers");
        assert_eq!(api.endpoint("DELETE", Some(DriverId(2))), "DELETE /drivers/2");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpDriverApi::new(&api_config("not a url", "drivers"));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_with_timeout() {
        let mut config = ApiConfig::default();
        config.timeout_secs = 5;
        assert!(HttpDriverApi::new(&config).is_ok());
    }
}
