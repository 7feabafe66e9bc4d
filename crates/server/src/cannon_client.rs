//! Ion cannon HTTP client implementation.

use std::time::Duration;

use async_trait::async_trait;
use battlestation_runtime::{CannonClient, CannonStatus, ClientError, FireRequest, FireResponse};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Cannon client speaking the endpoints' JSON API over HTTP.
///
/// One client is shared by every cannon; the `location` passed to each call is
/// the cannon's base URL.
#[derive(Debug, Clone)]
pub struct HttpCannonClient {
    http_client: reqwest::Client,
}

impl HttpCannonClient {
    /// Creates a client whose every call is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    fn url(location: &str, path: &str) -> String {
        format!("{}/{}", location.trim_end_matches('/'), path)
    }

    /// Reads the body and decodes it, treating anything but 200 as an error.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ClientError::Request(err.to_string()))?;

        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CannonClient for HttpCannonClient {
    async fn status(&self, location: &str) -> Result<CannonStatus, ClientError> {
        let response = self
            .http_client
            .get(Self::url(location, "status"))
            .send()
            .await
            .map_err(|err| ClientError::Request(err.to_string()))?;

        Self::decode(response).await
    }

    async fn fire(
        &self,
        location: &str,
        request: &FireRequest,
    ) -> Result<FireResponse, ClientError> {
        tracing::debug!(location, x = request.target.x, y = request.target.y, "sending fire order");

        let response = self
            .http_client
            .post(Self::url(location, "fire"))
            .json(request)
            .send()
            .await
            .map_err(|err| ClientError::Request(err.to_string()))?;

        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        assert_eq!(
            HttpCannonClient::url("http://localhost:3001/", "status"),
            "http://localhost:3001/status"
        );
        assert_eq!(
            HttpCannonClient::url("http://localhost:3001", "fire"),
            "http://localhost:3001/fire"
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let client = HttpCannonClient::new(Duration::from_millis(200)).expect("client");
        // Nothing listens on the discard port.
        let err = client.status("http://127.0.0.1:9").await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
    }
}
