//! Reqwest-backed [`UserGateway`] adapter.
//!
//! The adapter owns transport details only: URL building, status mapping, and
//! JSON decoding. Session cookies set by `POST /auth/login` are kept in the
//! client's cookie store, so a shared client authenticates `PATCH` and
//! profile requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::debug;

use crate::error::GatewayError;
use crate::gateway::UserGateway;
use crate::model::{UserPayload, UserProfile};

/// HTTP client for the user service.
#[derive(Debug, Clone)]
pub struct ApiUserGateway {
    client: Client,
    base_url: Url,
}

impl ApiUserGateway {
    /// Build an adapter with its own cookie-keeping client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing client, for example one that already signed in.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|err| GatewayError::other(format!("invalid endpoint {path:?}: {err}")))
    }
}

fn map_transport_error(err: &reqwest::Error) -> GatewayError {
    debug!(error = %err, "user service request failed");
    GatewayError::other(err.to_string())
}

fn map_status(status: StatusCode) -> Result<(), GatewayError> {
    match status {
        status if status.is_success() => Ok(()),
        StatusCode::CONFLICT => Err(GatewayError::Conflict),
        other => Err(GatewayError::other(format!("unexpected status {other}"))),
    }
}

fn check(response: &Response) -> Result<(), GatewayError> {
    map_status(response.status())
}

#[async_trait]
impl UserGateway for ApiUserGateway {
    async fn create(&self, payload: &UserPayload) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.endpoint("users")?)
            .json(payload)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        check(&response)
    }

    async fn update(&self, id: &str, payload: &UserPayload) -> Result<(), GatewayError> {
        let response = self
            .client
            .patch(self.endpoint(&format!("users/{id}"))?)
            .json(payload)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        check(&response)
    }

    async fn current_profile(&self) -> Result<UserProfile, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("auth/profile")?)
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        check(&response)?;
        response
            .json()
            .await
            .map_err(|err| GatewayError::other(format!("invalid profile payload: {err}")))
    }
}
