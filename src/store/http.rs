//! Reqwest-backed user store.
//!
//! Owns transport details only: URL building, timeouts, status mapping and
//! JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{StoreError, UserStore, error_message_from_body};
use crate::model::{User, UserId};

#[derive(Debug, thiserror::Error)]
pub enum HttpStoreSetupError {
    #[error("store URL {0} cannot carry path segments")]
    CannotBeABase(Url),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Talks to `<base>/users` and `<base>/users/<id>`.
pub struct HttpUserStore {
    client: Client,
    base: Url,
}

impl HttpUserStore {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, HttpStoreSetupError> {
        if base.cannot_be_a_base() {
            return Err(HttpStoreSetupError::CannotBeABase(base));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn users_url(&self, id: Option<&UserId>) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Response, StoreError> {
        debug!(%method, %url, "calling user store");
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            warn!(%method, %url, %error, "user store unreachable");
            map_transport_error(error)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        warn!(%method, %url, status = status.as_u16(), "user store rejected request");
        Err(StoreError::Status {
            status: status.as_u16(),
            message: error_message_from_body(&body),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(&body).map_err(|error| StoreError::Decode(error.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Network(error.to_string())
    }
}

#[async_trait]
impl UserStore for HttpUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let response = self.send(Method::GET, self.users_url(None), None).await?;
        decode(response).await
    }

    async fn get(&self, id: &UserId) -> Result<Value, StoreError> {
        let response = self.send(Method::GET, self.users_url(Some(id)), None).await?;
        decode(response).await
    }

    async fn create(&self, draft: &Value) -> Result<Value, StoreError> {
        let response = self
            .send(Method::POST, self.users_url(None), Some(draft))
            .await?;
        decode(response).await
    }

    async fn update(&self, id: &UserId, record: &Value) -> Result<Value, StoreError> {
        let response = self
            .send(Method::PUT, self.users_url(Some(id)), Some(record))
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        self.send(Method::DELETE, self.users_url(Some(id)), None)
            .await
            .map(drop)
    }
}
