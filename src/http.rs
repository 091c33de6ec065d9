//! HTTP client wrapper for daemon requests.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use crate::api::error::classify;
use crate::error::{Error, Result};

/// HTTP client for making authenticated requests to the daemon.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            token: None,
        }
    }

    /// Create a client with a bearer token and per-request timeout.
    pub fn with_token(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            token: Some(token.into()),
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Make a GET request with query parameters.
    ///
    /// # Returns
    /// Response body as string
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .authorize(self.client.get(url).query(query))
            .send()
            .await?;
        Self::read_body(response).await
    }

    /// Make a POST request with a JSON body.
    ///
    /// # Returns
    /// Response body as string
    pub async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<String> {
        let response = self
            .authorize(self.client.post(url).json(body))
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if text.trim().is_empty() {
                return Err(Error::HttpError(status.as_u16()));
            }
            return Err(classify(&text));
        }

        Ok(text)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
