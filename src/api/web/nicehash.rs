use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::api::MiningApi;
use crate::error::FetchError;

pub const DEFAULT_API_URL: &str = "https://api2.nicehash.com";

const RIGS_ENDPOINT: &str = "main/api/v2/mining/rigs2";
const ACCOUNTS_ENDPOINT: &str = "main/api/v2/accounting/accounts2";

/// NiceHash WebAPI client for the mining and accounting endpoints
pub struct NiceHashWebApi {
    client: Client,
    base_url: Url,
    timeout: Duration,
    retries: u32,
}

impl NiceHashWebApi {
    /// Create a new client rooted at `base_url`.
    ///
    /// `headers` are sent with every request; request signing, if any, is
    /// expected to be done by whoever builds them.
    pub fn new(mut base_url: Url, headers: HeaderMap) -> Result<Self, FetchError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout: Duration::from_secs(5),
            retries: 1,
        })
    }

    /// Set the timeout for API requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries for failed requests
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| FetchError::Request(e.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send a GET request to `endpoint` and decode the JSON body.
    ///
    /// Failed attempts are retried up to `retries` times; the error of the
    /// final attempt is returned.
    pub async fn send_command<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint_url(endpoint, query)?;
        let mut attempt = 0;

        loop {
            match self.attempt(&url).await {
                Ok(data) => return Ok(data),
                Err(e) if attempt < self.retries => {
                    debug!(%url, attempt, error = %e, "NiceHash request failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self.execute_request(url.clone()).await?;
        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Execute the actual HTTP request
    async fn execute_request(&self, url: Url) -> Result<Response, FetchError> {
        let request = self
            .client
            .get(url)
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        timeout(self.timeout, self.client.execute(request))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout)
                } else {
                    FetchError::Network(e.to_string())
                }
            })
    }
}

#[async_trait]
impl MiningApi for NiceHashWebApi {
    async fn fetch_rigs(&self) -> Result<Value, FetchError> {
        self.send_command(RIGS_ENDPOINT, &[]).await
    }

    async fn fetch_account(&self, fiat: &str) -> Result<Value, FetchError> {
        self.send_command(ACCOUNTS_ENDPOINT, &[("fiat", fiat)]).await
    }
}
