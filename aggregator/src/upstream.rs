//! Clients for the upstream random number services.

use crate::errors::{AggregatorError, Result};
use crate::reading::{Number, Source, UpstreamReading};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const RANDOM_PATH: &str = "/api/random";

/// A provider of one random number per call.
#[async_trait]
pub trait RandomSource: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch(&self) -> Result<UpstreamReading>;
}

#[derive(Deserialize)]
struct RandomResponse {
    number: serde_json::Value,
}

/// Fetches readings from `GET <base_url>/api/random`.
#[derive(Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    source: Source,
    url: Url,
    timeout: Option<Duration>,
}

impl HttpUpstream {
    pub fn new(
        client: reqwest::Client,
        source: Source,
        base_url: &Url,
        timeout: Option<Duration>,
    ) -> Self {
        HttpUpstream {
            client,
            source,
            url: random_url(base_url),
            timeout,
        }
    }

    async fn request(&self) -> Result<UpstreamReading> {
        let source = self.source;

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AggregatorError::UpstreamRequestFailed(source, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::UpstreamStatus(source, status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AggregatorError::UpstreamRequestFailed(source, e.to_string()))?;

        let parsed: RandomResponse = serde_json::from_slice(&body)
            .map_err(|e| AggregatorError::MalformedBody(source, e.to_string()))?;

        let value = Number::coerce(&parsed.number)
            .ok_or_else(|| AggregatorError::NotANumber(source, parsed.number.to_string()))?;

        Ok(UpstreamReading { source, value })
    }
}

#[async_trait]
impl RandomSource for HttpUpstream {
    fn source(&self) -> Source {
        self.source
    }

    /// The timeout, when set, covers the whole request/response cycle
    /// including reading the body.
    async fn fetch(&self) -> Result<UpstreamReading> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.request())
                .await
                .map_err(|_| AggregatorError::UpstreamTimeout(self.source))?,
            None => self.request().await,
        }
    }
}

/// Appends the random endpoint to a base URL, keeping any base path.
fn random_url(base_url: &Url) -> Url {
    let mut url = base_url.clone();
    let path = format!("{}{}", base_url.path().trim_end_matches('/'), RANDOM_PATH);
    url.set_path(&path);
    url.set_query(None);
    url
}
