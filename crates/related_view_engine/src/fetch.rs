use std::time::Duration;

use futures_util::StreamExt;
use related_view_core::{ParentKey, RawRecord};
use url::Url;
use view_logging::view_debug;

use crate::{FailureKind, FetchError};

/// Path segments appended to the base url: `{base}/accounts/{parent}/opportunities`.
const PARENT_SEGMENT: &str = "accounts";
const RELATED_SEGMENT: &str = "opportunities";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Backend query boundary: loads the records related to one parent.
#[async_trait::async_trait]
pub trait RelatedFetcher: Send + Sync {
    async fn fetch_related(&self, parent_key: &ParentKey) -> Result<Vec<RawRecord>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    base_url: Url,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(base_url: &str, settings: FetchSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url,
            settings,
            client,
        })
    }

    fn endpoint(&self, parent_key: &ParentKey) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend([PARENT_SEGMENT, parent_key.as_str(), RELATED_SEGMENT]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl RelatedFetcher for ReqwestFetcher {
    async fn fetch_related(&self, parent_key: &ParentKey) -> Result<Vec<RawRecord>, FetchError> {
        let url = self.endpoint(parent_key)?;
        view_debug!("Fetching related records parent={} url={}", parent_key, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let records: Vec<RawRecord> = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        view_debug!(
            "Fetched {} related records for parent={}",
            records.len(),
            parent_key
        );
        Ok(records)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
