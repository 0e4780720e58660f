pub mod invidious;
pub mod oembed;
pub mod watch_page;

use crate::errors::AppError;
use crate::metadata::types::{FetchError, VideoMetadata};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Invalid bytes become U+FFFD, the rest of the body stays usable.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Every provider call goes through this, one GET per call.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// One best-effort step of the aggregation pipeline.
#[async_trait]
pub trait EnrichmentStep: Send + Sync {
    /// Returns `Ok(Some(updated))` when the step contributed something,
    /// `Ok(None)` when it had nothing to do. Errors leave the record untouched.
    async fn enrich(
        &self,
        http: &dyn HttpGet,
        meta: &VideoMetadata,
    ) -> Result<Option<VideoMetadata>, FetchError>;

    /// Get the name of this step for logging/debugging
    fn name(&self) -> &'static str;
}

fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}

/// reqwest backed client. The timeout bounds every single provider call.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpGet for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        log::debug!("{url}: requesting");

        let resp = self.client.get(url).send().await.map_err(|err| {
            log::debug!("{url}: {err}: {:#?}", get_error(&err));
            FetchError::Transport(get_error(&err))
        })?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!("{url}: {:?}", status.to_string());
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = resp
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(get_error(&err)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}
