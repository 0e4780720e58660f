use crate::metadata::fetchers::{EnrichmentStep, HttpGet};
use crate::metadata::types::{FetchError, VideoMetadata};
use async_trait::async_trait;
use serde::Deserialize;

/// Alternate metadata API, asked only when the description is still missing.
pub struct InvidiousStep {
    base: String,
}

#[derive(Debug, Deserialize)]
struct InvidiousVideo {
    #[serde(default)]
    description: Option<serde_json::Value>,
}

impl InvidiousStep {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn request_url(&self, meta: &VideoMetadata) -> String {
        format!("{}/{}", self.base, meta.id)
    }
}

#[async_trait]
impl EnrichmentStep for InvidiousStep {
    async fn enrich(
        &self,
        http: &dyn HttpGet,
        meta: &VideoMetadata,
    ) -> Result<Option<VideoMetadata>, FetchError> {
        if meta.has_description() {
            return Ok(None);
        }

        let response = http.get(&self.request_url(meta)).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let video: InvidiousVideo = response.json()?;
        let description = video
            .description
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|d| !d.is_empty());

        Ok(description.map(|description| VideoMetadata {
            description: description.to_string(),
            ..meta.clone()
        }))
    }

    fn name(&self) -> &'static str {
        "invidious"
    }
}
