use crate::metadata::fetchers::{EnrichmentStep, HttpGet};
use crate::metadata::parse;
use crate::metadata::types::{FetchError, VideoMetadata};
use async_trait::async_trait;

/// Mines description, tags and hashtags out of the rendered watch page,
/// fetched through a relay that bypasses cross-origin restrictions.
pub struct WatchPageStep {
    relay_prefix: String,
    watch_base: String,
}

impl WatchPageStep {
    pub fn new(relay_prefix: &str, watch_base: &str) -> Self {
        Self {
            relay_prefix: relay_prefix.to_string(),
            watch_base: watch_base.to_string(),
        }
    }

    pub fn request_url(&self, meta: &VideoMetadata) -> String {
        format!("{}{}", self.relay_prefix, meta.id.watch_url(&self.watch_base))
    }

    fn apply_page(body: &str, meta: &VideoMetadata) -> Option<VideoMetadata> {
        let description = parse::page_description(body);
        let tags = parse::page_keywords(body);

        if description.is_none() && tags.is_none() {
            return None;
        }

        let mut updated = meta.clone();
        if let Some(description) = description {
            updated.description = description;
        }
        if let Some(tags) = tags {
            updated.tags = tags;
        }
        // secondary descriptions never contribute hashtags
        updated.hashtags = parse::hashtags(&updated.description);
        Some(updated)
    }
}

#[async_trait]
impl EnrichmentStep for WatchPageStep {
    async fn enrich(
        &self,
        http: &dyn HttpGet,
        meta: &VideoMetadata,
    ) -> Result<Option<VideoMetadata>, FetchError> {
        let response = http.get(&self.request_url(meta)).await?;

        if response.status != 200 {
            return Err(FetchError::Status(response.status));
        }

        Ok(Self::apply_page(&response.text(), meta))
    }

    fn name(&self) -> &'static str {
        "watch page"
    }
}
