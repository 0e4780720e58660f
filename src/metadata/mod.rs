pub mod fetchers;
pub mod parse;
pub mod thumbnails;
pub mod types;

pub use types::{
    AggregationReport, StepReport, StepStatus, ThumbnailSet, ThumbnailTier, VideoMetadata,
};

use crate::config::{Config, ProvidersConfig, PublishDate};
use crate::errors::AppError;
use crate::video_id::{self, VideoReference};
use fetchers::invidious::InvidiousStep;
use fetchers::oembed::{OembedProvider, OembedResponse};
use fetchers::watch_page::WatchPageStep;
use fetchers::{EnrichmentStep, HttpGet, ReqwestHttp};
use std::sync::Arc;
use std::time::Instant;
use types::{DESCRIPTION_SENTINEL, NOT_AVAILABLE, UNKNOWN_CHANNEL, UNKNOWN_CHANNEL_ID};

/// Supplies `publish_date`. The providers never report the real date,
/// so the default keeps the request time.
pub trait PublishDateSource: Send + Sync {
    fn publish_date(&self, id: &VideoReference) -> String;
}

pub struct RequestTime;

impl PublishDateSource for RequestTime {
    fn publish_date(&self, _id: &VideoReference) -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }
}

pub struct UnknownDate;

impl PublishDateSource for UnknownDate {
    fn publish_date(&self, _id: &VideoReference) -> String {
        NOT_AVAILABLE.to_string()
    }
}

impl PublishDate {
    pub fn source(&self) -> Box<dyn PublishDateSource> {
        match self {
            PublishDate::RequestTime => Box::new(RequestTime),
            PublishDate::Unknown => Box::new(UnknownDate),
        }
    }
}

/// Runs the primary provider, then every enrichment step in order.
pub struct Aggregator {
    http: Arc<dyn HttpGet>,
    primary: OembedProvider,
    steps: Vec<Box<dyn EnrichmentStep>>,
    thumbnail_host: String,
    watch_base: String,
    publish_date: Box<dyn PublishDateSource>,
}

impl Aggregator {
    pub fn new(
        http: Arc<dyn HttpGet>,
        providers: &ProvidersConfig,
        publish_date: Box<dyn PublishDateSource>,
    ) -> Self {
        // order matters: the secondary api only runs when the page had no description
        let steps: Vec<Box<dyn EnrichmentStep>> = vec![
            Box::new(WatchPageStep::new(
                &providers.relay_prefix,
                &providers.watch_base,
            )),
            Box::new(InvidiousStep::new(&providers.secondary_base)),
        ];

        Self {
            http,
            primary: OembedProvider::new(&providers.oembed_endpoint, &providers.watch_base),
            steps,
            thumbnail_host: providers.thumbnail_host.clone(),
            watch_base: providers.watch_base.clone(),
            publish_date,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = ReqwestHttp::new(config.request_timeout(), &config.user_agent)?;
        Ok(Self::new(
            Arc::new(http),
            &config.providers,
            config.publish_date.source(),
        ))
    }

    pub fn http(&self) -> &dyn HttpGet {
        self.http.as_ref()
    }

    pub fn thumbnail_host(&self) -> &str {
        &self.thumbnail_host
    }

    /// Record built from the primary payload, everything else at its fallback.
    fn seed(&self, id: &VideoReference, oembed: OembedResponse) -> VideoMetadata {
        VideoMetadata {
            title: oembed
                .title
                .unwrap_or_else(|| format!("YouTube Video ({id})")),
            description: DESCRIPTION_SENTINEL.to_string(),
            publish_date: self.publish_date.publish_date(id),
            channel_name: oembed
                .author_name
                .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
            channel_id: UNKNOWN_CHANNEL_ID.to_string(),
            channel_url: oembed
                .author_url
                .unwrap_or_else(|| id.watch_url(&self.watch_base)),
            view_count: NOT_AVAILABLE.to_string(),
            like_count: NOT_AVAILABLE.to_string(),
            duration: NOT_AVAILABLE.to_string(),
            thumbnails: thumbnails::thumbnail_set(&self.thumbnail_host, id),
            tags: Vec::new(),
            hashtags: Vec::new(),
            id: id.clone(),
        }
    }

    /// Only a failing primary provider is fatal. Every later step degrades
    /// to the record it was given.
    pub async fn aggregate(
        &self,
        id: &VideoReference,
    ) -> Result<(VideoMetadata, AggregationReport), AppError> {
        let started = Instant::now();
        let mut report = AggregationReport::default();

        let step_started = Instant::now();
        let oembed = match self.primary.fetch(self.http.as_ref(), id).await {
            Ok(oembed) => oembed,
            Err(e) => {
                log::warn!("fetcher=oEmbed outcome=error err={e}");
                return Err(AppError::AggregationFailed(e.to_string()));
            }
        };
        log::info!("fetcher=oEmbed outcome=success id={id}");
        report.steps.push(StepReport {
            name: "oEmbed".into(),
            status: StepStatus::Success,
            duration_ms: step_started.elapsed().as_millis() as u64,
        });

        let mut meta = self.seed(id, oembed);

        for step in &self.steps {
            let name = step.name();
            let step_started = Instant::now();

            let status = match step.enrich(self.http.as_ref(), &meta).await {
                Ok(Some(updated)) => {
                    log::info!("fetcher={name} outcome=success");
                    meta = updated;
                    StepStatus::Success
                }
                Ok(None) => {
                    log::info!("fetcher={name} outcome=skip");
                    StepStatus::Skip
                }
                Err(e) => {
                    log::warn!("fetcher={name} outcome=error err={e}");
                    StepStatus::Degraded(e.to_string())
                }
            };

            report.steps.push(StepReport {
                name: name.into(),
                status,
                duration_ms: step_started.elapsed().as_millis() as u64,
            });
        }

        report.duration_ms = started.elapsed().as_millis() as u64;

        Ok((meta, report))
    }
}

/// Extract the identifier from free text and aggregate its metadata.
pub async fn fetch_video(
    aggregator: &Aggregator,
    input: &str,
) -> Result<(VideoMetadata, AggregationReport), AppError> {
    let id = video_id::extract(input)?;
    aggregator.aggregate(&id).await
}
