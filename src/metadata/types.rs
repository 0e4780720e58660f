use crate::video_id::VideoReference;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Description placeholder used until a provider supplies the real text.
pub const DESCRIPTION_SENTINEL: &str = "Details are not available.";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_CHANNEL: &str = "Unknown channel.";
pub const UNKNOWN_CHANNEL_ID: &str = "unknown";

/// Error types for provider calls. None of these are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection refused, dns, timeout
    Transport(String),
    /// Provider answered with a non-success status
    Status(u16),
    /// Body was not what the provider promised
    Decode(String),
    /// Payload carried an explicit error marker
    Provider(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport: {msg}"),
            FetchError::Status(code) => write!(f, "status: {code}"),
            FetchError::Decode(msg) => write!(f, "decode: {msg}"),
            FetchError::Provider(msg) => write!(f, "provider: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailTier {
    Default,
    Medium,
    High,
    Standard,
    Maxres,
}

impl ThumbnailTier {
    pub const ALL: [ThumbnailTier; 5] = [
        ThumbnailTier::Default,
        ThumbnailTier::Medium,
        ThumbnailTier::High,
        ThumbnailTier::Standard,
        ThumbnailTier::Maxres,
    ];

    /// File name (without extension) on the image host.
    pub fn suffix(&self) -> &'static str {
        match self {
            ThumbnailTier::Default => "default",
            ThumbnailTier::Medium => "mqdefault",
            ThumbnailTier::High => "hqdefault",
            ThumbnailTier::Standard => "sddefault",
            ThumbnailTier::Maxres => "maxresdefault",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThumbnailTier::Default => "default",
            ThumbnailTier::Medium => "medium",
            ThumbnailTier::High => "high",
            ThumbnailTier::Standard => "standard",
            ThumbnailTier::Maxres => "maxres",
        }
    }
}

impl std::fmt::Display for ThumbnailTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ThumbnailTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThumbnailTier::ALL
            .into_iter()
            .find(|tier| tier.name() == s.to_lowercase())
            .ok_or_else(|| {
                format!("unknown thumbnail tier {s:?}, expected one of default, medium, high, standard, maxres")
            })
    }
}

/// Thumbnail urls keyed by tier, in tier order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    pub default: String,
    pub medium: String,
    pub high: String,
    /// The platform does not generate these for every video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxres: Option<String>,
}

impl ThumbnailSet {
    pub fn get(&self, tier: ThumbnailTier) -> Option<&str> {
        match tier {
            ThumbnailTier::Default => Some(&self.default),
            ThumbnailTier::Medium => Some(&self.medium),
            ThumbnailTier::High => Some(&self.high),
            ThumbnailTier::Standard => self.standard.as_deref(),
            ThumbnailTier::Maxres => self.maxres.as_deref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThumbnailTier, &str)> {
        ThumbnailTier::ALL
            .into_iter()
            .filter_map(|tier| self.get(tier).map(|url| (tier, url)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: VideoReference,
    pub title: String,
    pub description: String,
    /// Filled by the configured publish date source, request time by default
    pub publish_date: String,
    pub channel_name: String,
    pub channel_id: String,
    pub channel_url: String,
    pub view_count: String,
    pub like_count: String,
    pub duration: String,
    pub thumbnails: ThumbnailSet,
    pub tags: Vec<String>,
    pub hashtags: Vec<String>,
}

impl VideoMetadata {
    pub fn has_description(&self) -> bool {
        self.description != DESCRIPTION_SENTINEL
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AggregationReport {
    pub steps: Vec<StepReport>,
    pub duration_ms: u64,
}

impl AggregationReport {
    pub fn degraded(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Degraded(_)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail")]
pub enum StepStatus {
    Success,
    Skip,
    /// Provider failed, record kept as it was
    Degraded(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parsing() {
        assert_eq!("maxres".parse::<ThumbnailTier>(), Ok(ThumbnailTier::Maxres));
        assert_eq!("HIGH".parse::<ThumbnailTier>(), Ok(ThumbnailTier::High));
        assert!("mqdefault".parse::<ThumbnailTier>().is_err());
    }

    #[test]
    fn test_thumbnail_set_skips_missing_tiers() {
        let set = ThumbnailSet {
            default: "d".into(),
            medium: "m".into(),
            high: "h".into(),
            standard: None,
            maxres: Some("x".into()),
        };

        let tiers: Vec<_> = set.iter().map(|(tier, _)| tier).collect();
        assert_eq!(
            tiers,
            vec![
                ThumbnailTier::Default,
                ThumbnailTier::Medium,
                ThumbnailTier::High,
                ThumbnailTier::Maxres
            ]
        );

        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("standard").is_none());
        assert_eq!(json["maxres"], "x");
    }

    #[test]
    fn test_step_status_serialization() {
        let json = serde_json::to_value(StepStatus::Degraded("status: 503".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "Degraded", "detail": "status: 503"}));
    }
}
