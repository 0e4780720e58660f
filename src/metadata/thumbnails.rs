use crate::metadata::types::{ThumbnailSet, ThumbnailTier};
use crate::video_id::VideoReference;

pub fn thumbnail_url(host: &str, id: &VideoReference, tier: ThumbnailTier) -> String {
    format!("{}/{id}/{}.jpg", host.trim_end_matches('/'), tier.suffix())
}

/// Template all five tiers. Nothing is requested here, a tier the platform
/// never generated shows up as a broken image for the consumer.
pub fn thumbnail_set(host: &str, id: &VideoReference) -> ThumbnailSet {
    ThumbnailSet {
        default: thumbnail_url(host, id, ThumbnailTier::Default),
        medium: thumbnail_url(host, id, ThumbnailTier::Medium),
        high: thumbnail_url(host, id, ThumbnailTier::High),
        standard: Some(thumbnail_url(host, id, ThumbnailTier::Standard)),
        maxres: Some(thumbnail_url(host, id, ThumbnailTier::Maxres)),
    }
}
