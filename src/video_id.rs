use crate::errors::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;

pub const VIDEO_ID_LEN: usize = 11;

/// Marker tokens: short link, `v/`, `/u/<c>/`, embed and watch page.
/// The identifier runs until the next query separator or fragment.
static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtu\.be/|v/|/u/[A-Za-z0-9_]/|embed/|watch\?)\??v?=?([^#&?]*)")
        .expect("Failed to compile video id regex")
});

/// A validated 11 character video identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoReference(String);

impl VideoReference {
    pub fn new(id: &str) -> Result<Self, AppError> {
        let valid = id.len() == VIDEO_ID_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(VideoReference(id.to_string()))
        } else {
            Err(AppError::InvalidReference)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page url, e.g. `https://www.youtube.com/watch?v=<id>`.
    pub fn watch_url(&self, watch_base: &str) -> String {
        format!("{watch_base}{}", self.0)
    }
}

/// Pull the video identifier out of any string containing a recognized link.
/// First marker wins; the capture must be exactly 11 characters long.
pub fn extract(input: &str) -> Result<VideoReference, AppError> {
    let captured = VIDEO_ID_REGEX
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(AppError::InvalidReference)?;

    log::debug!("captured video id candidate {captured:?}");

    VideoReference::new(captured)
}

impl Display for VideoReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for VideoReference {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for VideoReference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoReference::new(s)
    }
}

impl TryFrom<String> for VideoReference {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VideoReference::new(&value)
    }
}

impl From<VideoReference> for String {
    fn from(id: VideoReference) -> Self {
        id.0
    }
}
