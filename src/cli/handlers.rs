use crate::{
    config::Config,
    errors::AppError,
    metadata::{self, fetchers::HttpGet, thumbnails, Aggregator, ThumbnailTier},
    storage::{BackendLocal, StorageManager},
    video_id,
    web::{self, SharedState},
};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

const INVALID_LINK: &str = "Invalid YouTube URL. Please provide a valid YouTube video link.";
const RETRIEVAL_FAILED: &str =
    "An error occurred while retrieving the video details. Please try again after some time.";

/// Turn the two blocking failures into the messages the user sees.
fn user_message(err: AppError) -> anyhow::Error {
    match err {
        AppError::InvalidReference => anyhow::anyhow!(INVALID_LINK),
        AppError::AggregationFailed(reason) => {
            log::debug!("aggregation failed: {reason}");
            anyhow::anyhow!(RETRIEVAL_FAILED)
        }
        other => anyhow::anyhow!(other),
    }
}

pub fn handle_id(url: &str) -> Result<()> {
    let id = video_id::extract(url).map_err(user_message)?;
    println!("{id}");
    Ok(())
}

pub async fn handle_fetch(aggregator: &Aggregator, url: &str, report: bool) -> Result<()> {
    let (meta, agg_report) = metadata::fetch_video(aggregator, url)
        .await
        .map_err(user_message)?;

    println!("{}", serde_json::to_string_pretty(&meta)?);

    if report {
        eprintln!("{}", serde_json::to_string_pretty(&agg_report)?);
    }
    Ok(())
}

pub fn handle_thumbnails(config: &Config, url: &str) -> Result<()> {
    let id = video_id::extract(url).map_err(user_message)?;
    let set = thumbnails::thumbnail_set(&config.providers.thumbnail_host, &id);

    for (tier, url) in set.iter() {
        println!("{tier}\t{url}");
    }
    Ok(())
}

pub async fn handle_download(
    aggregator: &Aggregator,
    url: &str,
    tier: ThumbnailTier,
    output: Option<PathBuf>,
) -> Result<()> {
    let id = video_id::extract(url).map_err(user_message)?;
    let image_url = thumbnails::thumbnail_url(aggregator.thumbnail_host(), &id, tier);

    let resp = aggregator
        .http()
        .get(&image_url)
        .await
        .with_context(|| format!("failed to download {image_url}"))?;

    if !resp.is_success() {
        bail!("{tier} thumbnail is not available for {id} (status {})", resp.status);
    }

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{id}-{tier}.jpg")));
    let file_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .context("output must name a file")?
        .to_string();
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let store = BackendLocal::new(&dir)?;
    store.write(&file_name, &resp.body)?;

    log::info!("saved {image_url} to {}", output.display());
    println!("{}", output.display());
    Ok(())
}

pub async fn handle_daemon(
    aggregator: Aggregator,
    config: &Config,
    listen: Option<String>,
) -> Result<()> {
    let listen_addr = listen.unwrap_or_else(|| config.listen_addr.clone());
    let state = Arc::new(SharedState::new(aggregator, config));
    web::serve(state, &listen_addr).await
}
