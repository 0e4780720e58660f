use super::stub::*;
use crate::errors::AppError;
use crate::session::{Session, ViewState};
use serde_json::json;
use std::time::Duration;

fn primary(stub: &StubHttp, id: &str, title: &str) {
    stub.json(&oembed_url(id), 200, json!({"title": title, "author_name": "someone"}));
}

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_request_does_not_overwrite_latest() {
    let stub = StubHttp::new();
    primary(&stub, VIDEO_ID, "first");
    stub.delay(&oembed_url(VIDEO_ID), Duration::from_secs(5));
    primary(&stub, OTHER_VIDEO_ID, "second");

    let aggregator = aggregator(&stub);
    let session = Session::new();

    let first_link = watch_link(VIDEO_ID);
    let second_link = watch_link(OTHER_VIDEO_ID);

    let (first, second) = tokio::join!(
        session.submit(&aggregator, &first_link),
        session.submit(&aggregator, &second_link),
    );

    // each caller still gets its own answer
    assert_eq!(first.unwrap().title, "first");
    assert_eq!(second.unwrap().title, "second");

    match session.state().await {
        ViewState::Ready(meta) => assert_eq!(meta.title, "second"),
        other => panic!("expected the second result, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_link_is_published_as_failure() {
    let stub = StubHttp::new();
    let aggregator = aggregator(&stub);
    let session = Session::new();

    let res = session.submit(&aggregator, "not a link").await;

    assert!(matches!(res, Err(AppError::InvalidReference)));
    assert_eq!(
        session.state().await,
        ViewState::Failed(AppError::InvalidReference.to_string())
    );
}

#[tokio::test]
async fn test_new_request_replaces_previous_result() {
    let stub = StubHttp::new();
    primary(&stub, VIDEO_ID, "first");
    let aggregator = aggregator(&stub);
    let session = Session::new();

    session
        .submit(&aggregator, &watch_link(VIDEO_ID))
        .await
        .unwrap();
    assert!(matches!(session.state().await, ViewState::Ready(_)));

    let _ = session.submit(&aggregator, &watch_link(OTHER_VIDEO_ID)).await;
    assert!(matches!(session.state().await, ViewState::Failed(_)));
}
