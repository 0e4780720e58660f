use crate::config::ProvidersConfig;
use crate::metadata::fetchers::{HttpGet, HttpResponse};
use crate::metadata::types::FetchError;
use crate::metadata::{Aggregator, UnknownDate};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";
pub const OTHER_VIDEO_ID: &str = "abc12345678";

struct StubRoute {
    response: Result<HttpResponse, FetchError>,
    delay: Option<Duration>,
}

/// In-memory provider responses keyed by exact url. Unknown urls fail
/// like an unreachable host.
#[derive(Default)]
pub struct StubHttp {
    routes: Mutex<HashMap<String, StubRoute>>,
    requests: Mutex<Vec<String>>,
}

impl StubHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn insert(&self, url: &str, response: Result<HttpResponse, FetchError>) -> &Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            StubRoute {
                response,
                delay: None,
            },
        );
        self
    }

    pub fn json(&self, url: &str, status: u16, value: serde_json::Value) -> &Self {
        self.insert(
            url,
            Ok(HttpResponse {
                status,
                content_type: Some("application/json".into()),
                body: value.to_string().into_bytes(),
            }),
        )
    }

    pub fn body(&self, url: &str, status: u16, content_type: &str, body: &[u8]) -> &Self {
        self.insert(
            url,
            Ok(HttpResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: body.to_vec(),
            }),
        )
    }

    pub fn fail(&self, url: &str, err: FetchError) -> &Self {
        self.insert(url, Err(err))
    }

    pub fn delay(&self, url: &str, delay: Duration) -> &Self {
        if let Some(route) = self.routes.lock().unwrap().get_mut(url) {
            route.delay = Some(delay);
        }
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpGet for StubHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let (response, delay) = match self.routes.lock().unwrap().get(url) {
            Some(route) => (route.response.clone(), route.delay),
            None => (
                Err(FetchError::Transport(format!("no route to {url}"))),
                None,
            ),
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

pub fn oembed_url(id: &str) -> String {
    format!("https://noembed.com/embed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3D{id}")
}

pub fn relay_url(id: &str) -> String {
    format!("https://corsproxy.io/?https://www.youtube.com/watch?v={id}")
}

pub fn secondary_url(id: &str) -> String {
    format!("https://invidious.snopyta.org/api/v1/videos/{id}")
}

pub fn watch_link(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Aggregator on default endpoints talking to the stub, with a fixed
/// publish date so records compare equal.
pub fn aggregator(stub: &Arc<StubHttp>) -> Aggregator {
    Aggregator::new(
        stub.clone(),
        &ProvidersConfig::default(),
        Box::new(UnknownDate),
    )
}
