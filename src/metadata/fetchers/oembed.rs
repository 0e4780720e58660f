use crate::metadata::fetchers::HttpGet;
use crate::metadata::types::FetchError;
use crate::video_id::VideoReference;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primary provider. Its failure is the only one that aborts aggregation.
pub struct OembedProvider {
    endpoint: String,
    watch_base: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OembedResponse {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl OembedProvider {
    pub fn new(endpoint: &str, watch_base: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            watch_base: watch_base.to_string(),
        }
    }

    pub fn request_url(&self, id: &VideoReference) -> Result<String, FetchError> {
        let watch_url = id.watch_url(&self.watch_base);
        url::Url::parse_with_params(&self.endpoint, &[("url", watch_url.as_str())])
            .map(|u| u.to_string())
            .map_err(|e| FetchError::Transport(format!("bad oEmbed endpoint: {e}")))
    }

    pub async fn fetch(
        &self,
        http: &dyn HttpGet,
        id: &VideoReference,
    ) -> Result<OembedResponse, FetchError> {
        let url = self.request_url(id)?;
        log::debug!("Fetching oEmbed from: {url}");

        let response = http.get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        Self::parse_payload(response.json::<Value>()?)
    }

    /// A `null` payload or a truthy `error` field means the provider refused.
    fn parse_payload(payload: Value) -> Result<OembedResponse, FetchError> {
        if payload.is_null() {
            return Err(FetchError::Provider("empty oEmbed payload".into()));
        }

        if let Some(error) = payload.get("error").filter(|e| is_truthy(e)) {
            let message = error
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| error.to_string());
            return Err(FetchError::Provider(message));
        }

        // only the string fields are interesting, anything else counts as missing
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };

        Ok(OembedResponse {
            title: field("title"),
            author_name: field("author_name"),
            author_url: field("author_url"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_url_encodes_watch_url() {
        let provider = OembedProvider::new(
            "https://noembed.com/embed",
            "https://www.youtube.com/watch?v=",
        );
        let id = VideoReference::new("dQw4w9WgXcQ").unwrap();
        assert_eq!(
            provider.request_url(&id).unwrap(),
            "https://noembed.com/embed?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_payload_fields() {
        let resp = OembedProvider::parse_payload(json!({
            "title": "Test Video",
            "author_name": "Test Author",
            "author_url": "https://www.youtube.com/@test",
            "provider_name": "YouTube",
            "type": "video"
        }))
        .unwrap();

        assert_eq!(resp.title.as_deref(), Some("Test Video"));
        assert_eq!(resp.author_name.as_deref(), Some("Test Author"));
        assert_eq!(resp.author_url.as_deref(), Some("https://www.youtube.com/@test"));
    }

    #[test]
    fn test_partial_payload() {
        let resp = OembedProvider::parse_payload(json!({"title": "", "author_name": 5})).unwrap();
        assert!(resp.title.is_none());
        assert!(resp.author_name.is_none());
        assert!(resp.author_url.is_none());
    }

    #[test]
    fn test_error_marker() {
        let err = OembedProvider::parse_payload(json!({"error": "404 Not Found"})).unwrap_err();
        assert_eq!(err, FetchError::Provider("404 Not Found".into()));

        assert!(OembedProvider::parse_payload(json!({"error": true})).is_err());
        assert!(OembedProvider::parse_payload(Value::Null).is_err());
    }

    #[test]
    fn test_falsy_error_field_is_ignored() {
        for error in [json!(null), json!(false), json!(""), json!(0)] {
            let resp = OembedProvider::parse_payload(json!({"title": "t", "error": error})).unwrap();
            assert_eq!(resp.title.as_deref(), Some("t"));
        }
    }
}
