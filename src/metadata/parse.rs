//! Text mining on the rendered watch page and on descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

static DESCRIPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""description":\{"simpleText":"([^"]*)""#)
        .expect("Failed to compile description regex")
});

static KEYWORDS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""keywords":\[(.*?)\]"#).expect("Failed to compile keywords regex")
});

static HASHTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("Failed to compile hashtag regex"));

/// Description embedded in the page's player data, with `\n` and `\"` resolved.
/// Returns None when the token is missing or empty.
pub fn page_description(body: &str) -> Option<String> {
    let raw = DESCRIPTION_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())?;

    Some(raw.replace("\\n", "\n").replace("\\\"", "\""))
}

/// Keyword list embedded in the page. Strict JSON first, then a lenient
/// comma split for arrays that are not valid JSON.
pub fn page_keywords(body: &str) -> Option<Vec<String>> {
    let raw = KEYWORDS_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())?;

    match serde_json::from_str::<Vec<serde_json::Value>>(&format!("[{raw}]")) {
        Ok(values) => Some(
            values
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Err(err) => {
            log::debug!("keywords are not valid json ({err}), splitting on commas");
            Some(split_keywords(raw))
        }
    }
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().replace('"', ""))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Every `#word` in order of appearance. Duplicates are kept.
pub fn hashtags(description: &str) -> Vec<String> {
    HASHTAG_REGEX
        .find_iter(description)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_unescape() {
        let body = r#"var ytInitialPlayerResponse = {"description":{"simpleText":"a\nb"},"x":1}"#;
        assert_eq!(page_description(body).as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_description_stops_at_first_quote() {
        // an escaped quote ends the capture, leaving the backslash behind
        let body = r#""description":{"simpleText":"say \"hi\" now"}"#;
        assert_eq!(page_description(body).as_deref(), Some("say \\"));
    }

    #[test]
    fn test_description_missing_or_empty() {
        assert_eq!(page_description("<html></html>"), None);
        assert_eq!(page_description(r#""description":{"simpleText":""}"#), None);
    }

    #[test]
    fn test_keywords_json() {
        let body = r#"{"videoId":"abc","keywords":["x","y"],"channelId":"c"}"#;
        assert_eq!(page_keywords(body), Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_keywords_skip_non_strings() {
        let body = r#""keywords":["x",3,null,"y"]"#;
        assert_eq!(page_keywords(body), Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_keywords_fallback_split() {
        let body = r#""keywords":["x", "y",,]"#;
        assert_eq!(page_keywords(body), Some(vec!["x".to_string(), "y".to_string()]));

        let body = r#""keywords":[x , "y"]"#;
        assert_eq!(page_keywords(body), Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_keywords_missing() {
        assert_eq!(page_keywords("nothing here"), None);
        assert_eq!(page_keywords(r#""keywords":[]"#), None);
    }

    #[test]
    fn test_hashtags() {
        assert_eq!(hashtags("check #Foo and #bar_2"), vec!["#Foo", "#bar_2"]);
        assert_eq!(hashtags("#a #a #b"), vec!["#a", "#a", "#b"]);
        assert!(hashtags("no tags # here").is_empty());
    }

    #[test]
    fn test_hashtags_are_ascii_words() {
        assert_eq!(hashtags("#café #日本 #ok"), vec!["#caf", "#ok"]);
    }
}
