use crate::error::LinkError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// The storage key the saved-link collection lives under.
pub const LINKS_KEY: &str = "savedLinks";

/// A URL together with the moment it was saved.
///
/// Serialized as `{"url": ..., "savedAt": ...}` where `savedAt` is
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLink {
    /// The saved URL. Unique within a collection.
    pub url: String,
    /// When the link was saved, in milliseconds since the Unix epoch.
    pub saved_at: i64,
}

impl SavedLink {
    pub fn new(url: impl Into<String>, saved_at: i64) -> Self {
        Self {
            url: url.into(),
            saved_at,
        }
    }

    /// Creates a link saved at the given timestamp.
    pub fn saved_at(url: impl Into<String>, at: Timestamp) -> Self {
        Self::new(url, at.as_millisecond())
    }

    /// Returns `saved_at` as a [`Timestamp`], or `None` if it is outside the
    /// range `jiff` can represent.
    pub fn saved_timestamp(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.saved_at).ok()
    }
}

/// Checks that `url` is non-empty and parses as an absolute URL.
pub fn validate_url(url: &str) -> Result<(), LinkError> {
    if url.is_empty() {
        return Err(LinkError::InvalidUrl("URL cannot be empty".to_string()));
    }
    // the parser strips these, so the stored url would differ from the input
    if url.trim() != url || url.contains(['\t', '\n', '\r']) {
        return Err(LinkError::InvalidUrl(format!(
            "{url:?}: URL must not contain surrounding whitespace or line breaks"
        )));
    }

    Url::parse(url)
        .map(|_| ())
        .map_err(|e| LinkError::InvalidUrl(format!("'{url}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_fields() {
        let link = SavedLink::new("https://example.com", 42);
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value, json!({"url": "https://example.com", "savedAt": 42}));
    }

    #[test]
    fn saved_at_timestamp_uses_milliseconds() {
        let at = Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        let link = SavedLink::saved_at("https://example.com", at);
        assert_eq!(link.saved_at, 1_700_000_000_123);
        assert_eq!(link.saved_timestamp(), Some(at));
    }

    #[test]
    fn valid_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/path?q=1#frag").is_ok());
        assert!(validate_url("file:///home/user/notes.html").is_ok());
    }

    #[test]
    fn invalid_urls() {
        assert!(matches!(validate_url(""), Err(LinkError::InvalidUrl(_))));
        assert!(matches!(
            validate_url("not a url"),
            Err(LinkError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("/relative/path"),
            Err(LinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn padded_urls_are_rejected() {
        for url in [" https://a.io", "https://a.io ", "https://a.io\n", "https://a.\tio"] {
            assert!(
                matches!(validate_url(url), Err(LinkError::InvalidUrl(_))),
                "{url:?} should be rejected"
            );
        }
    }
}
