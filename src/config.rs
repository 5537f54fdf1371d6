#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Option identifier conventionally used for HTTP transcoding rules.
pub const DEFAULT_ANNOTATION: &str = "google.api.http";

/// Settings for route extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractConfig {
    /// Substring an option name must contain to be read as the HTTP mapping.
    /// Matched case-sensitively, so `(google.api.http)` qualifies.
    pub annotation: String,
}

impl ExtractConfig {
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// Whether an option named `name` carries the HTTP mapping.
    pub fn is_http_option(&self, name: &str) -> bool {
        name.contains(self.annotation.as_str())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            annotation: DEFAULT_ANNOTATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_parenthesized_name() {
        let config = ExtractConfig::default();
        assert!(config.is_http_option("(google.api.http)"));
        assert!(!config.is_http_option("(Google.Api.Http)"));
        assert!(!config.is_http_option("deprecated"));
    }

    #[test]
    fn test_custom_annotation() {
        let config = ExtractConfig::default().with_annotation("acme.route");
        assert!(config.is_http_option("(acme.route)"));
        assert!(!config.is_http_option("(google.api.http)"));
    }
}
