//! Route extraction: one `ApiRoute` per rpc method.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::debug;

use crate::annotation;
use crate::config::ExtractConfig;
use crate::parser::ast::{Definition, Method, Service};

/// HTTP verbs recognized as keys of the HTTP mapping block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Map a block key to a verb. Only lowercase keys are recognized.
    pub fn from_key(key: &str) -> Option<HttpVerb> {
        match key {
            "get" => Some(HttpVerb::Get),
            "post" => Some(HttpVerb::Post),
            "put" => Some(HttpVerb::Put),
            "delete" => Some(HttpVerb::Delete),
            "patch" => Some(HttpVerb::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flattened route record for one rpc method.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ApiRoute {
    pub service_name: String,
    pub method_name: String,
    /// `None` when the method has no HTTP mapping.
    pub verb: Option<HttpVerb>,
    /// Empty when the method has no HTTP mapping.
    pub path: String,
    pub comment: String,
}

impl ApiRoute {
    /// The verb as an uppercase string, or `""` for an unmapped method.
    pub fn http_verb(&self) -> &'static str {
        self.verb.map_or("", |v| v.as_str())
    }

    pub fn is_mapped(&self) -> bool {
        self.verb.is_some()
    }
}

/// Walk every service in declaration order and build one route per method.
pub fn extract_routes(definition: &Definition, config: &ExtractConfig) -> Vec<ApiRoute> {
    let mut routes = Vec::new();
    for service in definition.services() {
        for method in &service.methods {
            routes.push(route_for(service, method, config));
        }
    }
    routes
}

/// Build the route for a single method. Later verb keys overwrite earlier
/// ones, both within one block and across repeated mapping options.
pub fn route_for(service: &Service, method: &Method, config: &ExtractConfig) -> ApiRoute {
    let mut route = ApiRoute {
        service_name: service.name.clone(),
        method_name: method.name.clone(),
        verb: None,
        path: String::new(),
        comment: method.comment.joined(),
    };

    for option in method.options.iter().filter(|o| config.is_http_option(&o.name)) {
        for (key, value) in annotation::decode(&option.value) {
            if let Some(verb) = HttpVerb::from_key(&key) {
                route.verb = Some(verb);
                route.path = value;
            }
        }
    }

    debug!(
        service = %route.service_name,
        method = %route.method_name,
        verb = route.http_verb(),
        path = %route.path,
        "extracted route"
    );
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use pretty_assertions::assert_eq;

    fn routes(schema: &str) -> Vec<ApiRoute> {
        let def = parser::parse(schema).unwrap();
        extract_routes(&def, &ExtractConfig::default())
    }

    #[test]
    fn test_verb_from_key_is_case_sensitive() {
        assert_eq!(HttpVerb::from_key("delete"), Some(HttpVerb::Delete));
        assert_eq!(HttpVerb::from_key("GET"), None);
        assert_eq!(HttpVerb::from_key("body"), None);
    }

    #[test]
    fn test_unmapped_method() {
        let r = routes("service S { rpc A (R) returns (R); }");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].http_verb(), "");
        assert_eq!(r[0].path, "");
        assert!(!r[0].is_mapped());
    }

    #[test]
    fn test_last_verb_wins_within_block() {
        let r = routes(
            r#"service S { rpc A (R) returns (R) {
                option (google.api.http) = { get: "/first" put: "/second" body: "*" };
            } }"#,
        );
        assert_eq!(r[0].verb, Some(HttpVerb::Put));
        assert_eq!(r[0].path, "/second");
    }

    #[test]
    fn test_last_option_wins_across_options() {
        let r = routes(
            r#"service S { rpc A (R) returns (R) {
                option (google.api.http) = { delete: "/one" };
                option (google.api.http) = { body: "*" };
                option (google.api.http) = { patch: "/two" };
            } }"#,
        );
        assert_eq!(r[0].http_verb(), "PATCH");
        assert_eq!(r[0].path, "/two");
    }

    #[test]
    fn test_non_matching_option_is_ignored() {
        let r = routes(
            r#"service S { rpc A (R) returns (R) {
                option (acme.cache) = { get: "/not/a/route" };
            } }"#,
        );
        assert_eq!(r[0].verb, None);
        assert_eq!(r[0].path, "");
    }

    #[test]
    fn test_nested_binding_does_not_override() {
        let r = routes(
            r#"service S { rpc A (R) returns (R) {
                option (google.api.http) = {
                  post: "/v1/a"
                  additional_bindings { get: "/v1/a/alt" }
                };
            } }"#,
        );
        assert_eq!(r[0].verb, Some(HttpVerb::Post));
        assert_eq!(r[0].path, "/v1/a");
    }

    #[test]
    fn test_routes_follow_declaration_order() {
        let r = routes(
            "service B { rpc Two (R) returns (R); rpc One (R) returns (R); }
             enum E { X = 0; }
             service A { rpc Three (R) returns (R); }",
        );
        let names: Vec<_> = r
            .iter()
            .map(|r| (r.service_name.as_str(), r.method_name.as_str()))
            .collect();
        assert_eq!(names, vec![("B", "Two"), ("B", "One"), ("A", "Three")]);
    }
}
