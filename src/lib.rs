//! Protoroute: extract HTTP routes from protobuf service definitions.
//!
//! The crate parses `.proto` schema text, walks every `service` block, and
//! reads the `google.api.http` option attached to each `rpc` into a flat
//! route record: service, method, HTTP verb, path and leading comment.
//! Constructs it does not need (enums, nested messages, extensions, imports)
//! are skipped rather than rejected.
//!
//! # Quick Start
//!
//! ```rust
//! use protoroute::{extract, ExtractConfig, HttpVerb};
//!
//! let routes = extract(r#"
//!     service HelloService {
//!       // Say hello
//!       rpc SayHello (HelloRequest) returns (HelloResponse) {
//!         option (google.api.http) = { post: "/v1/hello" body: "*" };
//!       }
//!     }
//! "#, &ExtractConfig::default()).unwrap();
//!
//! assert_eq!(routes.len(), 1);
//! assert_eq!(routes[0].verb, Some(HttpVerb::Post));
//! assert_eq!(routes[0].path, "/v1/hello");
//! assert_eq!(routes[0].comment, "Say hello");
//! ```

pub mod error;
pub mod parser;
pub mod annotation;
pub mod config;
pub mod route;
pub mod source;
pub mod render;

pub use config::ExtractConfig;
pub use error::{Error, LexError, ParseError, Result, SourceError};
pub use parser::{ast::Definition, parse};
pub use route::{extract_routes, ApiRoute, HttpVerb};
pub use source::{FileSource, SchemaSource};

/// Load, parse and walk a schema in one step.
///
/// Any lex or parse error aborts the whole extraction.
pub fn extract<S: SchemaSource + ?Sized>(source: &S, config: &ExtractConfig) -> Result<Vec<ApiRoute>> {
    let text = source.load()?;
    let definition = parse(&text)?;
    Ok(extract_routes(&definition, config))
}
