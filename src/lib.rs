//! # URI Dispatch
//!
//! URI template matching and resource method selection for REST
//! frameworks:
//!
//! - **Template Parsing** - `/users/{id}` and `/files/{path:.+}` into regexes
//! - **Pattern Matching** - Positional variable values plus the unmatched tail
//! - **Specificity Ordering** - Most specific pattern always wins
//! - **Method Selection** - Order overloads by consumed/produced media types
//! - **Route Tables** - Root resources and sub-resource methods
//! - **Template Expansion** - Build paths from templates and values
//!
//! # Quick Start
//!
//! ```
//! use uri_dispatch::*;
//!
//! let mut table = RouteTable::new();
//! table.add("/users", "user list").unwrap();
//! table.add("/users/{id:\\d+}", "single user").unwrap();
//!
//! let found = table.resolve("/users/42").unwrap();
//! assert_eq!(*found.value, "single user");
//! assert_eq!(found.params().get_as::<u32>("id"), Some(42));
//! ```
//!
//! # Method Selection
//!
//! Methods sharing a path and a verb are tried from the most to the least
//! precise media types:
//!
//! ```
//! use uri_dispatch::*;
//!
//! let mut methods = ResourceMethodMap::new();
//! methods.add("POST", ResourceMethod::new("any"));
//! methods.add(
//!     "POST",
//!     ResourceMethod::new("json").consumes("application/json".parse().unwrap()),
//! );
//!
//! assert_eq!(methods.get_first("POST").unwrap().name(), "json");
//! assert_eq!(methods.allow(), vec!["POST"]);
//! ```
//!
//! # Sub-Resources
//!
//! A root match may leave part of the path unconsumed. That remainder is
//! dispatched against the resource's sub-resource methods:
//!
//! ```
//! use uri_dispatch::*;
//!
//! let mut table = RouteTable::new();
//! table.add("/orders", ()).unwrap();
//!
//! let mut sub = SubResourceMethodMap::new();
//! sub.add("{id}/lines", "GET", ResourceMethod::new("lines")).unwrap();
//!
//! let root = table.resolve("/orders/9/lines").unwrap();
//! let found = sub.find(root.remainder().unwrap()).unwrap();
//! assert_eq!(found.params().get("id"), Some("9"));
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache of compiled patterns

#![doc(html_root_url = "https://docs.rs/uri-dispatch/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Templates and patterns
pub mod encoding;
pub mod expand;
pub mod pattern;
pub mod template;

// Method selection
pub mod media_type;
pub mod method;

// Dispatch tables
pub mod params;
pub mod sub_resource;
pub mod table;

// Error handling
pub mod error;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, PatternCache};
pub use error::{Result, RoutingError};
pub use expand::{expand, expand_positional};
pub use media_type::{compare_media_types, media_type_list, sort_media_types, MediaType};
pub use method::{
    compare_methods, sort_methods, MethodDescriptor, ResourceMethod, ResourceMethodMap,
};
pub use params::PathParameters;
pub use pattern::{compare_patterns, MatchResult, UriPattern};
pub use sub_resource::SubResourceMethodMap;
pub use table::{RouteMatch, RouteTable};
pub use template::{parse_template, ParsedTemplate};
