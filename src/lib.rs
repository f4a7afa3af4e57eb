//! Path-to-URL redirects with a fallback handler.
//!
//! [`map_handler`] builds a handler from a path → URL map; [`yaml_handler`]
//! builds the same thing from a YAML document of `path`/`url` records.

pub mod config;
pub mod handlers;
pub mod infrastructure;
pub mod server;

pub use handlers::{handler_fn, map_handler, Handler, NotFound, PathRedirector, ResponseWriter};
pub use infrastructure::yaml::load_handlers::{yaml_handler, ParseError, PathRecord};
