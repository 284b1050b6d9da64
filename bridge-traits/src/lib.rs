//! # Host Bridge Traits
//!
//! Capabilities the catalog core needs from its host but does not implement
//! itself.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP used to reach the
//!   bibliographic search API
//!
//! ## Shared types
//!
//! - [`LogLevel`](log::LogLevel) - verbosity levels understood by the runtime
//!   logging setup and the configuration loader
//!
//! ## Error Handling
//!
//! All bridge operations return [`BridgeError`](error::BridgeError).
//! Implementations convert transport-specific failures into it and keep the
//! message actionable (status code, URL, timeout).
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` so a single client can be shared behind
//! an `Arc` by every service that needs it.
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest};
//!
//! async fn fetch(client: &dyn HttpClient) -> bridge_traits::error::Result<u16> {
//!     let request = HttpRequest::get("https://gutendex.com/books/?search=emma");
//!     Ok(client.execute(request).await?.status)
//! }
//! ```

pub mod error;
pub mod http;
pub mod log;

pub use error::BridgeError;

pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use log::LogLevel;
