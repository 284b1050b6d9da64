//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop hosts
//! (macOS, Windows, Linux):
//! - `HttpClient` using `reqwest` with rustls
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new("literalura/0.1.0", Duration::from_secs(30))?);
//! ```

mod http;

pub use http::ReqwestHttpClient;
