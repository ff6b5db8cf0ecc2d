//! Convenience layer over a synchronous HTTP client.
//!
//! # Overview
//! Configure an [`Options`] builder (method, query, headers, JSON or
//! multipart body), hand it to [`execute`] together with a destination URL,
//! and get back a fully buffered [`Response`]. Destination URLs are cleaned
//! up by [`url::normalize`] first.
//!
//! On the inbound side, [`MultipartForm`] extracts text fields and uploaded
//! files from an axum multipart request.
//!
//! # Design
//! - `Options` is a plain mutable builder; nothing is validated until
//!   `execute` builds the `http::Request`.
//! - One call is one round-trip: no retries, no streaming. The body is read
//!   into memory before `execute` returns.
//! - Cancellation is a deadline on [`Context`], applied as the request's
//!   total timeout.

pub mod context;
pub mod error;
pub mod executor;
pub mod form;
pub mod multipart;
pub mod options;
pub mod response;
pub mod url;

pub use context::Context;
pub use error::FetchError;
pub use executor::{execute, HEADER_CLIENT_UNIX};
pub use form::{FormFile, FormValue};
pub use multipart::MultipartForm;
pub use options::{Client, Options, DEFAULT_TIMEOUT};
pub use response::Response;
