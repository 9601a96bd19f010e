//! An immutable HTTP message model
//!
//! This crate provides value types for HTTP requests, responses and server
//! requests. Values are never modified in place: each operation returns a new
//! value and the original stays exactly as it was. Unchanged state is shared
//! between the two, so deriving a request with one extra header does not copy
//! the body or the other headers.
//!
//! # Features
//!
//! - Case-insensitive header lookup that keeps the display spelling
//! - Header order preserved in insertion order
//! - Shared, identity-compared body streams with a no-seek decorator
//! - Server requests with cookies, query params, uploaded files, a parsed body
//!   and free-form attributes
//! - Conversions to and from the `http` crate types
//!
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{HttpMessage, HttpRequest, ServerRequest};
//! use micro_message::stream::{Body, BodyStream, NoSeekStream, MemoryStream};
//! use serde_json::json;
//!
//! let request = ServerRequest::builder()
//!     .method("post")
//!     .uri("http://example.com/users?page=2")
//!     .header("Content-Type", "application/json")
//!     .header("Cookie", "session=abc")
//!     .body(Body::new(NoSeekStream::new(MemoryStream::with_content(r#"{"name":"alice"}"#))))
//!     .query_from_uri()
//!     .cookies_from_header()
//!     .build()
//!     .unwrap();
//!
//! let routed = request
//!     .with_attribute("route", "users.create")
//!     .with_parsed_body(json!({"name": "alice"}));
//!
//! assert_eq!(routed.query_params()["page"], "2");
//! assert_eq!(routed.cookie_params()["session"], "abc");
//! assert_eq!(routed.attribute("route"), Some(&json!("users.create")));
//! assert!(request.attribute("route").is_none());
//! assert!(!routed.body().is_seekable());
//! assert!(routed.body().ptr_eq(request.body()));
//! ```
//!
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - [`header`]: The header store every message carries
//! - [`stream`]: Body stream capabilities, the shared body handle and stream decorators
//! - [`protocol`]: Messages, requests, responses, server requests and errors
//!
//! # Core Components
//!
//! ## Headers
//!
//! [`header::HeaderStore`] maps lowercased names to entries holding the last
//! spelling used and the list of values. Names and values are trimmed on the
//! way in. Replacing a header moves it to the end of the order; appending to
//! one keeps its position.
//!
//! ## Messages
//!
//! [`protocol::HttpMessage`] provides every message operation on top of two
//! required methods, so requests, responses and server requests share a
//! single implementation. [`protocol::HttpRequest`] does the same for request
//! operations.
//!
//! ## Bodies
//!
//! A message holds a [`stream::Body`], a shared handle to a
//! [`stream::BodyStream`]. Two bodies are the same body only if they are the
//! same handle. A message built without a body gets an empty in-memory one the
//! first time it is asked for.
//!
//! ## Error Handling
//!
//! Invalid arguments surface as [`protocol::MessageError`], stream failures as
//! [`protocol::StreamError`], and [`protocol::HttpError`] wraps both.

pub mod header;
pub mod protocol;
pub mod stream;
mod utils;
