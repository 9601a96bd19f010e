//! Immutable HTTP message value objects.
//!
//! Every type in this module is a value: once built it never changes, and each
//! `with_*`/`without_*` operation returns a new value that shares whatever it
//! did not replace with the original. Copies are cheap and can be handed to
//! other threads freely.
//!
//! # Architecture
//!
//! - **Messages** (`message`): the state common to requests and responses
//!   - [`Message`]: protocol version, headers and body
//!   - [`HttpMessage`]: operations shared by every message type
//!
//! - **Requests** (`request`, `server_request`)
//!   - [`Request`]: method, URI and request target on top of a message
//!   - [`HttpRequest`]: request operations, shared with server requests
//!   - [`ServerRequest`]: server params, cookies, query, uploaded files,
//!     parsed body and attributes on top of a request
//!
//! - **Responses** (`response`)
//!   - [`Response`]: status code and reason phrase on top of a message
//!
//! - **Error Handling** (`error`)
//!   - [`HttpError`]: top-level error type
//!   - [`MessageError`]: rejected arguments
//!   - [`StreamError`]: body stream failures
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{HttpMessage, HttpRequest, Request};
//!
//! let request = Request::builder()
//!     .method("post")
//!     .uri("http://example.com/items")
//!     .header("Content-Type", "application/json")
//!     .build()
//!     .unwrap();
//!
//! let tagged = request.with_added_header("X-Tag", "a").with_added_header("x-tag", "b");
//!
//! assert_eq!(tagged.header_line("x-tag"), "a, b");
//! assert_eq!(tagged.header_line("host"), "example.com");
//! assert!(!request.has_header("X-Tag"));
//! assert_eq!(request.method(), "POST");
//! ```

mod message;
pub use message::DEFAULT_PROTOCOL_VERSION;
pub use message::HttpMessage;
pub use message::Message;

mod request;
pub use request::HttpRequest;
pub use request::Request;
pub use request::RequestBuilder;

mod response;
pub use response::Response;
pub use response::ResponseBuilder;

mod server_request;
pub use server_request::Params;
pub use server_request::ServerRequest;
pub use server_request::ServerRequestBuilder;

mod uploaded_file;
pub use uploaded_file::UploadedFile;
pub use uploaded_file::UploadedFiles;

mod version;
pub use version::parse_version;
pub use version::version_str;

mod error;
pub use error::HttpError;
pub use error::MessageError;
pub use error::StreamError;
