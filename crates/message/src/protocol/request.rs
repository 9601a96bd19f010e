//! Client-side HTTP request value object.
//!
//! A [`Request`] embeds a [`Message`] and adds the method, the URI and an
//! optional explicit request target. Request-specific operations live on the
//! [`HttpRequest`] trait so that server requests, which embed a `Request`,
//! get them for free.
//!
//! # Host header
//!
//! On construction, and when the URI is replaced without preserving the host,
//! the `Host` header is rebuilt from the URI and moved to the front of the
//! header order. A URI without a host leaves the headers alone.

use std::borrow::Cow;

use http::{Method, Uri};
use tracing::debug;

use crate::header::HeaderValues;
use crate::protocol::message::{MessageParts, replace_headers};
use crate::protocol::version::{parse_version, version_str};
use crate::protocol::{HttpMessage, Message, MessageError};
use crate::stream::Body;
use crate::utils::ensure;

#[derive(Debug, Clone)]
pub struct Request {
    message: Message,
    method: Method,
    uri: Uri,
    request_target: Option<String>,
}

impl Request {
    /// Creates a request with no headers besides the `Host` taken from `uri`.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self::from_message(Message::new(), method, uri)
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// Wraps `message`, adding a `Host` header from `uri` when none is set.
    pub fn from_message(message: Message, method: Method, uri: Uri) -> Self {
        let request = Self { message, method, uri, request_target: None };
        if request.has_header("host") { request } else { request.with_host_from_uri() }
    }

    /// Converts into an `http::Request`, materializing the default body if needed.
    pub fn into_http(self) -> Result<http::Request<Body>, MessageError> {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.uri.clone())
            .version(parse_version(self.protocol_version())?);

        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers().try_into()?;
        }

        builder.body(self.body().clone()).map_err(MessageError::invalid_argument)
    }

    fn with_host_from_uri(self) -> Self {
        match host_from_uri(&self.uri) {
            Some(host) => replace_headers(&self, self.headers().with_header_first("Host", host)),
            None => self,
        }
    }
}

/// The `Host` header value for `uri`: the host, plus the port unless it is the
/// default one for the scheme.
fn host_from_uri(uri: &Uri) -> Option<String> {
    let host = uri.host().filter(|host| !host.is_empty())?;
    let default_port = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => Some(format!("{host}:{port}")),
        _ => Some(host.to_owned()),
    }
}

/// Parses a method token, uppercasing it first.
pub(crate) fn parse_method(method: &str) -> Result<Method, MessageError> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|e| {
        debug!(method, cause = %e, "rejected request method");
        MessageError::invalid_argument(format!("invalid request method {method:?}"))
    })
}

pub(crate) fn parse_uri(uri: &str) -> Result<Uri, MessageError> {
    uri.parse::<Uri>().map_err(|e| {
        debug!(uri, cause = %e, "rejected request uri");
        MessageError::invalid_argument(format!("invalid request uri {uri:?}: {e}"))
    })
}

impl HttpMessage for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn with_message(&self, message: Message) -> Self {
        Self { message, ..self.clone() }
    }
}

/// The operations every HTTP request supports, on top of [`HttpMessage`].
pub trait HttpRequest: HttpMessage {
    fn request(&self) -> &Request;

    /// Returns a copy of `self` holding `request` instead of the current one.
    fn with_request(&self, request: Request) -> Self;

    fn method(&self) -> &Method {
        &self.request().method
    }

    /// Replaces the method. The token is uppercased; an invalid token is an
    /// [`MessageError::InvalidArgument`].
    fn with_method(&self, method: &str) -> Result<Self, MessageError> {
        let method = parse_method(method)?;
        if method == *self.method() {
            return Ok(self.clone());
        }

        let mut request = self.request().clone();
        request.method = method;
        Ok(self.with_request(request))
    }

    fn uri(&self) -> &Uri {
        &self.request().uri
    }

    /// Replaces the URI.
    ///
    /// The `Host` header is rebuilt from the new URI unless `preserve_host` is
    /// set and a `Host` header is already present.
    fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        if uri == *self.uri() {
            return self.clone();
        }

        let mut request = self.request().clone();
        request.uri = uri;
        if !preserve_host || !request.has_header("host") {
            request = request.with_host_from_uri();
        }
        self.with_request(request)
    }

    /// The explicit request target, or the URI path (`/` when empty) with its
    /// query.
    fn request_target(&self) -> Cow<'_, str> {
        if let Some(target) = &self.request().request_target {
            return Cow::Borrowed(target.as_str());
        }

        let uri = self.uri();
        let path = match uri.path() {
            "" => "/",
            path => path,
        };
        match uri.query() {
            Some(query) => Cow::Owned(format!("{path}?{query}")),
            None => Cow::Borrowed(path),
        }
    }

    fn with_request_target(&self, target: &str) -> Result<Self, MessageError> {
        ensure!(
            !target.contains(char::is_whitespace),
            MessageError::invalid_argument("invalid request target provided; cannot contain whitespace")
        );

        let mut request = self.request().clone();
        request.request_target = Some(target.to_owned());
        Ok(self.with_request(request))
    }
}

impl HttpRequest for Request {
    fn request(&self) -> &Request {
        self
    }

    fn with_request(&self, request: Request) -> Self {
        request
    }
}

impl<B: Into<Body>> TryFrom<http::Request<B>> for Request {
    type Error = MessageError;

    fn try_from(request: http::Request<B>) -> Result<Self, Self::Error> {
        let (parts, body) = request.into_parts();
        let headers = (&parts.headers).try_into()?;
        let message = Message::from_parts(version_str(parts.version), headers, Some(body.into()));
        Ok(Self::from_message(message, parts.method, parts.uri))
    }
}

/// Builds a [`Request`] from raw inputs.
///
/// Errors are collected and reported once, by [`RequestBuilder::build`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<String>,
    uri: Option<String>,
    parts: MessageParts,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to `GET`.
    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.to_owned());
        self
    }

    /// Defaults to `/`.
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = Some(uri.to_owned());
        self
    }

    /// Appends a raw header. Repeated names accumulate.
    pub fn header(mut self, name: &str, value: impl Into<HeaderValues>) -> Self {
        self.parts.headers.push((name.to_owned(), value.into()));
        self
    }

    /// Appends raw headers in iteration order.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValues>,
    {
        self.parts.headers.extend(headers.into_iter().map(|(name, value)| (name.as_ref().to_owned(), value.into())));
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.parts.body = Some(body.into());
        self
    }

    /// Defaults to `"1.1"`.
    pub fn protocol_version(mut self, version: &str) -> Self {
        self.parts.protocol_version = Some(version.to_owned());
        self
    }

    pub fn build(self) -> Result<Request, MessageError> {
        let method = self.method.as_deref().map_or(Ok(Method::GET), parse_method)?;
        let uri = self.uri.as_deref().map_or_else(|| Ok(Uri::from_static("/")), parse_uri)?;
        Ok(Request::from_message(self.parts.into_message(), method, uri))
    }
}

#[cfg(test)]
mod tests {
    use crate::stream::BodyStream;

    use super::*;

    fn names<M: HttpMessage>(m: &M) -> Vec<&str> {
        m.headers().names().collect()
    }

    #[test]
    fn host_from_uri_comes_first() {
        let request = Request::builder()
            .method("post")
            .uri("http://example.com:8080/path?x=1")
            .header("Accept", "*/*")
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.header_line("host"), "example.com:8080");
        assert_eq!(names(&request), ["Host", "Accept"]);
    }

    #[test]
    fn default_port_is_omitted() {
        let request = Request::new(Method::GET, Uri::from_static("https://example.com:443/"));
        assert_eq!(request.header_line("Host"), "example.com");
    }

    #[test]
    fn explicit_host_header_is_kept() {
        let request = Request::builder().uri("http://example.com/").header("host", "other.org").build().unwrap();
        assert_eq!(request.header("Host"), ["other.org"]);
        assert_eq!(names(&request), ["host"]);
    }

    #[test]
    fn relative_uri_sets_no_host() {
        let request = Request::builder().uri("/index.html").build().unwrap();
        assert!(!request.has_header("Host"));
    }

    #[test]
    fn with_uri_updates_host() {
        let request = Request::builder().uri("http://a.com/").header("Accept", "*/*").build().unwrap();
        let moved = request.with_uri(Uri::from_static("http://b.com:81/x"), false);

        assert_eq!(moved.header_line("host"), "b.com:81");
        assert_eq!(request.header_line("host"), "a.com");
        assert_eq!(moved.uri(), &Uri::from_static("http://b.com:81/x"));
        assert_eq!(names(&moved), ["Host", "Accept"]);
    }

    #[test]
    fn with_uri_preserving_host() {
        let request = Request::builder().uri("http://a.com/").build().unwrap();
        let moved = request.with_uri(Uri::from_static("http://b.com/"), true);
        assert_eq!(moved.header_line("host"), "a.com");

        let no_host = Request::builder().uri("/").build().unwrap();
        let moved = no_host.with_uri(Uri::from_static("http://b.com/"), true);
        assert_eq!(moved.header_line("host"), "b.com");
    }

    #[test]
    fn with_same_uri_shares_state() {
        let request = Request::builder().uri("http://a.com/").build().unwrap();
        let same = request.with_uri(Uri::from_static("http://a.com/"), false);
        assert!(same.headers().ptr_eq(request.headers()));
    }

    #[test]
    fn with_method() {
        let request = Request::builder().build().unwrap();
        assert_eq!(request.method(), &Method::GET);

        let patched = request.with_method("patch").unwrap();
        assert_eq!(patched.method(), &Method::PATCH);
        assert_eq!(request.method(), &Method::GET);

        let err = request.with_method("BAD METHOD").unwrap_err();
        assert!(matches!(err, MessageError::InvalidArgument { .. }));
    }

    #[test]
    fn request_target() {
        let request = Request::builder().uri("http://a.com/search?q=rust").build().unwrap();
        assert_eq!(request.request_target(), "/search?q=rust");

        let request = Request::builder().uri("http://a.com").build().unwrap();
        assert_eq!(request.request_target(), "/");

        let custom = request.with_request_target("*").unwrap();
        assert_eq!(custom.request_target(), "*");
        assert_eq!(request.request_target(), "/");

        assert!(request.with_request_target("/a b").is_err());
    }

    #[test]
    fn builder_rejects_bad_input() {
        assert!(Request::builder().uri("http://[::1").build().is_err());
        assert!(Request::builder().method("GE T").build().is_err());
    }

    #[test]
    fn builder_accumulates_headers() {
        let request = Request::builder()
            .headers([("X-Foo", "a"), ("x-foo", "b")])
            .header("X-Bar", ["1", "2"])
            .protocol_version("1.0")
            .body("hello")
            .build()
            .unwrap();

        assert_eq!(request.header_line("X-Foo"), "a, b");
        assert_eq!(request.header_line("x-bar"), "1, 2");
        assert_eq!(request.protocol_version(), "1.0");
        assert_eq!(request.body().clone().to_text(), "hello");
    }

    #[test]
    fn http_round_trip() {
        let request = http::Request::builder()
            .method(Method::PUT)
            .uri("http://example.com/items/1")
            .version(http::Version::HTTP_10)
            .header("content-type", "application/json")
            .body("{}")
            .unwrap();

        let request = Request::try_from(request).unwrap();
        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.protocol_version(), "1.0");
        assert_eq!(request.header_line("Content-Type"), "application/json");
        assert_eq!(request.header_line("Host"), "example.com");

        let http_request = request.into_http().unwrap();
        assert_eq!(http_request.version(), http::Version::HTTP_10);
        assert_eq!(http_request.headers().len(), 2);
        assert_eq!(http_request.into_body().to_text(), "{}");
    }
}
