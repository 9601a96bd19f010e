//! Server-side HTTP request value object.
//!
//! A [`ServerRequest`] is a [`Request`] as seen by the server, plus:
//!
//! - server params, fixed at construction and never replaced
//! - cookie params, query params, uploaded files and the parsed body, each
//!   replaced wholesale by its `with_*` operation
//! - attributes, added and removed one key at a time
//!
//! Every bag sits behind a reference-counted pointer and is shared between
//! copies until replaced.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;
use triomphe::Arc;

use crate::header::HeaderValues;
use crate::protocol::request::RequestBuilder;
use crate::protocol::uploaded_file::UploadedFiles;
use crate::protocol::{HttpMessage, HttpRequest, Message, MessageError, Request};
use crate::stream::Body;

/// Params keyed by name, in the order they were received.
pub type Params = IndexMap<String, String>;

#[derive(Debug, Clone)]
pub struct ServerRequest {
    request: Request,
    server_params: Arc<Map<String, Value>>,
    cookie_params: Arc<Params>,
    query_params: Arc<Params>,
    uploaded_files: Arc<UploadedFiles>,
    parsed_body: Option<Arc<Value>>,
    attributes: Arc<IndexMap<String, Value>>,
}

impl ServerRequest {
    pub fn new(request: Request, server_params: Map<String, Value>) -> Self {
        Self {
            request,
            server_params: Arc::new(server_params),
            cookie_params: Arc::new(Params::new()),
            query_params: Arc::new(Params::new()),
            uploaded_files: Arc::new(UploadedFiles::new()),
            parsed_body: None,
            attributes: Arc::new(IndexMap::new()),
        }
    }

    pub fn builder() -> ServerRequestBuilder {
        ServerRequestBuilder::new()
    }

    /// Params describing the server environment. They cannot be replaced.
    pub fn server_params(&self) -> &Map<String, Value> {
        &self.server_params
    }

    pub fn cookie_params(&self) -> &Params {
        &self.cookie_params
    }

    pub fn with_cookie_params(&self, cookies: Params) -> Self {
        Self { cookie_params: Arc::new(cookies), ..self.clone() }
    }

    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    pub fn with_query_params(&self, query: Params) -> Self {
        Self { query_params: Arc::new(query), ..self.clone() }
    }

    pub fn uploaded_files(&self) -> &UploadedFiles {
        &self.uploaded_files
    }

    pub fn with_uploaded_files(&self, uploaded_files: UploadedFiles) -> Self {
        Self { uploaded_files: Arc::new(uploaded_files), ..self.clone() }
    }

    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_deref()
    }

    pub fn with_parsed_body(&self, data: Value) -> Self {
        Self { parsed_body: Some(Arc::new(data)), ..self.clone() }
    }

    pub fn without_parsed_body(&self) -> Self {
        Self { parsed_body: None, ..self.clone() }
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The attribute `name`, or `default` when it was never set.
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.attribute(name).unwrap_or(default)
    }

    /// Sets one attribute, leaving the others untouched.
    pub fn with_attribute(&self, name: &str, value: impl Into<Value>) -> Self {
        let mut new = self.clone();
        Arc::make_mut(&mut new.attributes).insert(name.to_owned(), value.into());
        new
    }

    /// Removes one attribute. When it is absent the result shares this value's attributes.
    pub fn without_attribute(&self, name: &str) -> Self {
        if !self.attributes.contains_key(name) {
            return self.clone();
        }

        let mut new = self.clone();
        Arc::make_mut(&mut new.attributes).shift_remove(name);
        new
    }
}

impl HttpMessage for ServerRequest {
    fn message(&self) -> &Message {
        self.request.message()
    }

    fn with_message(&self, message: Message) -> Self {
        self.with_request(self.request.with_message(message))
    }
}

impl HttpRequest for ServerRequest {
    fn request(&self) -> &Request {
        &self.request
    }

    fn with_request(&self, request: Request) -> Self {
        Self { request, ..self.clone() }
    }
}

/// Parses `name=value` pairs separated by `;`, as sent in a `Cookie` header.
///
/// Pairs without `=` are skipped. Later duplicates win.
fn parse_cookies<'a>(lines: impl IntoIterator<Item = &'a String>) -> Params {
    lines
        .into_iter()
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Decodes an `application/x-www-form-urlencoded` query string. Later duplicates win.
fn parse_query(query: &str) -> Result<Params, MessageError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).map_err(|e| {
        debug!(query, cause = %e, "rejected query string");
        MessageError::invalid_argument(format!("invalid query string: {e}"))
    })?;
    Ok(pairs.into_iter().collect())
}

/// Builds a [`ServerRequest`] from raw inputs.
#[derive(Debug, Default)]
pub struct ServerRequestBuilder {
    request: RequestBuilder,
    server_params: Map<String, Value>,
    query_from_uri: bool,
    cookies_from_header: bool,
}

impl ServerRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to `GET`.
    pub fn method(mut self, method: &str) -> Self {
        self.request = self.request.method(method);
        self
    }

    /// Defaults to `/`.
    pub fn uri(mut self, uri: &str) -> Self {
        self.request = self.request.uri(uri);
        self
    }

    /// Appends a raw header. Repeated names accumulate.
    pub fn header(mut self, name: &str, value: impl Into<HeaderValues>) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Appends raw headers in iteration order.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValues>,
    {
        self.request = self.request.headers(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.request = self.request.body(body);
        self
    }

    /// Defaults to `"1.1"`.
    pub fn protocol_version(mut self, version: &str) -> Self {
        self.request = self.request.protocol_version(version);
        self
    }

    pub fn server_params(mut self, server_params: Map<String, Value>) -> Self {
        self.server_params = server_params;
        self
    }

    /// Fills the query params by decoding the query of the URI.
    pub fn query_from_uri(mut self) -> Self {
        self.query_from_uri = true;
        self
    }

    /// Fills the cookie params from the `Cookie` header.
    pub fn cookies_from_header(mut self) -> Self {
        self.cookies_from_header = true;
        self
    }

    pub fn build(self) -> Result<ServerRequest, MessageError> {
        let request = self.request.build()?;

        let query = match request.uri().query() {
            Some(query) if self.query_from_uri => parse_query(query)?,
            _ => Params::new(),
        };
        let cookies = if self.cookies_from_header { parse_cookies(request.header("cookie")) } else { Params::new() };

        let server_request = ServerRequest::new(request, self.server_params);
        Ok(ServerRequest { query_params: Arc::new(query), cookie_params: Arc::new(cookies), ..server_request })
    }
}
