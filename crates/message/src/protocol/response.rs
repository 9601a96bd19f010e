//! HTTP response value object.
//!
//! A [`Response`] embeds a [`Message`] and adds a status code with an optional
//! custom reason phrase. Without a custom phrase, the canonical reason for the
//! status is reported.

use http::StatusCode;
use tracing::debug;

use crate::header::HeaderValues;
use crate::protocol::message::MessageParts;
use crate::protocol::version::{parse_version, version_str};
use crate::protocol::{HttpMessage, Message, MessageError};
use crate::stream::Body;

#[derive(Debug, Clone)]
pub struct Response {
    message: Message,
    status: StatusCode,
    reason_phrase: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self::from_message(Message::new(), status, None)
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// An empty `reason_phrase` falls back to the canonical reason.
    pub fn from_message(message: Message, status: StatusCode, reason_phrase: Option<&str>) -> Self {
        let reason_phrase = reason_phrase.filter(|phrase| !phrase.is_empty()).map(str::to_owned);
        Self { message, status, reason_phrase }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The custom reason phrase, else the canonical one, else an empty string.
    pub fn reason_phrase(&self) -> &str {
        self.reason_phrase.as_deref().or_else(|| self.status.canonical_reason()).unwrap_or_default()
    }

    /// Replaces the status code and reason phrase.
    ///
    /// Codes outside `100..=999` are an [`MessageError::InvalidArgument`].
    pub fn with_status(&self, code: u16, reason_phrase: Option<&str>) -> Result<Self, MessageError> {
        let status = parse_status(code)?;
        Ok(Self::from_message(self.message.clone(), status, reason_phrase))
    }

    /// Converts into an `http::Response`, materializing the default body if needed.
    ///
    /// The custom reason phrase has no counterpart in `http::Response` and is dropped.
    pub fn into_http(self) -> Result<http::Response<Body>, MessageError> {
        let mut builder = http::Response::builder().status(self.status).version(parse_version(self.protocol_version())?);

        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers().try_into()?;
        }

        builder.body(self.body().clone()).map_err(MessageError::invalid_argument)
    }
}

fn parse_status(code: u16) -> Result<StatusCode, MessageError> {
    StatusCode::from_u16(code).map_err(|e| {
        debug!(code, cause = %e, "rejected status code");
        MessageError::invalid_argument(format!("invalid status code {code}"))
    })
}

impl HttpMessage for Response {
    fn message(&self) -> &Message {
        &self.message
    }

    fn with_message(&self, message: Message) -> Self {
        Self { message, ..self.clone() }
    }
}

impl<B: Into<Body>> TryFrom<http::Response<B>> for Response {
    type Error = MessageError;

    fn try_from(response: http::Response<B>) -> Result<Self, Self::Error> {
        let (parts, body) = response.into_parts();
        let headers = (&parts.headers).try_into()?;
        let message = Message::from_parts(version_str(parts.version), headers, Some(body.into()));
        Ok(Self::from_message(message, parts.status, None))
    }
}

/// Builds a [`Response`] from raw inputs.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    status: Option<u16>,
    reason_phrase: Option<String>,
    parts: MessageParts,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to `200`.
    pub fn status(mut self, code: u16) -> Self {
        self.status = Some(code);
        self
    }

    pub fn reason_phrase(mut self, reason_phrase: &str) -> Self {
        self.reason_phrase = Some(reason_phrase.to_owned());
        self
    }

    /// Appends a raw header. Repeated names accumulate.
    pub fn header(mut self, name: &str, value: impl Into<HeaderValues>) -> Self {
        self.parts.headers.push((name.to_owned(), value.into()));
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

    pub fn build(self) -> Result<Response, MessageError> {
        let status = self.status.map_or(Ok(StatusCode::OK), parse_status)?;
        Ok(Response::from_message(self.parts.into_message(), status, self.reason_phrase.as_deref()))
    }
}
