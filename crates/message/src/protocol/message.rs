//! The message value object shared by requests and responses.
//!
//! A [`Message`] is a protocol version, a [`HeaderStore`] and a [`Body`].
//! It is never modified after construction: every `with_*` operation of the
//! [`HttpMessage`] trait returns a new value. New values are shallow clones,
//! the header store and the body handle are shared until one of them is
//! replaced.

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::header::{HeaderStore, HeaderValues};
use crate::stream::Body;

/// Protocol version used when none is given.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

#[derive(Debug, Clone)]
pub struct Message {
    protocol_version: String,
    headers: HeaderStore,
    body: OnceCell<Body>,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    /// An HTTP/1.1 message without headers and with a lazily created empty body.
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_PROTOCOL_VERSION, HeaderStore::new(), None)
    }

    pub fn from_parts(protocol_version: impl Into<String>, headers: HeaderStore, body: Option<Body>) -> Self {
        let body = body.map_or_else(OnceCell::new, OnceCell::with_value);
        Self { protocol_version: protocol_version.into(), headers, body }
    }
}

/// The operations every HTTP message supports.
///
/// Implementors only expose their embedded [`Message`] and know how to rebuild
/// themselves around a replaced one; every other method is provided.
///
/// No method alters its receiver. Operations that would not change anything
/// return a clone sharing all state with the receiver.
pub trait HttpMessage: Clone {
    fn message(&self) -> &Message;

    /// Returns a copy of `self` holding `message` instead of the current one.
    fn with_message(&self, message: Message) -> Self;

    fn protocol_version(&self) -> &str {
        &self.message().protocol_version
    }

    fn with_protocol_version(&self, version: &str) -> Self {
        if self.protocol_version() == version {
            return self.clone();
        }

        let mut message = self.message().clone();
        version.clone_into(&mut message.protocol_version);
        self.with_message(message)
    }

    fn headers(&self) -> &HeaderStore {
        &self.message().headers
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().has(name)
    }

    /// Values of `name`, empty when the header is absent.
    fn header(&self, name: &str) -> &[String] {
        self.headers().values(name)
    }

    /// Values of `name` joined with `", "`, empty when the header is absent.
    fn header_line(&self, name: &str) -> String {
        self.headers().line(name)
    }

    /// See [`HeaderStore::with_header`].
    fn with_header(&self, name: &str, value: impl Into<HeaderValues>) -> Self {
        replace_headers(self, self.headers().with_header(name, value))
    }

    /// See [`HeaderStore::with_added_header`].
    fn with_added_header(&self, name: &str, value: impl Into<HeaderValues>) -> Self {
        replace_headers(self, self.headers().with_added_header(name, value))
    }

    fn without_header(&self, name: &str) -> Self {
        if !self.has_header(name) {
            return self.clone();
        }
        replace_headers(self, self.headers().without_header(name))
    }

    /// The bound body, or an empty one created on first access.
    ///
    /// The default body is created once per value, even when several threads
    /// ask for it at the same time. Copies made before the first access create
    /// their own.
    fn body(&self) -> &Body {
        self.message().body.get_or_init(|| {
            trace!("materialize default empty body");
            Body::empty()
        })
    }

    fn with_body(&self, body: Body) -> Self {
        if self.message().body.get().is_some_and(|current| current.ptr_eq(&body)) {
            return self.clone();
        }

        let mut message = self.message().clone();
        message.body = OnceCell::with_value(body);
        self.with_message(message)
    }
}

impl HttpMessage for Message {
    fn message(&self) -> &Message {
        self
    }

    fn with_message(&self, message: Message) -> Self {
        message
    }
}

pub(crate) fn replace_headers<M: HttpMessage>(m: &M, headers: HeaderStore) -> M {
    let mut message = m.message().clone();
    message.headers = headers;
    m.with_message(message)
}

/// Everything needed to build a [`Message`], collected by the message builders.
#[derive(Debug, Default)]
pub(crate) struct MessageParts {
    pub(crate) protocol_version: Option<String>,
    pub(crate) headers: Vec<(String, HeaderValues)>,
    pub(crate) body: Option<Body>,
}

impl MessageParts {
    pub(crate) fn into_message(self) -> Message {
        let version = self.protocol_version.unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_owned());
        Message::from_parts(version, HeaderStore::from_raw(self.headers), self.body)
    }
}
