use std::fmt;
use std::io::SeekFrom;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::protocol::StreamError;
use crate::stream::{BodyStream, MemoryStream};

/// A shared handle to a body stream.
///
/// Cloning a `Body` never copies stream bytes: every clone refers to the same
/// stream, cursor included. Two handles are "the same body" when
/// [`Body::ptr_eq`] holds, which is what messages use to short-circuit
/// `with_body`.
///
/// `Body` itself implements [`BodyStream`] by locking the shared stream for the
/// duration of each call, so it can be wrapped by decorators such as
/// [`NoSeekStream`](crate::stream::NoSeekStream).
#[derive(Clone)]
pub struct Body {
    inner: Arc<Mutex<dyn BodyStream + Send>>,
}

impl Body {
    pub fn new<S>(stream: S) -> Self
    where
        S: BodyStream + Send + 'static,
    {
        Self { inner: Arc::new(Mutex::new(stream)) }
    }

    /// A fresh, empty in-memory body.
    pub fn empty() -> Self {
        Self::new(MemoryStream::new())
    }

    /// Returns true when both handles refer to the same stream.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Locks the underlying stream for a sequence of operations.
    ///
    /// A poisoned lock is recovered: the stream state is whatever the panicking
    /// holder left behind.
    pub fn lock(&self) -> MutexGuard<'_, dyn BodyStream + Send + 'static> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(stream) = self.inner.try_lock() else {
            return f.debug_struct("Body").finish_non_exhaustive();
        };
        f.debug_struct("Body")
            .field("size", &stream.size())
            .field("seekable", &stream.is_seekable())
            .field("readable", &stream.is_readable())
            .field("writable", &stream.is_writable())
            .finish()
    }
}

impl BodyStream for Body {
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError> {
        self.lock().read(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        self.lock().write(data)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.lock().seek(pos)
    }

    fn tell(&self) -> Result<u64, StreamError> {
        self.lock().tell()
    }

    fn eof(&self) -> bool {
        self.lock().eof()
    }

    fn size(&self) -> Option<u64> {
        self.lock().size()
    }

    fn close(&mut self) {
        self.lock().close();
    }

    fn is_seekable(&self) -> bool {
        self.lock().is_seekable()
    }

    fn is_readable(&self) -> bool {
        self.lock().is_readable()
    }

    fn is_writable(&self) -> bool {
        self.lock().is_writable()
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.lock().rewind()
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        self.lock().contents()
    }

    fn to_text(&mut self) -> String {
        self.lock().to_text()
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Self::new(MemoryStream::with_content(value))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::new(MemoryStream::with_content(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Self::new(MemoryStream::with_content(value))
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::new(MemoryStream::with_content(value))
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_send_sync<T: Send + Sync>() {}

    #[test]
    fn is_send_sync() {
        check_send_sync::<Body>();
    }

    #[test]
    fn clones_share_the_stream() {
        let mut body = Body::from("hello");
        let mut shared = body.clone();

        assert!(body.ptr_eq(&shared));
        assert_eq!(body.read(2).unwrap(), Bytes::from_static(b"he"));
        assert_eq!(shared.tell().unwrap(), 2);
        assert_eq!(shared.contents().unwrap(), Bytes::from_static(b"llo"));
        assert!(body.eof());
    }

    #[test]
    fn distinct_bodies_are_not_equal() {
        let a = Body::empty();
        let b = Body::empty();
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn to_text() {
        let mut body = Body::from(String::from("abc"));
        body.read(3).unwrap();
        assert_eq!(body.to_text(), "abc");
    }

    #[test]
    fn debug_reports_capabilities() {
        let body = Body::from(vec![1u8, 2, 3]);
        let debug = format!("{body:?}");
        assert!(debug.contains("size: Some(3)"));
        assert!(debug.contains("seekable: true"));
    }
}
