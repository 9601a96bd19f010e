//! Capability-restricting stream decorators.
//!
//! [`RestrictedStream`] wraps a stream and forwards every operation to it,
//! except the ones its [`Capabilities`] policy suppresses. A suppressed
//! operation fails with [`StreamError::UnsupportedOperation`] without touching
//! the wrapped stream, and the matching `is_*` query always answers `false`, so
//! the decorator never advertises a capability it refuses.
//!
//! New restrictions only need a new policy type:
//!
//! ```
//! use micro_message::stream::{Capabilities, MemoryStream, RestrictedStream};
//!
//! #[derive(Debug)]
//! struct WriteOnly;
//!
//! impl Capabilities for WriteOnly {
//!     const READ: bool = false;
//!     const SEEK: bool = false;
//! }
//!
//! let stream = RestrictedStream::<_, WriteOnly>::new(MemoryStream::new());
//! # let _ = stream;
//! ```

use std::fmt;
use std::io::SeekFrom;
use std::marker::PhantomData;

use bytes::Bytes;
use tracing::debug;

use crate::protocol::StreamError;
use crate::stream::BodyStream;

/// The capabilities a [`RestrictedStream`] lets through. Everything is allowed
/// unless a policy says otherwise.
pub trait Capabilities {
    const READ: bool = true;
    const WRITE: bool = true;
    const SEEK: bool = true;
}

/// Policy that suppresses seeking, see [`NoSeekStream`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeek;

impl Capabilities for NoSeek {
    const SEEK: bool = false;
}

/// Policy that suppresses writing, see [`ReadOnlyStream`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl Capabilities for ReadOnly {
    const WRITE: bool = false;
}

/// A stream that can not be seeked, whatever the wrapped stream supports.
pub type NoSeekStream<S> = RestrictedStream<S, NoSeek>;

/// A stream that can not be written to, whatever the wrapped stream supports.
pub type ReadOnlyStream<S> = RestrictedStream<S, ReadOnly>;

pub struct RestrictedStream<S, C> {
    inner: S,
    _capabilities: PhantomData<C>,
}

impl<S, C> RestrictedStream<S, C> {
    pub fn new(inner: S) -> Self {
        Self { inner, _capabilities: PhantomData }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: fmt::Debug, C> fmt::Debug for RestrictedStream<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestrictedStream")
            .field("inner", &self.inner)
            .field("policy", &std::any::type_name::<C>())
            .finish()
    }
}

fn unsupported<T>(operation: &'static str) -> Result<T, StreamError> {
    debug!(operation, "rejected suppressed stream capability");
    Err(StreamError::unsupported(operation))
}

impl<S: BodyStream, C: Capabilities> BodyStream for RestrictedStream<S, C> {
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError> {
        if !C::READ {
            return unsupported("read");
        }
        self.inner.read(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        if !C::WRITE {
            return unsupported("write");
        }
        self.inner.write(data)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        if !C::SEEK {
            return unsupported("seek");
        }
        self.inner.seek(pos)
    }

    fn tell(&self) -> Result<u64, StreamError> {
        self.inner.tell()
    }

    fn eof(&self) -> bool {
        self.inner.eof()
    }

    fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    fn close(&mut self) {
        self.inner.close();
    }

    fn is_seekable(&self) -> bool {
        C::SEEK && self.inner.is_seekable()
    }

    fn is_readable(&self) -> bool {
        C::READ && self.inner.is_readable()
    }

    fn is_writable(&self) -> bool {
        C::WRITE && self.inner.is_writable()
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        if !C::READ {
            return unsupported("read");
        }
        self.inner.contents()
    }

    // `rewind` and `to_text` keep their default bodies: they go through this
    // decorator's `seek` and `is_seekable`, never around them.
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::stream::{Body, MemoryStream, MockBodyStream};

    #[test]
    fn no_seek_rejects_seek_without_delegating() {
        let mut inner = MockBodyStream::new();
        inner.expect_seek().never();
        inner.expect_is_seekable().never();

        let mut stream = NoSeekStream::new(inner);
        assert!(!stream.is_seekable());
        assert!(matches!(
            stream.seek(SeekFrom::Start(0)),
            Err(StreamError::UnsupportedOperation { operation: "seek" })
        ));
        assert!(matches!(stream.rewind(), Err(StreamError::UnsupportedOperation { .. })));
    }

    #[test]
    fn no_seek_delegates_everything_else() {
        let mut inner = MockBodyStream::new();
        inner.expect_read().with(eq(4)).times(1).returning(|_| Ok(Bytes::from_static(b"data")));
        inner.expect_write().times(1).returning(|data| Ok(data.len()));
        inner.expect_tell().times(1).returning(|| Ok(4));
        inner.expect_eof().times(1).return_const(false);
        inner.expect_size().times(1).return_const(Some(10));
        inner.expect_is_readable().times(1).return_const(true);
        inner.expect_is_writable().times(1).return_const(true);
        inner.expect_close().times(1).return_const(());

        let mut stream = NoSeekStream::new(inner);
        assert_eq!(stream.read(4).unwrap(), Bytes::from_static(b"data"));
        assert_eq!(stream.write(b"abc").unwrap(), 3);
        assert_eq!(stream.tell().unwrap(), 4);
        assert!(!stream.eof());
        assert_eq!(stream.size(), Some(10));
        assert!(stream.is_readable());
        assert!(stream.is_writable());
        stream.close();
    }

    #[test]
    fn no_seek_reports_false_even_for_seekable_streams() {
        let stream = NoSeekStream::new(MemoryStream::with_content("abc"));
        assert!(stream.get_ref().is_seekable());
        assert!(!stream.is_seekable());
    }

    #[test]
    fn no_seek_to_text_does_not_rewind() {
        let mut stream = NoSeekStream::new(MemoryStream::with_content("hello"));
        stream.read(2).unwrap();
        assert_eq!(stream.to_text(), "llo");
    }

    #[test]
    fn no_seek_over_shared_body() {
        let body = Body::from("abcdef");
        let mut stream = NoSeekStream::new(body.clone());
        assert_eq!(stream.read(3).unwrap(), Bytes::from_static(b"abc"));
        assert!(stream.seek(SeekFrom::Start(0)).is_err());
        assert_eq!(body.tell().unwrap(), 3);

        let wrapped = Body::new(stream);
        assert!(!wrapped.is_seekable());
        assert!(body.is_seekable());
    }

    #[test]
    fn read_only_rejects_writes() {
        let mut stream = ReadOnlyStream::new(MemoryStream::with_content("abc"));
        assert!(!stream.is_writable());
        assert!(stream.is_seekable());
        assert!(matches!(stream.write(b"x"), Err(StreamError::UnsupportedOperation { operation: "write" })));
        assert_eq!(stream.to_text(), "abc");
        assert_eq!(stream.into_inner().size(), Some(3));
    }
}
