//! Body streams.
//!
//! A message never owns body bytes directly. It holds a [`Body`], a shared
//! handle to anything implementing [`BodyStream`]: the capability set of a
//! synchronous byte source/sink with a cursor.
//!
//! - [`MemoryStream`]: in-memory stream, used for the default empty body
//! - [`Body`]: cheap-to-clone shared handle, compared by identity
//! - [`RestrictedStream`]: decorator that suppresses capabilities of a wrapped
//!   stream, see [`NoSeekStream`] and [`ReadOnlyStream`]

mod body;
mod memory;
mod restricted;

pub use body::Body;
pub use memory::MemoryStream;
pub use restricted::Capabilities;
pub use restricted::NoSeek;
pub use restricted::NoSeekStream;
pub use restricted::ReadOnly;
pub use restricted::ReadOnlyStream;
pub use restricted::RestrictedStream;

use std::io::SeekFrom;

use bytes::{Bytes, BytesMut};

use crate::protocol::StreamError;

/// Chunk size used when draining a stream.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// The capability set a message body exposes.
///
/// Implementations decide their own backing: memory, file, socket. Operations
/// that a stream cannot perform fail with [`StreamError::UnsupportedOperation`],
/// and the matching `is_*` query reports `false`.
#[cfg_attr(test, mockall::automock)]
pub trait BodyStream {
    /// Reads up to `len` bytes from the current position.
    ///
    /// An empty chunk means nothing is left to read.
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError>;

    /// Writes `data` at the current position and returns the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError>;

    /// Moves the cursor and returns the new position.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError>;

    fn tell(&self) -> Result<u64, StreamError>;

    fn eof(&self) -> bool;

    /// Total size in bytes when known.
    fn size(&self) -> Option<u64>;

    fn close(&mut self);

    fn is_seekable(&self) -> bool;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Reads everything from the current position to the end.
    fn contents(&mut self) -> Result<Bytes, StreamError> {
        let mut buf = BytesMut::new();
        loop {
            let chunk = self.read(READ_CHUNK_SIZE)?;
            if chunk.is_empty() {
                return Ok(buf.freeze());
            }
            buf.extend_from_slice(&chunk);
        }
    }

    /// The whole stream as text, rewinding first when the stream is seekable.
    ///
    /// Never fails: errors yield an empty string. Invalid UTF-8 is replaced.
    fn to_text(&mut self) -> String {
        if self.is_seekable() && self.rewind().is_err() {
            return String::new();
        }

        self.contents().map(|bytes| String::from_utf8_lossy(&bytes).into_owned()).unwrap_or_default()
    }
}
