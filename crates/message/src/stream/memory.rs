use std::io::{self, SeekFrom};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::protocol::StreamError;
use crate::stream::BodyStream;

/// Largest zero-filled gap a write may open past the end of the buffer.
const MAX_GAP: usize = 16 * 1024 * 1024;

fn invalid_position(reason: &'static str) -> StreamError {
    debug!(reason, "rejected stream position");
    StreamError::io(io::Error::new(io::ErrorKind::InvalidInput, reason))
}

/// A readable, writable and seekable stream backed by a growable buffer.
#[derive(Debug, Default)]
pub struct MemoryStream {
    buf: BytesMut,
    pos: usize,
    closed: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream holding `data`, positioned at the start.
    pub fn with_content(data: impl AsRef<[u8]>) -> Self {
        Self { buf: BytesMut::from(data.as_ref()), pos: 0, closed: false }
    }

    fn ensure_open(&self) -> Result<(), StreamError> {
        if self.closed { Err(StreamError::Closed) } else { Ok(()) }
    }
}

impl BodyStream for MemoryStream {
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError> {
        self.ensure_open()?;
        let start = self.pos.min(self.buf.len());
        let end = start.saturating_add(len).min(self.buf.len());
        self.pos = end;
        Ok(Bytes::copy_from_slice(&self.buf[start..end]))
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        self.ensure_open()?;
        let end = self.pos.checked_add(data.len()).ok_or_else(|| invalid_position("write end overflows"))?;
        if self.pos > self.buf.len() {
            if self.pos - self.buf.len() > MAX_GAP {
                return Err(invalid_position("write too far past the end"));
            }
            self.buf.resize(self.pos, 0);
        }

        let overlap = data.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + overlap].copy_from_slice(&data[..overlap]);
        self.buf.extend_from_slice(&data[overlap..]);
        self.pos = end;
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.ensure_open()?;
        let (base, offset) = match pos {
            SeekFrom::Start(offset) => (0, i128::from(offset)),
            SeekFrom::Current(offset) => (self.pos, i128::from(offset)),
            SeekFrom::End(offset) => (self.buf.len(), i128::from(offset)),
        };

        let target = i128::try_from(base).unwrap_or(i128::MAX) + offset;
        let target = usize::try_from(target)
            .map_err(|e| StreamError::io(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        self.pos = target;
        Ok(target as u64)
    }

    fn tell(&self) -> Result<u64, StreamError> {
        self.ensure_open()?;
        Ok(self.pos as u64)
    }

    fn eof(&self) -> bool {
        self.closed || self.pos >= self.buf.len()
    }

    fn size(&self) -> Option<u64> {
        (!self.closed).then_some(self.buf.len() as u64)
    }

    fn close(&mut self) {
        self.closed = true;
        self.buf.clear();
        self.pos = 0;
    }

    fn is_seekable(&self) -> bool {
        !self.closed
    }

    fn is_readable(&self) -> bool {
        !self.closed
    }

    fn is_writable(&self) -> bool {
        !self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream() {
        let mut stream = MemoryStream::new();
        assert!(stream.eof());
        assert_eq!(stream.size(), Some(0));
        assert_eq!(stream.read(10).unwrap(), Bytes::new());
        assert_eq!(stream.to_text(), "");
    }

    #[test]
    fn read_and_seek() {
        let mut stream = MemoryStream::with_content("hello world");
        assert_eq!(stream.read(5).unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(stream.tell().unwrap(), 5);
        assert!(!stream.eof());

        assert_eq!(stream.seek(SeekFrom::Current(1)).unwrap(), 6);
        assert_eq!(stream.contents().unwrap(), Bytes::from_static(b"world"));
        assert!(stream.eof());

        assert_eq!(stream.seek(SeekFrom::End(-5)).unwrap(), 6);
        assert_eq!(stream.read(100).unwrap(), Bytes::from_static(b"world"));
        assert!(stream.seek(SeekFrom::Current(-100)).is_err());
    }

    #[test]
    fn to_text_rewinds() {
        let mut stream = MemoryStream::with_content("abc");
        stream.read(2).unwrap();
        assert_eq!(stream.to_text(), "abc");
    }

    #[test]
    fn write_overwrites_then_extends() {
        let mut stream = MemoryStream::with_content("abcdef");
        stream.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(stream.write(b"XYZ").unwrap(), 3);
        assert_eq!(stream.tell().unwrap(), 7);
        assert_eq!(stream.to_text(), "abcdXYZ");
    }

    #[test]
    fn write_past_end_pads() {
        let mut stream = MemoryStream::new();
        stream.seek(SeekFrom::Start(2)).unwrap();
        stream.write(b"x").unwrap();
        assert_eq!(stream.size(), Some(3));
        stream.rewind().unwrap();
        assert_eq!(stream.contents().unwrap().as_ref(), b"\0\0x");
    }

    #[test]
    fn write_far_past_end_is_rejected() {
        let mut stream = MemoryStream::with_content("abc");

        assert_eq!(stream.seek(SeekFrom::Start(u64::MAX)).unwrap(), u64::MAX);
        assert!(matches!(stream.write(b"x"), Err(StreamError::Io { .. })));

        stream.seek(SeekFrom::Start(1 << 40)).unwrap();
        assert!(matches!(stream.write(b"x"), Err(StreamError::Io { .. })));

        assert_eq!(stream.size(), Some(3));
        assert_eq!(stream.to_text(), "abc");
    }

    #[test]
    fn closed_stream() {
        let mut stream = MemoryStream::with_content("abc");
        stream.close();

        assert!(stream.eof());
        assert_eq!(stream.size(), None);
        assert!(!stream.is_readable());
        assert!(!stream.is_seekable());
        assert!(matches!(stream.read(1), Err(StreamError::Closed)));
        assert!(matches!(stream.tell(), Err(StreamError::Closed)));
        assert_eq!(stream.to_text(), "");
    }
}
