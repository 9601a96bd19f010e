use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::protocol::StreamError;
use crate::stream::Body;

/// A file received as part of a server request.
///
/// How uploads are parsed and stored is up to the implementation; the message
/// model only carries them.
pub trait UploadedFile: fmt::Debug + Send + Sync {
    /// The file contents.
    fn stream(&self) -> Result<Body, StreamError>;

    fn size(&self) -> Option<u64>;

    /// The file name sent by the client, not to be trusted.
    fn client_filename(&self) -> Option<&str>;

    /// The media type sent by the client, not to be trusted.
    fn client_media_type(&self) -> Option<&str>;
}

/// Uploaded files keyed by form field name.
pub type UploadedFiles = IndexMap<String, Arc<dyn UploadedFile>>;
