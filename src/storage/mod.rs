//! Object storage collaborator.
//!
//! The handler reads the uploaded original and writes every variant through
//! the [`Storage`] trait. It is passed in per call, so tests can hand in a
//! [`MemoryStorage`] and the CLI an [`FsStorage`].
//!
//! | Backend | Container | Key |
//! |---|---|---|
//! | [`FsStorage`] | sub-directory of the root | relative path inside it |
//! | [`MemoryStorage`] | map key | map key |

mod fs;
mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Storage transport error: {0}")]
    Transport(String),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// An object as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Receipt for a completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteConfirmation {
    /// Key the object was written under.
    pub key: String,
    /// Where the object landed, e.g. `memory://photos/thumbs/a_thumb_420.jpg`.
    pub location: String,
    /// Hex SHA-256 of the written bytes.
    pub etag: String,
    pub size: u64,
}

impl WriteConfirmation {
    pub(crate) fn for_bytes(key: &str, location: String, bytes: &[u8]) -> Self {
        Self {
            key: key.to_string(),
            location,
            etag: content_digest(bytes),
            size: bytes.len() as u64,
        }
    }
}

/// Read/write access to object storage.
pub trait Storage: Send + Sync {
    /// Fetch an object and its mime type.
    fn read(&self, container: &str, key: &str) -> Result<StoredObject, StorageError>;

    /// Store `bytes` under `key`, replacing any existing object.
    fn write(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<WriteConfirmation, StorageError>;
}

/// SHA-256 of `bytes`, returned as a hex string.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Mime type implied by a key's extension, for backends that store none.
pub fn mime_for_key(key: &str) -> &'static str {
    key.rsplit_once('.')
        .and_then(|(_, ext)| image::ImageFormat::from_extension(ext))
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}
