//! Shared types passed between the event parser, the pipeline and the handler.
//!
//! These are transient: each is built while handling one storage event and
//! dropped once the outcome has been reported.

use serde::{Deserialize, Serialize};

/// Identity of the object whose creation triggered the run.
///
/// `raw_key` is exactly what the storage notification carried: it may still be
/// percent-encoded, use `+` for spaces, and include a path prefix such as
/// `original/`. Decoding happens in [`keys::decode_file_name`](crate::keys::decode_file_name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Bucket (or other top-level container) holding the object.
    pub container: String,
    /// Undecoded object key.
    pub raw_key: String,
}

impl SourceReference {
    pub fn new(container: impl Into<String>, raw_key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            raw_key: raw_key.into(),
        }
    }
}

/// One generated variant, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantResult {
    /// Key the variant is stored under, e.g. `thumbs/vacation_thumb_420.png`.
    pub destination_key: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}
