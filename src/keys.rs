//! Object key parsing and derivation.
//!
//! Storage notifications deliver keys the way the storage service encodes them
//! in URLs: non-ASCII characters are percent-encoded and spaces may arrive as
//! `+`. This module turns such a key into a [`DecodedFileName`] and derives the
//! keys every variant is written under.
//!
//! ## Key Layout
//!
//! ```text
//! original/vacation.png           ← uploaded source (source prefix + file name)
//! thumbs/vacation_original.png    ← re-encoded, original dimensions
//! thumbs/vacation_thumb_1200.png  ← resized to 1200px wide
//! thumbs/vacation_thumb_640.png
//! thumbs/vacation_thumb_420.png
//! ```
//!
//! ## Dotted Names
//!
//! The file name is split on `.` and only the first two segments are used:
//! `a.b.c.jpg` has base name `a` and extension `b`. Existing buckets hold
//! variants keyed this way, so the truncating split is kept as-is.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("object key has no file extension: {0}")]
    InvalidKeyFormat(String),
    #[error("object key is not valid percent-encoded UTF-8: {0}")]
    InvalidEncoding(String),
}

/// File name recovered from a raw object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFileName {
    /// Decoded name with any path prefix removed, e.g. `my photo.jpg`.
    pub file_name: String,
    /// Everything before the first `.`.
    pub base_name: String,
    /// The segment after the first `.`, up to the next `.` if any.
    pub extension: String,
}

/// Decode a raw object key into its file name parts.
///
/// - `"original/vacation.png"` → base `vacation`, extension `png`
/// - `"original/my+photo.jpg"` → base `my photo`, extension `jpg`
/// - `"original/a%2Bb.jpg"` → base `a+b`, extension `jpg`
/// - `"a/b/caf%C3%A9.jpeg"` → base `café`, extension `jpeg`
/// - `"archive.tar.gz"` → base `archive`, extension `tar`
/// - `"original/README"` → [`KeyError::InvalidKeyFormat`]
pub fn decode_file_name(raw_key: &str) -> Result<DecodedFileName, KeyError> {
    // `+` is a space; a literal plus arrives as `%2B` and must survive decoding.
    let decoded = urlencoding::decode(&raw_key.replace('+', " "))
        .map_err(|_| KeyError::InvalidEncoding(raw_key.to_string()))?
        .into_owned();

    let file_name = match decoded.rfind('/') {
        Some(slash) => &decoded[slash + 1..],
        None => decoded.as_str(),
    };

    let mut parts = file_name.split('.');
    let base_name = parts.next().unwrap_or_default();
    let extension = parts
        .next()
        .ok_or_else(|| KeyError::InvalidKeyFormat(file_name.to_string()))?;

    Ok(DecodedFileName {
        file_name: file_name.to_string(),
        base_name: base_name.to_string(),
        extension: extension.to_string(),
    })
}

/// Key a variant is written under.
///
/// `Some(width)` produces `{prefix}{base}_thumb_{width}.{ext}`; `None` (the
/// re-encoded original) produces `{prefix}{base}_original.{ext}`.
pub fn destination_key(
    prefix: &str,
    base_name: &str,
    target_width: Option<u32>,
    extension: &str,
) -> String {
    match target_width {
        Some(width) => format!("{prefix}{base_name}_thumb_{width}.{extension}"),
        None => format!("{prefix}{base_name}_original.{extension}"),
    }
}

/// Key the source image is downloaded from.
pub fn source_key(prefix: &str, file_name: &str) -> String {
    format!("{prefix}{file_name}")
}
