//! Image transform trait and shared error type.
//!
//! The [`ImageTransform`] trait is the single operation the pipeline needs:
//! bytes in, bytes out. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! `MockBackend` below.

use super::params::Quality;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Decode, optionally resize, and re-encode an image held in memory.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageTransform: Sync {
    /// Transform `source` (encoded as `mime_type`) into a new image of the same
    /// format.
    ///
    /// With `target_width` set the image is resized to that width, keeping its
    /// aspect ratio. With `None` the dimensions are kept and only the encoding
    /// changes. Implementations must be deterministic.
    fn transform(
        &self,
        source: &[u8],
        mime_type: &str,
        target_width: Option<u32>,
        quality: Quality,
    ) -> Result<Vec<u8>, TransformError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records calls instead of touching pixels.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Width whose transform fails with a decode error. `Some(None)` fails
        /// the original-size variant.
        pub fail_on: Option<Option<u32>>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedOp {
        pub source_len: usize,
        pub mime_type: String,
        pub target_width: Option<u32>,
        pub quality: u32,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(target_width: Option<u32>) -> Self {
            Self {
                operations: Mutex::new(Vec::new()),
                fail_on: Some(target_width),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Bytes the mock produces for a given call, so tests can predict output.
        pub fn output_for(target_width: Option<u32>, quality: u32) -> Vec<u8> {
            match target_width {
                Some(w) => format!("w{w}q{quality}").into_bytes(),
                None => format!("originalq{quality}").into_bytes(),
            }
        }
    }

    impl ImageTransform for MockBackend {
        fn transform(
            &self,
            source: &[u8],
            mime_type: &str,
            target_width: Option<u32>,
            quality: Quality,
        ) -> Result<Vec<u8>, TransformError> {
            self.operations.lock().unwrap().push(RecordedOp {
                source_len: source.len(),
                mime_type: mime_type.to_string(),
                target_width,
                quality: quality.value(),
            });

            if self.fail_on == Some(target_width) {
                return Err(TransformError::Decode("mock failure".to_string()));
            }
            Ok(Self::output_for(target_width, quality.value()))
        }
    }

    #[test]
    fn mock_records_transform() {
        let backend = MockBackend::new();

        let out = backend
            .transform(b"abc", "image/png", Some(420), Quality::new(60))
            .unwrap();
        assert_eq!(out, b"w420q60");

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0],
            RecordedOp {
                source_len: 3,
                mime_type: "image/png".to_string(),
                target_width: Some(420),
                quality: 60,
            }
        );
    }

    #[test]
    fn mock_fails_on_requested_width() {
        let backend = MockBackend::failing_on(None);
        assert!(
            backend
                .transform(b"abc", "image/png", Some(420), Quality::new(60))
                .is_ok()
        );
        assert!(matches!(
            backend.transform(b"abc", "image/png", None, Quality::new(60)),
            Err(TransformError::Decode(_))
        ));
    }
}
