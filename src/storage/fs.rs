use super::{Storage, StorageError, StoredObject, WriteConfirmation, mime_for_key};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Buckets as directories on the local filesystem.
///
/// `root/<container>/<key>` holds each object. Used by the CLI harness to
/// replay storage events against a local copy of a bucket.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a container/key pair to a path under the root.
    ///
    /// Absolute keys and `..` segments are rejected so a key can never escape
    /// its container directory.
    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf, StorageError> {
        let escapes = |s: &str| {
            Path::new(s)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        };
        if container.is_empty() || escapes(container) || container.contains('/') {
            return Err(StorageError::InvalidKey(container.to_string()));
        }
        if key.is_empty() || escapes(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(container).join(key))
    }
}

fn transport(path: &Path, e: io::Error) -> StorageError {
    StorageError::Transport(format!("{}: {}", path.display(), e))
}

impl Storage for FsStorage {
    fn read(&self, container: &str, key: &str) -> Result<StoredObject, StorageError> {
        let path = self.object_path(container, key)?;
        debug!(path = %path.display(), "reading object");

        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(format!("{container}/{key}")),
            _ => transport(&path, e),
        })?;

        Ok(StoredObject {
            bytes,
            mime_type: mime_for_key(key).to_string(),
        })
    }

    fn write(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        _mime_type: &str,
    ) -> Result<WriteConfirmation, StorageError> {
        let path = self.object_path(container, key)?;
        debug!(path = %path.display(), size = bytes.len(), "writing object");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| transport(parent, e))?;
        }
        std::fs::write(&path, bytes).map_err(|e| transport(&path, e))?;

        Ok(WriteConfirmation::for_bytes(
            key,
            format!("file://{}", path.display()),
            bytes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::content_digest;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_round_trips() {
        let tmp = TempDir::new().unwrap();
        let storage = FsStorage::new(tmp.path());

        let confirmation = storage
            .write("photos", "thumbs/a_thumb_420.jpg", b"jpeg bytes", "image/jpeg")
            .unwrap();
        assert_eq!(confirmation.size, 10);
        assert_eq!(confirmation.etag, content_digest(b"jpeg bytes"));
        assert!(confirmation.location.starts_with("file://"));
        assert!(confirmation.location.ends_with("photos/thumbs/a_thumb_420.jpg"));

        let object = storage.read("photos", "thumbs/a_thumb_420.jpg").unwrap();
        assert_eq!(object.bytes, b"jpeg bytes");
        assert_eq!(object.mime_type, "image/jpeg");
    }

    #[test]
    fn write_creates_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let storage = FsStorage::new(tmp.path());
        storage.write("photos", "a/b/c/d.png", b"x", "image/png").unwrap();
        assert!(tmp.path().join("photos/a/b/c/d.png").exists());
    }

    #[test]
    fn key_with_spaces_maps_to_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("photos/original")).unwrap();
        fs::write(tmp.path().join("photos/original/my photo.png"), b"png").unwrap();

        let storage = FsStorage::new(tmp.path());
        let object = storage.read("photos", "original/my photo.png").unwrap();
        assert_eq!(object.bytes, b"png");
        assert_eq!(object.mime_type, "image/png");
    }

    #[test]
    fn missing_object_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let storage = FsStorage::new(tmp.path());
        let err = storage.read("photos", "original/missing.jpg").unwrap_err();
        assert_eq!(
            err,
            StorageError::NotFound("photos/original/missing.jpg".to_string())
        );
    }

    #[test]
    fn traversal_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let storage = FsStorage::new(tmp.path());
        for key in ["../secret.jpg", "/etc/passwd", "a/../../b.jpg", ""] {
            assert!(
                matches!(
                    storage.read("photos", key),
                    Err(StorageError::InvalidKey(_))
                ),
                "key {key:?} should be rejected"
            );
        }
        assert!(matches!(
            storage.write("..", "a.jpg", b"x", "image/jpeg"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
