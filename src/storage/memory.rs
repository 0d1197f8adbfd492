use super::{Storage, StorageError, StoredObject, WriteConfirmation};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process object store.
///
/// Objects keep the mime type they were written with. Mutex (not RefCell)
/// so writes can fan out across rayon workers.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, e.g. the uploaded original in a test.
    pub fn insert(&self, container: &str, key: &str, bytes: Vec<u8>, mime_type: &str) {
        self.lock().insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                bytes,
                mime_type: mime_type.to_string(),
            },
        );
    }

    pub fn get(&self, container: &str, key: &str) -> Option<StoredObject> {
        self.lock()
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    /// All keys in a container, sorted.
    pub fn keys(&self, container: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), StoredObject>> {
        // A panic while holding the lock leaves the map itself intact.
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, container: &str, key: &str) -> Result<StoredObject, StorageError> {
        self.get(container, key)
            .ok_or_else(|| StorageError::NotFound(format!("{container}/{key}")))
    }

    fn write(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<WriteConfirmation, StorageError> {
        self.insert(container, key, bytes.to_vec(), mime_type);
        Ok(WriteConfirmation::for_bytes(
            key,
            format!("memory://{container}/{key}"),
            bytes,
        ))
    }
}
