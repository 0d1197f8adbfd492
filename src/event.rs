//! Object-created notifications.
//!
//! Only two fields of an S3-style notification are consumed: the bucket name
//! and the object key. Everything else in the record is ignored.
//!
//! ```json
//! {
//!   "Records": [
//!     { "s3": { "bucket": { "name": "photos" }, "object": { "key": "original/my+photo.jpg" } } }
//!   ]
//! }
//! ```
//!
//! The key is passed on exactly as delivered (still encoded); see
//! [`SourceReference`].

use crate::types::SourceReference;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed event: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Event contains no records")]
    NoRecords,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectCreatedEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
}

impl ObjectCreatedEvent {
    /// One source per record, in delivery order.
    pub fn sources(&self) -> Vec<SourceReference> {
        self.records
            .iter()
            .map(|r| SourceReference::new(&r.s3.bucket.name, &r.s3.object.key))
            .collect()
    }
}

/// Parse a notification body. An event without records is an error.
pub fn parse_event(json: &str) -> Result<ObjectCreatedEvent, EventError> {
    let event: ObjectCreatedEvent = serde_json::from_str(json)?;
    if event.records.is_empty() {
        return Err(EventError::NoRecords);
    }
    Ok(event)
}

/// Read and parse a notification saved to disk.
pub fn load_event(path: &Path) -> Result<ObjectCreatedEvent, EventError> {
    let content = std::fs::read_to_string(path)?;
    parse_event(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_record() {
        let json = r#"{
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "bucket": { "name": "photos", "arn": "arn:aws:s3:::photos" },
                    "object": { "key": "original/my+photo.jpg", "size": 1024 }
                }
            }]
        }"#;

        let event = parse_event(json).unwrap();
        assert_eq!(
            event.sources(),
            vec![SourceReference::new("photos", "original/my+photo.jpg")]
        );
    }

    #[test]
    fn keeps_record_order() {
        let json = r#"{"Records": [
            {"s3": {"bucket": {"name": "a"}, "object": {"key": "original/1.jpg"}}},
            {"s3": {"bucket": {"name": "b"}, "object": {"key": "original/2.png"}}}
        ]}"#;

        let sources = parse_event(json).unwrap().sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].container, "a");
        assert_eq!(sources[1].raw_key, "original/2.png");
    }

    #[test]
    fn empty_records_rejected() {
        assert!(matches!(
            parse_event(r#"{"Records": []}"#),
            Err(EventError::NoRecords)
        ));
    }

    #[test]
    fn missing_key_rejected() {
        let json = r#"{"Records": [{"s3": {"bucket": {"name": "a"}, "object": {}}}]}"#;
        assert!(matches!(parse_event(json), Err(EventError::Json(_))));
    }

    #[test]
    fn load_event_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("event.json");
        std::fs::write(
            &path,
            r#"{"Records": [{"s3": {"bucket": {"name": "a"}, "object": {"key": "k.jpg"}}}]}"#,
        )
        .unwrap();
        assert_eq!(load_event(&path).unwrap().sources().len(), 1);
    }
}
