//! Object-created notification model
//!
//! Deserialized form of the file-store notification that triggers the
//! pipeline: an ordered list of records, each naming a bucket and an object
//! key. Filtering to the staging prefix is the notifier's responsibility,
//! not this code's.

use serde::{Deserialize, Serialize};

/// A batch of object-created notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectCreatedEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// One notified object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_notification() {
        let json = r#"{
            "Records": [
                {
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": { "name": "import-bucket", "arn": "arn:aws:s3:::import-bucket" },
                        "object": { "key": "uploaded/products.csv", "size": 1024 }
                    }
                }
            ]
        }"#;

        let event: ObjectCreatedEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].s3.bucket.name, "import-bucket");
        assert_eq!(event.records[0].s3.object.key, "uploaded/products.csv");
    }

    #[test]
    fn test_deserialize_empty_event() {
        let event: ObjectCreatedEvent = serde_json::from_str("{}").expect("valid event");
        assert!(event.records.is_empty());
    }

    #[test]
    fn test_records_keep_notification_order() {
        let json = r#"{
            "Records": [
                { "s3": { "bucket": { "name": "b" }, "object": { "key": "uploaded/a.csv" } } },
                { "s3": { "bucket": { "name": "b" }, "object": { "key": "uploaded/b.csv" } } }
            ]
        }"#;

        let event: ObjectCreatedEvent = serde_json::from_str(json).expect("valid event");
        let keys: Vec<_> = event
            .records
            .iter()
            .map(|r| r.s3.object.key.as_str())
            .collect();
        assert_eq!(keys, vec!["uploaded/a.csv", "uploaded/b.csv"]);
    }
}
