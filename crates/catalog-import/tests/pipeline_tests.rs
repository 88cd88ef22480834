//! Import pipeline integration tests
//!
//! These tests drive the orchestrator end to end against in-memory
//! collaborators and verify the observable contract:
//! - publish count equals decoded row count, in file order
//! - a fetch miss publishes nothing and never finalizes
//! - a publish or decode failure leaves the staged object untouched
//! - success performs exactly one copy then one delete, after the last publish
//! - one object's failure never halts its siblings in a batch

use async_trait::async_trait;
use catalog_common::{CatalogError, Result};
use catalog_import::decoder::DecodedRow;
use catalog_import::event::ObjectCreatedEvent;
use catalog_import::pipeline::ImportPipeline;
use catalog_import::publisher::RecordPublisher;
use catalog_import::storage::{ObjectBody, ObjectStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SAMPLE_CSV: &str = "title,description,price,count\n\
                          Product A,Best product,99,10\n\
                          Product B,Another item,49,5\n";

/// Shared call log so tests can assert cross-collaborator ordering.
type CallLog = Arc<Mutex<Vec<String>>>;

struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    calls: CallLog,
    fail_copy: bool,
    fail_delete: bool,
}

impl MemoryStore {
    fn new(calls: CallLog) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            calls,
            fail_copy: false,
            fail_delete: false,
        }
    }

    fn with_object(self, key: &str, body: &str) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.as_bytes().to_vec());
        self
    }

    fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn fetch(&self, _bucket: &str, key: &str) -> Result<ObjectBody> {
        self.calls.lock().unwrap().push(format!("fetch {}", key));

        let objects = self.objects.lock().unwrap();
        let body = objects
            .get(key)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))?;

        Ok(Box::new(std::io::Cursor::new(body)))
    }

    async fn copy(&self, _bucket: &str, source_key: &str, dest_key: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("copy {} -> {}", source_key, dest_key));

        if self.fail_copy {
            return Err(CatalogError::Upstream("copy rejected".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        let body = objects
            .get(source_key)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(source_key.to_string()))?;
        objects.insert(dest_key.to_string(), body);

        Ok(())
    }

    async fn delete(&self, _bucket: &str, key: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("delete {}", key));

        if self.fail_delete {
            return Err(CatalogError::Upstream("delete rejected".to_string()));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn presign_upload(
        &self,
        _bucket: &str,
        key: &str,
        _expires_in: std::time::Duration,
    ) -> Result<String> {
        Ok(format!("https://store.test/{}", key))
    }
}

struct RecordingPublisher {
    bodies: Mutex<Vec<String>>,
    calls: CallLog,
    fail_at: Option<usize>,
}

impl RecordingPublisher {
    fn new(calls: CallLog) -> Self {
        Self {
            bodies: Mutex::new(Vec::new()),
            calls,
            fail_at: None,
        }
    }

    /// Reject the Nth publish (1-based).
    fn failing_at(calls: CallLog, n: usize) -> Self {
        Self {
            bodies: Mutex::new(Vec::new()),
            calls,
            fail_at: Some(n),
        }
    }

    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordPublisher for RecordingPublisher {
    async fn publish(&self, row: &DecodedRow) -> Result<()> {
        let mut bodies = self.bodies.lock().unwrap();
        let attempt = bodies.len() + 1;

        if self.fail_at == Some(attempt) {
            return Err(CatalogError::Publish("queue rejected message".to_string()));
        }

        bodies.push(serde_json::to_string(row)?);
        self.calls.lock().unwrap().push(format!("publish {}", attempt));
        Ok(())
    }
}

fn pipeline_with(
    store: MemoryStore,
    publisher: RecordingPublisher,
) -> (ImportPipeline, Arc<MemoryStore>, Arc<RecordingPublisher>) {
    let store = Arc::new(store);
    let publisher = Arc::new(publisher);
    let pipeline = ImportPipeline::new(store.clone(), publisher.clone());
    (pipeline, store, publisher)
}

// ============================================================================
// Single-object processing
// ============================================================================

#[tokio::test]
async fn test_successful_import_publishes_every_row_then_relocates() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone()).with_object("uploaded/products.csv", SAMPLE_CSV);
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, store, publisher) = pipeline_with(store, publisher);

    let summary = pipeline
        .process_object("import-bucket", "uploaded/products.csv")
        .await
        .expect("import succeeds");

    assert_eq!(summary.rows_published, 2);
    assert_eq!(summary.parsed_key, "parsed/products.csv");

    // Nth message body matches the Nth row, in file order.
    let bodies = publisher.bodies();
    assert_eq!(
        bodies,
        vec![
            r#"{"title":"Product A","description":"Best product","price":"99","count":"10"}"#,
            r#"{"title":"Product B","description":"Another item","price":"49","count":"5"}"#,
        ]
    );

    // Staged object gone, parsed copy present.
    assert!(!store.has_object("uploaded/products.csv"));
    assert!(store.has_object("parsed/products.csv"));

    // Exactly one copy and one delete, in that order, after the last publish.
    let log = calls.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            "fetch uploaded/products.csv",
            "publish 1",
            "publish 2",
            "copy uploaded/products.csv -> parsed/products.csv",
            "delete uploaded/products.csv",
        ]
    );
}

#[tokio::test]
async fn test_fetch_miss_publishes_nothing_and_never_finalizes() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone());
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, _store, publisher) = pipeline_with(store, publisher);

    let err = pipeline
        .process_object("import-bucket", "uploaded/missing.csv")
        .await
        .expect_err("missing object fails");

    assert!(matches!(err, CatalogError::NotFound(_)));
    assert!(publisher.bodies().is_empty());

    let log = calls.lock().unwrap().clone();
    assert_eq!(log, vec!["fetch uploaded/missing.csv"]);
}

#[tokio::test]
async fn test_publish_failure_leaves_staged_object_untouched() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone()).with_object("uploaded/products.csv", SAMPLE_CSV);
    let publisher = RecordingPublisher::failing_at(calls.clone(), 2);
    let (pipeline, store, publisher) = pipeline_with(store, publisher);

    let err = pipeline
        .process_object("import-bucket", "uploaded/products.csv")
        .await
        .expect_err("second publish fails");

    assert!(matches!(err, CatalogError::Publish(_)));

    // The first row was already forwarded; the failure stops the stream.
    assert_eq!(publisher.bodies().len(), 1);

    // No copy, no delete; the original stays put for a corrective re-drive.
    assert!(store.has_object("uploaded/products.csv"));
    assert!(!store.has_object("parsed/products.csv"));
    let log = calls.lock().unwrap().clone();
    assert!(!log.iter().any(|c| c.starts_with("copy")));
    assert!(!log.iter().any(|c| c.starts_with("delete")));
}

#[tokio::test]
async fn test_decode_failure_leaves_staged_object_untouched() {
    let malformed = "title,price\nProduct A,99\n\"unterminated,quote\n";
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone()).with_object("uploaded/bad.csv", malformed);
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, store, publisher) = pipeline_with(store, publisher);

    let err = pipeline
        .process_object("import-bucket", "uploaded/bad.csv")
        .await
        .expect_err("malformed stream fails");

    assert!(matches!(err, CatalogError::Parse(_)));

    // Rows produced before the failure remain forwarded.
    assert_eq!(publisher.bodies().len(), 1);

    assert!(store.has_object("uploaded/bad.csv"));
    let log = calls.lock().unwrap().clone();
    assert!(!log.iter().any(|c| c.starts_with("copy")));
    assert!(!log.iter().any(|c| c.starts_with("delete")));
}

#[tokio::test]
async fn test_delete_failure_after_copy_is_fatal() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut store =
        MemoryStore::new(calls.clone()).with_object("uploaded/products.csv", SAMPLE_CSV);
    store.fail_delete = true;
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, store, _publisher) = pipeline_with(store, publisher);

    let err = pipeline
        .process_object("import-bucket", "uploaded/products.csv")
        .await
        .expect_err("delete failure is fatal");

    assert!(matches!(err, CatalogError::Upstream(_)));

    // The copy landed before the delete failed; both prefixes now hold the
    // object and the outcome reports the fault instead of silent success.
    assert!(store.has_object("uploaded/products.csv"));
    assert!(store.has_object("parsed/products.csv"));
}

#[tokio::test]
async fn test_empty_file_with_header_finalizes_without_publishing() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone())
        .with_object("uploaded/empty.csv", "title,description,price,count\n");
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, store, publisher) = pipeline_with(store, publisher);

    let summary = pipeline
        .process_object("import-bucket", "uploaded/empty.csv")
        .await
        .expect("header-only import succeeds");

    assert_eq!(summary.rows_published, 0);
    assert!(publisher.bodies().is_empty());
    assert!(store.has_object("parsed/empty.csv"));
    assert!(!store.has_object("uploaded/empty.csv"));
}

// ============================================================================
// Batch processing
// ============================================================================

fn batch_event(keys: &[&str]) -> ObjectCreatedEvent {
    let records = keys
        .iter()
        .map(|key| {
            serde_json::json!({
                "s3": {
                    "bucket": { "name": "import-bucket" },
                    "object": { "key": key }
                }
            })
        })
        .collect::<Vec<_>>();

    serde_json::from_value(serde_json::json!({ "Records": records })).expect("valid event")
}

#[tokio::test]
async fn test_batch_failure_does_not_halt_siblings() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone()).with_object("uploaded/second.csv", SAMPLE_CSV);
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, store, _publisher) = pipeline_with(store, publisher);

    let event = batch_event(&["uploaded/missing.csv", "uploaded/second.csv"]);
    let outcomes = pipeline.process_event(&event).await;

    assert_eq!(outcomes.len(), 2);

    // First object is dropped with NotFound.
    assert_eq!(outcomes[0].key, "uploaded/missing.csv");
    assert!(matches!(
        outcomes[0].result,
        Err(CatalogError::NotFound(_))
    ));

    // Second object still completed its own state machine.
    assert_eq!(outcomes[1].key, "uploaded/second.csv");
    let summary = outcomes[1].result.as_ref().expect("second import succeeds");
    assert_eq!(summary.rows_published, 2);
    assert!(store.has_object("parsed/second.csv"));
}

#[tokio::test]
async fn test_batch_processes_objects_in_notification_order() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new(calls.clone())
        .with_object("uploaded/a.csv", "title\nfirst\n")
        .with_object("uploaded/b.csv", "title\nsecond\n");
    let publisher = RecordingPublisher::new(calls.clone());
    let (pipeline, _store, _publisher) = pipeline_with(store, publisher);

    let event = batch_event(&["uploaded/a.csv", "uploaded/b.csv"]);
    let outcomes = pipeline.process_event(&event).await;

    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    let log = calls.lock().unwrap().clone();
    let fetches: Vec<_> = log.iter().filter(|c| c.starts_with("fetch")).collect();
    assert_eq!(fetches, vec!["fetch uploaded/a.csv", "fetch uploaded/b.csv"]);

    // The first object fully finalizes before the second is fetched.
    let first_delete = log.iter().position(|c| c == "delete uploaded/a.csv");
    let second_fetch = log.iter().position(|c| c == "fetch uploaded/b.csv");
    assert!(first_delete.is_some());
    assert!(first_delete < second_fetch);
}
