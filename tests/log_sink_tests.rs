//! Logging sink tests
//!
//! Remote delivery is replaced by stub transports; the local queue lives in
//! memory or in a temp data directory.

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use parking_lot::Mutex;
use shortbox::config::LogSinkConfig;
use shortbox::errors::{self, ShortboxError};
use shortbox::services::log_sink::{HttpLogTransport, LOG_QUEUE_KEY, LocalLogQueue};
use shortbox::services::{
    Level, LogOutcome, LogRecord, LogSink, LogTransport, Package, QueuedLog, Stack,
    TransportError,
};
use shortbox::storage::{BlobStorage, FileBlobStorage, MemoryBlobStorage};
use shortbox::utils::ManualClock;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<LogRecord>>,
}

impl LogTransport for RecordingTransport {
    fn send(&self, record: &LogRecord) -> Result<(), TransportError> {
        self.sent.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct FailingTransport(TransportError);

impl LogTransport for FailingTransport {
    fn send(&self, _record: &LogRecord) -> Result<(), TransportError> {
        Err(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Memory backend whose next read can be made to fail once
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryBlobStorage,
    fail_next_read: AtomicBool,
}

impl BlobStorage for FlakyStorage {
    fn get_item(&self, key: &str) -> errors::Result<Option<String>> {
        if self.fail_next_read.swap(false, Ordering::SeqCst) {
            return Err(ShortboxError::file_operation("disk unavailable"));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> errors::Result<()> {
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> errors::Result<()> {
        self.inner.remove_item(key)
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

/// Collector on an ephemeral port: `POST /down` answers 503, `POST /up` 201
fn spawn_collector() -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            let server = HttpServer::new(|| {
                App::new()
                    .route(
                        "/down",
                        web::post().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
                    )
                    .route("/up", web::post().to(|| async { HttpResponse::Created().finish() }))
            })
            .workers(1)
            .listen(listener)
            .unwrap()
            .run();
            tx.send(server.handle()).unwrap();
            server.await
        })
    });

    (format!("http://{}", addr), rx.recv().unwrap())
}

fn collector_config(endpoint: String) -> LogSinkConfig {
    LogSinkConfig {
        endpoint,
        timeout_secs: 2,
        ..Default::default()
    }
}

fn sample_record() -> LogRecord {
    LogRecord::parse("backend", "error", "api", "collector test").unwrap()
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(1_700_000_000_000))
}

#[test]
fn test_delivered_records_are_not_queued() {
    let transport = Arc::new(RecordingTransport::default());
    let storage = Arc::new(MemoryBlobStorage::new());
    let sink = LogSink::new(Some(transport.clone()), storage.clone(), clock());

    let outcome = sink
        .log("backend", "info", "api", "handler started")
        .unwrap();
    assert_eq!(outcome, LogOutcome::Delivered);

    let sent = transport.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].stack, Stack::Backend);
    assert_eq!(sent[0].level, Level::Info);
    assert_eq!(sent[0].package, Package::Api);
    assert_eq!(sent[0].message, "handler started");
    assert!(sink.queued().is_empty());
    assert!(storage.get_item(LOG_QUEUE_KEY).unwrap().is_none());
}

#[test]
fn test_transport_failure_falls_back_to_queue() {
    let sink = LogSink::new(
        Some(Arc::new(FailingTransport(TransportError::Transport(
            "connection refused".into(),
        )))),
        Arc::new(MemoryBlobStorage::new()),
        clock(),
    );

    let outcome = sink.log("frontend", "error", "component", "render failed").unwrap();
    assert_eq!(outcome, LogOutcome::Queued);

    let queued = sink.queued();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].stack, Stack::Frontend);
    assert_eq!(queued[0].message, "render failed");
    assert_eq!(queued[0].timestamp, "2023-11-14T22:13:20.000Z");
}

#[test]
fn test_non_success_status_falls_back_to_queue() {
    let sink = LogSink::new(
        Some(Arc::new(FailingTransport(TransportError::Status(503)))),
        Arc::new(MemoryBlobStorage::new()),
        clock(),
    );
    assert_eq!(
        sink.log("backend", "fatal", "config", "boom").unwrap(),
        LogOutcome::Queued
    );
    assert_eq!(sink.queued().len(), 1);
}

#[test]
fn test_invalid_arguments_do_not_touch_queue() {
    let transport = Arc::new(RecordingTransport::default());
    let storage = Arc::new(MemoryBlobStorage::new());
    let sink = LogSink::new(Some(transport.clone()), storage.clone(), clock());

    for (stack, level, package) in [
        ("mobile", "info", "api"),
        ("backend", "verbose", "api"),
        ("backend", "info", "database"),
        ("", "info", "api"),
    ] {
        let err = sink.log(stack, level, package, "m").unwrap_err();
        assert!(matches!(err, ShortboxError::InvalidLogArgument(_)));
    }

    assert!(transport.sent.lock().is_empty());
    assert!(storage.get_item(LOG_QUEUE_KEY).unwrap().is_none());
}

#[test]
fn test_arguments_are_case_insensitive() {
    let transport = Arc::new(RecordingTransport::default());
    let sink = LogSink::new(
        Some(transport.clone()),
        Arc::new(MemoryBlobStorage::new()),
        clock(),
    );
    sink.log("FRONTEND", "Warn", "MiddleWare", "x").unwrap();

    let sent = transport.sent.lock();
    let json = serde_json::to_value(&sent[0]).unwrap();
    assert_eq!(json["stack"], "frontend");
    assert_eq!(json["level"], "warn");
    assert_eq!(json["package"], "middleware");
}

#[test]
fn test_queue_persists_in_data_dir() {
    let dir = TempDir::new().unwrap();
    {
        let storage = Arc::new(FileBlobStorage::new(dir.path()).unwrap());
        let sink = LogSink::new(None, storage, clock());
        sink.log("backend", "debug", "utils", "first").unwrap();
        sink.log("backend", "debug", "utils", "second").unwrap();
    }

    let storage = Arc::new(FileBlobStorage::new(dir.path()).unwrap());
    let sink = LogSink::new(None, storage, clock());
    let queued = sink.queued();
    assert_eq!(queued.len(), 2);
    assert_eq!(queued[0].message, "first");
    assert_eq!(queued[1].message, "second");

    assert_eq!(sink.clear_queue().unwrap(), 2);
    assert!(sink.queued().is_empty());
    assert!(!dir.path().join("logs.json").exists());
}

#[test]
fn test_queue_read_error_keeps_existing_records() {
    let storage = Arc::new(FlakyStorage::default());
    let sink = LogSink::new(None, storage.clone(), clock());
    sink.log("backend", "info", "api", "first").unwrap();
    sink.log("backend", "info", "api", "second").unwrap();

    storage.fail_next_read.store(true, Ordering::SeqCst);
    // 读取失败时 send 仍然不报错，只是这条记录丢失
    assert_eq!(
        sink.log("backend", "info", "api", "third").unwrap(),
        LogOutcome::Queued
    );

    let messages: Vec<String> = sink.queued().into_iter().map(|q| q.message).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn test_queue_append_propagates_read_error() {
    let storage = Arc::new(FlakyStorage::default());
    let queue = LocalLogQueue::new(storage.clone());
    let record = |message: &str| QueuedLog {
        stack: Stack::Frontend,
        level: Level::Debug,
        package: Package::State,
        message: message.to_string(),
        timestamp: "2024-01-01T00:00:00.000Z".to_string(),
    };
    queue.append(record("kept")).unwrap();

    storage.fail_next_read.store(true, Ordering::SeqCst);
    assert!(matches!(
        queue.append(record("lost")),
        Err(ShortboxError::FileOperation(_))
    ));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_http_transport_reports_collector_status() {
    let (base, handle) = spawn_collector();

    let down = HttpLogTransport::new(&collector_config(format!("{}/down", base)));
    assert_eq!(
        down.send(&sample_record()),
        Err(TransportError::Status(503))
    );

    let up = HttpLogTransport::new(&collector_config(format!("{}/up", base)));
    assert_eq!(up.send(&sample_record()), Ok(()));

    // 503 走本地队列
    let sink = LogSink::from_config(
        &collector_config(format!("{}/down", base)),
        Arc::new(MemoryBlobStorage::new()),
        clock(),
    );
    assert_eq!(
        sink.log("backend", "warn", "middleware", "collector down").unwrap(),
        LogOutcome::Queued
    );
    assert_eq!(sink.queued().len(), 1);

    actix_web::rt::System::new().block_on(handle.stop(true));
}
