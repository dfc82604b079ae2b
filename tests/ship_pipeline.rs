//! Pipeline invariants, exercised against a mocked object store: no
//! network, real temp directory trees.

use buildlog_archiver::config::{ShipConfig, StorageTier};
use buildlog_archiver::ship::{ship, UploadResult};
use buildlog_archiver::store::{MockObjectStore, PreflightError, StoreError};
use std::fs::{create_dir_all, read, write, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

fn write_log(root: &Path, job: &str, build: &str, contents: &[u8]) -> PathBuf {
    let dir = root.join(job).join("builds").join(build);
    create_dir_all(&dir).expect("creating build dir failed");
    let log = dir.join("log");
    write(&log, contents).expect("writing log failed");
    log
}

/// Push a file's mtime back so it no longer matches the run date.
fn age_file(path: &Path, days: u64) {
    let then = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
    File::options()
        .write(true)
        .open(path)
        .expect("opening log for aging failed")
        .set_modified(then)
        .expect("setting mtime failed");
}

fn config_for(root: &Path, compress: bool) -> ShipConfig {
    ShipConfig {
        root_dir: root.to_path_buf(),
        bucket: "test-bucket".to_string(),
        storage_tier: StorageTier::DeepArchive,
        compress,
    }
}

/// Mock store that accepts every put and records the keys it saw.
fn accepting_store() -> (MockObjectStore, Arc<Mutex<Vec<String>>>) {
    let mut store = MockObjectStore::new();
    store.expect_preflight().returning(|| Ok(()));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_keys = Arc::clone(&seen);
    store.expect_put().returning(move |key, _, _| {
        seen_keys.lock().unwrap().push(key.to_string());
        Ok(())
    });
    (store, seen)
}

/// No stray files anywhere under `dir` beyond the expected log files.
fn gz_files_under(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|e| e == "gz") {
                found.push(path);
            }
        }
    }
    found
}

#[tokio::test]
async fn only_todays_log_is_shipped_and_deleted() {
    let root = tempfile::tempdir().unwrap();
    let fresh = write_log(root.path(), "build-A", "1", b"today's log");
    let stale = write_log(root.path(), "build-A", "2", b"yesterday's log");
    age_file(&stale, 2);

    let (store, seen) = accepting_store();
    let report = ship(&config_for(root.path(), true), &store)
        .await
        .expect("ship failed");

    assert_eq!(seen.lock().unwrap().as_slice(), ["build-A-1.log.gz"]);
    assert!(!fresh.exists(), "shipped log must be deleted locally");
    assert!(stale.exists(), "stale log must be left untouched");

    let transcript = report.transcript();
    assert_eq!(transcript.len(), 1, "exactly one outcome line: {transcript:?}");
    assert!(transcript[0].contains("build-A-1.log.gz"));
    assert!(transcript.iter().all(|line| !line.contains("build-A-2")));
}

#[tokio::test]
async fn failed_upload_leaves_the_local_log_byte_identical() {
    let root = tempfile::tempdir().unwrap();
    let contents = b"precious build log".to_vec();
    let log = write_log(root.path(), "flaky", "12", &contents);

    let mut store = MockObjectStore::new();
    store.expect_preflight().returning(|| Ok(()));
    store
        .expect_put()
        .times(1)
        .returning(|_, _, _| Err(StoreError::from("simulated transfer failure")));

    let report = ship(&config_for(root.path(), true), &store)
        .await
        .expect("per-artifact failures must not fail the run");

    assert!(log.exists());
    assert_eq!(read(&log).unwrap(), contents);
    assert_eq!(report.outcomes.len(), 1);
    match &report.outcomes[0].result {
        UploadResult::Failed { reason } => assert!(reason.contains("simulated transfer failure")),
        other => panic!("expected failure outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn compressed_upload_body_is_gzip_and_no_scratch_file_survives() {
    let root = tempfile::tempdir().unwrap();
    write_log(root.path(), "gzjob", "3", b"some log text that gzips fine");

    let mut store = MockObjectStore::new();
    store.expect_preflight().returning(|| Ok(()));
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&bodies);
    store.expect_put().times(1).returning(move |_, body, _| {
        captured.lock().unwrap().push(body);
        Ok(())
    });

    ship(&config_for(root.path(), true), &store)
        .await
        .expect("ship failed");

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(&bodies[0][..2], &[0x1f, 0x8b], "body must be a gzip stream");
    assert!(
        gz_files_under(root.path()).is_empty(),
        "no compressed scratch file may survive the run"
    );
}

#[tokio::test]
async fn uncompressed_mode_uploads_raw_bytes_under_the_log_key() {
    let root = tempfile::tempdir().unwrap();
    let contents = b"raw log".to_vec();
    write_log(root.path(), "rawjob", "9", &contents);

    let mut store = MockObjectStore::new();
    store.expect_preflight().returning(|| Ok(()));
    let expected = contents.clone();
    store
        .expect_put()
        .times(1)
        .withf(move |key, body, tier| {
            key == "rawjob-9.log" && body == &expected && *tier == StorageTier::DeepArchive
        })
        .returning(|_, _, _| Ok(()));

    ship(&config_for(root.path(), false), &store)
        .await
        .expect("ship failed");
}

#[tokio::test]
async fn immediate_rerun_is_a_noop() {
    let root = tempfile::tempdir().unwrap();
    write_log(root.path(), "once", "1", b"ship me once");

    let (store, seen) = accepting_store();
    ship(&config_for(root.path(), true), &store)
        .await
        .expect("first run failed");
    assert_eq!(seen.lock().unwrap().len(), 1);

    let mut second = MockObjectStore::new();
    second.expect_preflight().returning(|| Ok(()));
    second.expect_put().times(0);
    let report = ship(&config_for(root.path(), true), &second)
        .await
        .expect("second run failed");
    assert!(report.outcomes.is_empty(), "second run must find nothing eligible");
}

#[tokio::test]
async fn preflight_failure_aborts_before_touching_any_file() {
    let root = tempfile::tempdir().unwrap();
    let log = write_log(root.path(), "untouched", "5", b"still here");

    let mut store = MockObjectStore::new();
    store.expect_preflight().returning(|| {
        Err(PreflightError {
            bucket: "test-bucket".to_string(),
            reason: "no such capability".to_string(),
        })
    });
    store.expect_put().times(0);

    let err = ship(&config_for(root.path(), true), &store)
        .await
        .expect_err("preflight failure must abort the run");
    assert!(
        err.downcast_ref::<PreflightError>().is_some(),
        "the precondition failure must stay typed for exit-code mapping"
    );
    assert!(log.exists());
    assert_eq!(read(&log).unwrap(), b"still here");
}
