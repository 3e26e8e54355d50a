//! Integration tests for [`message_store::MessageStoreHandler`] on on-disk databases.
//!
//! Covers persistence across reopen, version handling, concurrent opens, generated batches and repeated range queries.

use std::collections::HashMap;

use message_store::{
    Connection, ConnectionState, MessageStoreHandler, Repository, StorageError, StoreConfig,
    TimeRange,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn disk_config(dir: &tempfile::TempDir) -> StoreConfig {
    StoreConfig::new(dir.path().to_str().expect("utf-8 temp path"))
}

/// **Test: Records survive closing and reopening the database file.**
///
/// **Setup:** Temp dir; open, insert 50 generated messages, close.
/// **Action:** Open a fresh handler on the same directory.
/// **Expected:** Schema is already at version 1; the 50 records are still there.
#[tokio::test]
async fn test_records_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let records = seed_messages::generate_messages(&mut StdRng::seed_from_u64(1), 50);

    let mut handler = MessageStoreHandler::new(disk_config(&dir));
    handler.open().await.expect("Failed to open store");
    handler.insert_rows(&records).await.expect("Failed to insert");
    handler.close().await;

    assert!(dir.path().join("chat.db").exists());

    let mut reopened = MessageStoreHandler::new(disk_config(&dir));
    reopened.open().await.expect("Failed to reopen store");

    assert_eq!(reopened.state(), ConnectionState::Open);
    assert_eq!(reopened.repository().unwrap().connection().version(), 1);
    assert_eq!(reopened.count_messages().await.unwrap(), 50);
}

/// **Test: A full-range scan returns exactly what was inserted.**
///
/// **Setup:** 300 generated messages (distinct mids, all dated at generation time).
/// **Action:** Insert, then scan `[min date, max date]`.
/// **Expected:** 300 records back, each equal to its inserted counterpart.
#[tokio::test]
async fn test_full_range_scan_matches_inserted_batch() {
    let dir = tempfile::tempdir().unwrap();
    let records = seed_messages::generate_messages(&mut StdRng::seed_from_u64(2), 300);

    let mut handler = MessageStoreHandler::new(disk_config(&dir));
    handler.open().await.unwrap();
    handler.insert_rows(&records).await.unwrap();

    let min = records.iter().map(|m| m.date).min().unwrap();
    let max = records.iter().map(|m| m.date).max().unwrap();
    let found = handler.get_messages_within_time_range(min, max).await.unwrap();

    assert_eq!(found.len(), records.len());
    let by_mid: HashMap<_, _> = records.iter().map(|m| (m.mid.as_str(), m)).collect();
    for message in &found {
        assert_eq!(Some(&message), by_mid.get(message.mid.as_str()));
    }
}

/// **Test: Repeated queries with the same bounds agree.**
///
/// **Setup:** Messages at spread-out dates.
/// **Action:** Query the same range twice through the `Repository` trait.
/// **Expected:** Same records, only dates inside the range, ascending by date.
#[tokio::test]
async fn test_range_query_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let base = 1_700_000_000_000;
    let records: Vec<_> = (0..40)
        .map(|i| seed_messages::generate_random_message(&mut rng, base + (i % 10) * 1_000))
        .collect();

    let mut handler = MessageStoreHandler::new(disk_config(&dir));
    handler.open().await.unwrap();
    let repo: &dyn Repository = &handler;
    repo.insert_rows(&records).await.unwrap();

    let range = TimeRange::new(base + 2_000, base + 6_000);
    let first = repo.get_messages_in(&range).await.unwrap();
    let second = repo.get_messages_in(&range).await.unwrap();

    assert_eq!(first.len(), 20);
    assert!(first.iter().all(|m| range.contains(m.date)));
    assert!(first.windows(2).all(|w| w[0].date <= w[1].date));

    let mut first_mids: Vec<_> = first.iter().map(|m| m.mid.clone()).collect();
    let mut second_mids: Vec<_> = second.iter().map(|m| m.mid.clone()).collect();
    first_mids.sort();
    second_mids.sort();
    assert_eq!(first_mids, second_mids);
}

/// **Test: A database stamped with a newer schema version is refused.**
///
/// **Setup:** Open once, then set `user_version` to 2 directly.
/// **Action:** Open a handler on the same file.
/// **Expected:** `StorageUnavailable`, handler ends `Failed`.
#[tokio::test]
async fn test_newer_version_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let connection = Connection::open(&disk_config(&dir)).await.unwrap();
    sqlx::query("PRAGMA user_version = 2")
        .execute(connection.pool())
        .await
        .unwrap();
    connection.close().await;

    let mut handler = MessageStoreHandler::new(disk_config(&dir));
    let result = handler.open().await;

    match result {
        Err(StorageError::StorageUnavailable { cause }) => assert!(cause.contains("newer")),
        other => panic!("expected StorageUnavailable, got {:?}", other),
    }
    assert_eq!(handler.state(), ConnectionState::Failed);
}

/// **Test: The upgrade does not adopt a foreign table of the same name.**
///
/// **Setup:** Version-0 database that already has a `message` table.
/// **Action:** Open a handler.
/// **Expected:** `StorageUnavailable`; the version stays 0 because the upgrade rolled back.
#[tokio::test]
async fn test_upgrade_over_existing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = disk_config(&dir);
    config.store_name = "scratch".to_string();
    let connection = Connection::open(&config).await.unwrap();
    sqlx::query("CREATE TABLE message (id INTEGER)")
        .execute(connection.pool())
        .await
        .unwrap();
    sqlx::query("PRAGMA user_version = 0")
        .execute(connection.pool())
        .await
        .unwrap();
    connection.close().await;

    let mut handler = MessageStoreHandler::new(disk_config(&dir));
    let result = handler.open().await;
    assert!(matches!(result, Err(StorageError::StorageUnavailable { .. })));

    let mut scratch_config = disk_config(&dir);
    scratch_config.store_name = "scratch".to_string();
    let reopened = Connection::open(&scratch_config).await;
    assert!(matches!(reopened, Err(StorageError::StorageUnavailable { .. })));
}

/// **Test: A rejected batch leaves earlier commits untouched.**
///
/// **Setup:** One committed batch of 10.
/// **Action:** Insert a second batch of 10 whose last record repeats a committed mid.
/// **Expected:** `WriteFailed` naming that mid; still exactly 10 records.
#[tokio::test]
async fn test_rejected_batch_keeps_prior_commits() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let committed = seed_messages::generate_messages(&mut rng, 10);
    let mut rejected = seed_messages::generate_messages(&mut rng, 10);
    rejected[9].mid = committed[0].mid.clone();

    let mut handler = MessageStoreHandler::new(disk_config(&dir));
    handler.open().await.unwrap();
    handler.insert_rows(&committed).await.unwrap();

    let err = handler.insert_rows(&rejected).await.unwrap_err();

    assert!(err.is_duplicate_key());
    match err {
        StorageError::WriteFailed { mid, .. } => assert_eq!(mid, Some(committed[0].mid.clone())),
        other => panic!("expected WriteFailed, got {:?}", other),
    }
    assert_eq!(handler.count_messages().await.unwrap(), 10);
}

/// **Test: Two opens racing on a brand-new database both succeed.**
///
/// **Setup:** Empty temp dir, no database file yet.
/// **Action:** `Connection::open` twice concurrently with `tokio::join!`.
/// **Expected:** Both handles open at version 1; the schema exists once and is usable from either.
#[tokio::test]
async fn test_concurrent_opens_on_new_database_both_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir);

    let (a, b) = tokio::join!(Connection::open(&config), Connection::open(&config));
    let a = a.expect("First concurrent open failed");
    let b = b.expect("Second concurrent open failed");

    assert_eq!(a.version(), 1);
    assert_eq!(b.version(), 1);
    assert_eq!(a.index_names().await.unwrap().len(), 3);

    let records = seed_messages::generate_messages(&mut StdRng::seed_from_u64(5), 3);
    let repo_a = message_store::MessageRepository::new(a);
    let repo_b = message_store::MessageRepository::new(b);
    repo_a.insert_rows(&records).await.unwrap();
    assert_eq!(repo_b.count_messages().await.unwrap(), 3);
}

/// **Test: Opens racing from separate worker threads never fail the schema upgrade.**
///
/// **Setup:** 10 fresh temp dirs.
/// **Action:** For each, spawn two tasks that open the same database at once.
/// **Expected:** All 20 opens succeed.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_opens_from_spawned_tasks() {
    for _ in 0..10 {
        let dir = tempfile::tempdir().unwrap();
        let config = disk_config(&dir);

        let first = tokio::spawn({
            let config = config.clone();
            async move { Connection::open(&config).await.map(|c| c.version()) }
        });
        let second = tokio::spawn(async move { Connection::open(&config).await.map(|c| c.version()) });

        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert_eq!(second.await.unwrap().unwrap(), 1);
    }
}
