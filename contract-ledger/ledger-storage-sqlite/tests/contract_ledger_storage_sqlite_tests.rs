use contract_ledger_core::{fingerprint_bytes, DocumentId, Principal};
use contract_ledger_store::{Error, LedgerStorage, LedgerStore};
use contract_ledger_storage_sqlite::LedgerStorageSQLite;
use std::sync::Arc;

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    test_util::ctor_overall_init();
}

/// Each in-memory SQLite connection is its own database, so the pool must hold exactly one
/// connection for its whole life.
async fn in_memory_ledger_storage() -> LedgerStorageSQLite {
    let sqlite_pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("pass");
    LedgerStorageSQLite::open_and_run_migrations(sqlite_pool)
        .await
        .expect("pass")
}

#[tokio::test]
async fn test_ledger_storage_sqlite_conformance() {
    let ledger_store = LedgerStore::new(Arc::new(in_memory_ledger_storage().await));
    test_util::ledger_store_conformance(ledger_store).await;
}

/// The service's default setup: a file database shared by a pool of several connections.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_ledger_storage_sqlite_racing_writers_on_file_pool() {
    let temp_dir = tempfile::tempdir().expect("pass");
    let database_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("ledger.db").display()
    );
    let sqlite_pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("pass");
    let ledger_store = LedgerStore::new(Arc::new(
        LedgerStorageSQLite::open_and_run_migrations(sqlite_pool.clone())
            .await
            .expect("pass"),
    ));
    test_util::ledger_store_race_conformance(ledger_store).await;
    sqlite_pool.close().await;
}

#[tokio::test]
async fn test_ledger_storage_sqlite_file_persists_across_pools() {
    let database_path = std::env::temp_dir().join(format!(
        "contract-ledger-sqlite-test-{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&database_path);
    let database_url = format!("sqlite://{}?mode=rwc", database_path.display());

    let alice = Principal::new("0xA11CE").expect("pass");
    let fingerprint_a = fingerprint_bytes(b"persisted A");
    let fingerprint_b = fingerprint_bytes(b"persisted B");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    {
        let sqlite_pool = sqlx::SqlitePool::connect(&database_url)
            .await
            .expect("pass");
        let ledger_store = LedgerStore::new(Arc::new(
            LedgerStorageSQLite::open_and_run_migrations(sqlite_pool.clone())
                .await
                .expect("pass"),
        ));
        ledger_store
            .create_document(None, &document_id, &fingerprint_a, &alice)
            .await
            .expect("pass");
        ledger_store
            .update_document(None, &document_id, &fingerprint_b, &alice)
            .await
            .expect("pass");
        sqlite_pool.close().await;
    }
    {
        // Running migrations a second time must be a no-op.
        let sqlite_pool = sqlx::SqlitePool::connect(&database_url)
            .await
            .expect("pass");
        let ledger_store = LedgerStore::new(Arc::new(
            LedgerStorageSQLite::open_and_run_migrations(sqlite_pool.clone())
                .await
                .expect("pass"),
        ));
        assert_eq!(
            ledger_store
                .get_latest_hash(None, &document_id)
                .await
                .expect("pass"),
            fingerprint_b
        );
        let history = ledger_store
            .get_history(None, &document_id)
            .await
            .expect("pass");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version_record.recorded_by, alice);
        sqlite_pool.close().await;
    }
    let _ = std::fs::remove_file(&database_path);
}

#[tokio::test]
async fn test_ledger_storage_sqlite_rejects_duplicate_slot() {
    let ledger_storage = in_memory_ledger_storage().await;
    let alice = Principal::new("0xA11CE").expect("pass");
    let fingerprint_a = fingerprint_bytes(b"duplicate slot A");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);
    let ledger_store = LedgerStore::new(Arc::new(ledger_storage.clone()));
    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");

    let genesis_record = ledger_store
        .get_history_at(None, &document_id, 0)
        .await
        .expect("pass");
    match ledger_storage.add_ledger_record(None, &genesis_record).await {
        Err(Error::VersionIndexTaken {
            document_id: d,
            version_index: 0,
        }) if d == document_id => {}
        other => panic!("expected VersionIndexTaken, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ledger_storage_sqlite_preserves_timestamp() {
    let ledger_storage = in_memory_ledger_storage().await;
    let ledger_store = LedgerStore::new(Arc::new(ledger_storage));
    let alice = Principal::new("0xA11CE").expect("pass");
    let fingerprint_a = fingerprint_bytes(b"timestamp A");
    let document_id = DocumentId::from_genesis_fingerprint(fingerprint_a);

    let before = time::OffsetDateTime::now_utc();
    ledger_store
        .create_document(None, &document_id, &fingerprint_a, &alice)
        .await
        .expect("pass");
    let after = time::OffsetDateTime::now_utc();
    let genesis_record = ledger_store
        .get_history_at(None, &document_id, 0)
        .await
        .expect("pass");
    assert!(genesis_record.version_record.timestamp >= before);
    assert!(genesis_record.version_record.timestamp <= after);
}
