use contract_ledger_store::LedgerStore;
use contract_ledger_storage_mock::LedgerStorageMock;
use std::sync::Arc;

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    test_util::ctor_overall_init();
}

#[tokio::test]
async fn test_ledger_storage_mock_conformance() {
    let ledger_store = LedgerStore::new(Arc::new(LedgerStorageMock::new()));
    test_util::ledger_store_conformance(ledger_store).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_ledger_storage_mock_racing_writers() {
    let ledger_store = LedgerStore::new(Arc::new(LedgerStorageMock::new()));
    test_util::ledger_store_race_conformance(ledger_store).await;
}

#[tokio::test]
async fn test_ledger_storage_mock_rollback_is_reported() {
    use storage_traits::StorageDynT;
    let ledger_storage_mock = LedgerStorageMock::new();
    let transaction_b = ledger_storage_mock.begin_transaction().await.expect("pass");
    assert!(transaction_b.rollback().await.is_err());
}
