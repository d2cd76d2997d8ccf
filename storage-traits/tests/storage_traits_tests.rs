use storage_traits::{Error, StorageDynT, TransactionDynT};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

#[derive(Default)]
struct CountingStorage {
    commit_count_a: Arc<AtomicUsize>,
}

struct CountingTransaction {
    commit_count_a: Arc<AtomicUsize>,
    write_count: usize,
}

#[async_trait::async_trait]
impl StorageDynT for CountingStorage {
    async fn begin_transaction(&self) -> storage_traits::Result<Box<dyn TransactionDynT>> {
        Ok(Box::new(CountingTransaction {
            commit_count_a: self.commit_count_a.clone(),
            write_count: 0,
        }))
    }
}

#[async_trait::async_trait]
impl TransactionDynT for CountingTransaction {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
    async fn commit(self: Box<Self>) -> storage_traits::Result<()> {
        self.commit_count_a
            .fetch_add(self.write_count, Ordering::SeqCst);
        Ok(())
    }
    async fn rollback(self: Box<Self>) -> storage_traits::Result<()> {
        Err(Error::Backend("rollback is not supported".into()))
    }
}

#[tokio::test]
async fn test_downcast_and_commit() {
    let storage = CountingStorage::default();
    let mut transaction_b = storage.begin_transaction().await.expect("pass");
    let counting_transaction = transaction_b
        .as_any_mut()
        .downcast_mut::<CountingTransaction>()
        .expect("pass");
    counting_transaction.write_count += 2;
    assert!(transaction_b.as_any_mut().downcast_mut::<String>().is_none());
    transaction_b.commit().await.expect("pass");
    assert_eq!(storage.commit_count_a.load(Ordering::SeqCst), 2);

    let transaction_b = storage.begin_transaction().await.expect("pass");
    assert!(matches!(
        transaction_b.rollback().await,
        Err(Error::Backend(_))
    ));
}

#[test]
fn test_only_unavailable_is_retryable() {
    assert!(Error::Unavailable("database is locked".into()).is_retryable());
    assert!(!Error::Backend("no such table".into()).is_retryable());
    assert!(!Error::TransactionTypeMismatch("expected SQLite").is_retryable());
}
