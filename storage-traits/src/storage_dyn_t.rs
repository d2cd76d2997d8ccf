use crate::{Result, TransactionDynT};

/// Object-safe storage trait, able to begin a transaction of the backend's own type.  Callers
/// only ever see a `dyn TransactionDynT`, which the backend downcasts when it runs a query.
#[async_trait::async_trait]
pub trait StorageDynT {
    async fn begin_transaction(&self) -> Result<Box<dyn TransactionDynT>>;
}
