use crate::Result;

/// Object-safe transaction handle.  Dropping a transaction without committing must roll it back.
#[async_trait::async_trait]
pub trait TransactionDynT: Send + Sync {
    /// Lets the storage backend downcast this handle to its concrete transaction type.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
    /// Commit the transaction, consuming it in the process.
    async fn commit(self: Box<Self>) -> Result<()>;
    /// Rollback the transaction, consuming it in the process.
    async fn rollback(self: Box<Self>) -> Result<()>;
}

#[cfg(feature = "sqlx-sqlite")]
#[async_trait::async_trait]
impl TransactionDynT for sqlx::Transaction<'static, sqlx::Sqlite> {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
    async fn commit(self: Box<Self>) -> Result<()> {
        Ok((*self).commit().await?)
    }
    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok((*self).rollback().await?)
    }
}
