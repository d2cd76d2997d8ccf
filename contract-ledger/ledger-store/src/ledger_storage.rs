use crate::{LedgerRecordFilter, Result};
use contract_ledger_core::{DocumentId, LedgerRecord};

/// Backend for the append-only table of ledger records.  Implementations only store and fetch;
/// the chain rules live in LedgerStore.
#[async_trait::async_trait]
pub trait LedgerStorage: Send + storage_traits::StorageDynT + Sync + 'static {
    /// Append a record.  Must fail with Error::VersionIndexTaken if a record already occupies
    /// the same (document_id, version_index) slot.  This uniqueness is what serializes racing
    /// writers against the same document, so it must hold across concurrent transactions.
    async fn add_ledger_record(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        ledger_record: &LedgerRecord,
    ) -> Result<()>;
    /// Get the record at a specific position in a document's chain, or None.
    async fn get_ledger_record(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        document_id: &DocumentId,
        version_index: u64,
    ) -> Result<Option<LedgerRecord>>;
    /// Get the highest-index record of a document, or None if the document was never created.
    async fn get_latest_ledger_record(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        document_id: &DocumentId,
    ) -> Result<Option<LedgerRecord>>;
    /// Get all records matching the filter, ordered by document_id and then version_index.
    async fn get_ledger_records(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        ledger_record_filter: &LedgerRecordFilter,
    ) -> Result<Vec<LedgerRecord>>;
}
