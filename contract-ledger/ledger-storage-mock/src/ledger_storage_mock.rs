use contract_ledger_core::{DocumentId, LedgerRecord};
use contract_ledger_store::{Error, LedgerRecordFilter, Result};
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

#[derive(Default)]
struct LedgerStorageMockState {
    ledger_record_m: BTreeMap<(DocumentId, u64), LedgerRecord>,
}

/// In-memory LedgerStorage for tests and for running the service without a database.  Writes
/// take effect immediately; the transaction handle exists only to satisfy the trait.  This is
/// still atomic for LedgerStore, which performs exactly one write per operation, as its last
/// step, and relies on the (document, version index) uniqueness check enforced here under lock.
#[derive(Clone, Default)]
pub struct LedgerStorageMock {
    state_la: Arc<RwLock<LedgerStorageMockState>>,
}

impl LedgerStorageMock {
    pub fn new() -> Self {
        Self::default()
    }
    /// Insert a record without any uniqueness or chain checks.  Only useful for tests that need
    /// to plant a corrupted chain.
    pub fn insert_unchecked(&self, ledger_record: LedgerRecord) {
        let mut state_g = self.write_state();
        state_g.ledger_record_m.insert(
            (ledger_record.document_id, ledger_record.version_index),
            ledger_record,
        );
    }
    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, LedgerStorageMockState> {
        // A poisoned lock only means another thread panicked mid-test; the map is still usable.
        self.state_la
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, LedgerStorageMockState> {
        self.state_la
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl storage_traits::StorageDynT for LedgerStorageMock {
    async fn begin_transaction(
        &self,
    ) -> storage_traits::Result<Box<dyn storage_traits::TransactionDynT>> {
        Ok(Box::new(LedgerStorageMockTransaction))
    }
}

#[async_trait::async_trait]
impl contract_ledger_store::LedgerStorage for LedgerStorageMock {
    async fn add_ledger_record(
        &self,
        _transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        ledger_record: &LedgerRecord,
    ) -> Result<()> {
        let key = (ledger_record.document_id, ledger_record.version_index);
        let mut state_g = self.write_state();
        if state_g.ledger_record_m.contains_key(&key) {
            return Err(Error::VersionIndexTaken {
                document_id: ledger_record.document_id,
                version_index: ledger_record.version_index,
            });
        }
        state_g.ledger_record_m.insert(key, ledger_record.clone());
        tracing::trace!(
            "LedgerStorageMock stored record {} of document {}",
            ledger_record.version_index,
            ledger_record.document_id
        );
        Ok(())
    }
    async fn get_ledger_record(
        &self,
        _transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        document_id: &DocumentId,
        version_index: u64,
    ) -> Result<Option<LedgerRecord>> {
        let state_g = self.read_state();
        Ok(state_g
            .ledger_record_m
            .get(&(*document_id, version_index))
            .cloned())
    }
    async fn get_latest_ledger_record(
        &self,
        _transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        document_id: &DocumentId,
    ) -> Result<Option<LedgerRecord>> {
        let state_g = self.read_state();
        Ok(state_g
            .ledger_record_m
            .range((*document_id, 0)..=(*document_id, u64::MAX))
            .next_back()
            .map(|(_, ledger_record)| ledger_record.clone()))
    }
    async fn get_ledger_records(
        &self,
        _transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        ledger_record_filter: &LedgerRecordFilter,
    ) -> Result<Vec<LedgerRecord>> {
        let state_g = self.read_state();
        // The map's key order is already (document_id, version_index).
        let ledger_record_v = match ledger_record_filter.document_id_o {
            Some(document_id) => state_g
                .ledger_record_m
                .range((document_id, 0)..=(document_id, u64::MAX))
                .map(|(_, ledger_record)| ledger_record)
                .filter(|ledger_record| ledger_record_filter.matches(ledger_record))
                .cloned()
                .collect(),
            None => state_g
                .ledger_record_m
                .values()
                .filter(|ledger_record| ledger_record_filter.matches(ledger_record))
                .cloned()
                .collect(),
        };
        Ok(ledger_record_v)
    }
}

/// No-op transaction handle for LedgerStorageMock.
pub struct LedgerStorageMockTransaction;

#[async_trait::async_trait]
impl storage_traits::TransactionDynT for LedgerStorageMockTransaction {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
    async fn commit(self: Box<Self>) -> storage_traits::Result<()> {
        Ok(())
    }
    async fn rollback(self: Box<Self>) -> storage_traits::Result<()> {
        Err(storage_traits::Error::Backend(
            "LedgerStorageMock does not support rollback; its writes are applied immediately"
                .into(),
        ))
    }
}
