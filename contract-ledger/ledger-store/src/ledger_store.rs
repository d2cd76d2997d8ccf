use crate::{Error, LedgerRecordFilter, LedgerStorage, Result};
use contract_ledger_core::{
    DocumentId, Fingerprint, LedgerEvent, LedgerRecord, MissingIdentityPolicy, Principal,
    VersionRecord,
};
use std::sync::Arc;
use storage_traits::TransactionDynT;

/// The version ledger.  Each document identity is either absent or active; an active identity
/// owns an append-only chain of LedgerRecord-s whose highest-index record is the head.  Because
/// the head is derived from the chain itself, appending a record and advancing the head are a
/// single write.
///
/// Every mutating operation accepts an optional caller-supplied transaction.  If none is given,
/// the operation runs in its own transaction, which is committed before returning.
#[derive(Clone)]
pub struct LedgerStore {
    ledger_storage_a: Arc<dyn LedgerStorage>,
    missing_identity_policy: MissingIdentityPolicy,
}

impl LedgerStore {
    /// Create a new LedgerStore using the given LedgerStorage implementation.  Queries for
    /// identities that were never created fail, unless a different MissingIdentityPolicy is
    /// set via with_missing_identity_policy.
    pub fn new(ledger_storage_a: Arc<dyn LedgerStorage>) -> Self {
        Self {
            ledger_storage_a,
            missing_identity_policy: MissingIdentityPolicy::default(),
        }
    }
    pub fn with_missing_identity_policy(
        mut self,
        missing_identity_policy: MissingIdentityPolicy,
    ) -> Self {
        self.missing_identity_policy = missing_identity_policy;
        self
    }
    pub fn missing_identity_policy(&self) -> MissingIdentityPolicy {
        self.missing_identity_policy
    }

    /// Create a document identity with its genesis record.  Fails with Error::AlreadyExists if
    /// the identity is already active, which also makes a retried create safe.
    #[tracing::instrument(level = tracing::Level::DEBUG, err(Debug), skip(self, transaction_o))]
    pub async fn create_document(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
        fingerprint: &Fingerprint,
        recorded_by: &Principal,
    ) -> Result<LedgerEvent> {
        match transaction_o {
            Some(transaction) => {
                self.create_document_in(transaction, document_id, fingerprint, recorded_by)
                    .await
            }
            None => {
                use storage_traits::StorageDynT;
                let mut transaction_b = self.begin_transaction().await?;
                let ledger_event = self
                    .create_document_in(
                        transaction_b.as_mut(),
                        document_id,
                        fingerprint,
                        recorded_by,
                    )
                    .await?;
                transaction_b.commit().await?;
                Ok(ledger_event)
            }
        }
    }
    /// Append a new version to an active document.  If another writer advances the head
    /// between this call's read and its write, this fails with Error::HeadChanged and nothing
    /// is written.
    #[tracing::instrument(level = tracing::Level::DEBUG, err(Debug), skip(self, transaction_o))]
    pub async fn update_document(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
        new_fingerprint: &Fingerprint,
        recorded_by: &Principal,
    ) -> Result<LedgerEvent> {
        self.update_document_impl(transaction_o, document_id, None, new_fingerprint, recorded_by)
            .await
    }
    /// Like update_document, but only if the current head is expected_head.  Otherwise fails
    /// with Error::HeadChanged.
    #[tracing::instrument(level = tracing::Level::DEBUG, err(Debug), skip(self, transaction_o))]
    pub async fn update_document_if_head(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
        expected_head: &Fingerprint,
        new_fingerprint: &Fingerprint,
        recorded_by: &Principal,
    ) -> Result<LedgerEvent> {
        self.update_document_impl(
            transaction_o,
            document_id,
            Some(expected_head),
            new_fingerprint,
            recorded_by,
        )
        .await
    }
    /// Return the head fingerprint.  For an identity that was never created, this either fails
    /// with Error::DocumentNotFound or returns Fingerprint::ZERO, per the missing-identity policy.
    pub async fn get_latest_hash(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
    ) -> Result<Fingerprint> {
        match self
            .ledger_storage_a
            .get_latest_ledger_record(transaction_o, document_id)
            .await?
        {
            Some(ledger_record) => Ok(ledger_record.version_record.fingerprint),
            None => match self.missing_identity_policy {
                MissingIdentityPolicy::Fail => Err(Error::DocumentNotFound(*document_id)),
                MissingIdentityPolicy::ZeroSentinel => {
                    tracing::debug!(
                        "document {} is absent; reporting zero sentinel as its head",
                        document_id
                    );
                    Ok(Fingerprint::ZERO)
                }
            },
        }
    }
    pub async fn get_latest_record(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
    ) -> Result<Option<LedgerRecord>> {
        self.ledger_storage_a
            .get_latest_ledger_record(transaction_o, document_id)
            .await
    }
    /// Return the record at the given position of a document's chain (0 is the genesis record).
    pub async fn get_history_at(
        &self,
        mut transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
        version_index: u64,
    ) -> Result<LedgerRecord> {
        if let Some(ledger_record) = self
            .ledger_storage_a
            .get_ledger_record(
                transaction_o
                    .as_mut()
                    .map(|transaction| &mut **transaction as &mut dyn TransactionDynT),
                document_id,
                version_index,
            )
            .await?
        {
            return Ok(ledger_record);
        }
        // Distinguish an absent document from an index past the head.
        if self
            .ledger_storage_a
            .get_ledger_record(transaction_o, document_id, 0)
            .await?
            .is_none()
        {
            Err(Error::DocumentNotFound(*document_id))
        } else {
            Err(Error::VersionNotFound {
                document_id: *document_id,
                version_index,
            })
        }
    }
    /// Return a document's whole chain in index order, after checking its linking rules.
    pub async fn get_history(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
    ) -> Result<Vec<LedgerRecord>> {
        let mut ledger_record_v = self
            .ledger_storage_a
            .get_ledger_records(transaction_o, &LedgerRecordFilter::for_document(*document_id))
            .await?;
        if ledger_record_v.is_empty() {
            return Err(Error::DocumentNotFound(*document_id));
        }
        ledger_record_v.sort_by_key(|ledger_record| ledger_record.version_index);
        let mut prev_record_o: Option<&LedgerRecord> = None;
        for ledger_record in ledger_record_v.iter() {
            ledger_record
                .validate_consistency(prev_record_o)
                .map_err(|err| Error::RecordCorruption(err.to_string().into(), *document_id))?;
            prev_record_o = Some(ledger_record);
        }
        Ok(ledger_record_v)
    }
    /// Return every record, across all documents, whose version has the given fingerprint.
    pub async fn find_records_with_fingerprint(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        fingerprint: &Fingerprint,
    ) -> Result<Vec<LedgerRecord>> {
        self.ledger_storage_a
            .get_ledger_records(transaction_o, &LedgerRecordFilter::for_fingerprint(*fingerprint))
            .await
    }

    async fn create_document_in(
        &self,
        transaction: &mut dyn TransactionDynT,
        document_id: &DocumentId,
        fingerprint: &Fingerprint,
        recorded_by: &Principal,
    ) -> Result<LedgerEvent> {
        document_id
            .as_fingerprint()
            .require_nonzero("document identity")?;
        fingerprint.require_nonzero("fingerprint")?;

        if self
            .ledger_storage_a
            .get_ledger_record(Some(&mut *transaction), document_id, 0)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyExists(*document_id));
        }

        let ledger_record = LedgerRecord {
            document_id: *document_id,
            version_index: 0,
            version_record: VersionRecord {
                fingerprint: *fingerprint,
                previous_fingerprint: Fingerprint::ZERO,
                timestamp: time::OffsetDateTime::now_utc(),
                recorded_by: recorded_by.clone(),
            },
        };
        match self
            .ledger_storage_a
            .add_ledger_record(Some(transaction), &ledger_record)
            .await
        {
            Ok(()) => {}
            // A concurrent create won the race for the genesis slot.
            Err(Error::VersionIndexTaken { .. }) => {
                return Err(Error::AlreadyExists(*document_id));
            }
            Err(err) => return Err(err),
        }

        let ledger_event = LedgerEvent::DocumentCreated {
            document_id: *document_id,
            fingerprint: *fingerprint,
            creator: recorded_by.clone(),
        };
        tracing::info!(
            document_id = %document_id,
            fingerprint = %fingerprint,
            creator = %recorded_by,
            "DocumentCreated"
        );
        Ok(ledger_event)
    }
    async fn update_document_impl(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
        expected_head_o: Option<&Fingerprint>,
        new_fingerprint: &Fingerprint,
        recorded_by: &Principal,
    ) -> Result<LedgerEvent> {
        match transaction_o {
            Some(transaction) => {
                self.update_document_in(
                    transaction,
                    document_id,
                    expected_head_o,
                    new_fingerprint,
                    recorded_by,
                )
                .await
            }
            None => {
                use storage_traits::StorageDynT;
                let mut transaction_b = self.begin_transaction().await?;
                let ledger_event = self
                    .update_document_in(
                        transaction_b.as_mut(),
                        document_id,
                        expected_head_o,
                        new_fingerprint,
                        recorded_by,
                    )
                    .await?;
                transaction_b.commit().await?;
                Ok(ledger_event)
            }
        }
    }
    async fn update_document_in(
        &self,
        transaction: &mut dyn TransactionDynT,
        document_id: &DocumentId,
        expected_head_o: Option<&Fingerprint>,
        new_fingerprint: &Fingerprint,
        recorded_by: &Principal,
    ) -> Result<LedgerEvent> {
        new_fingerprint.require_nonzero("fingerprint")?;

        let head_record = self
            .ledger_storage_a
            .get_latest_ledger_record(Some(&mut *transaction), document_id)
            .await?
            .ok_or(Error::DocumentNotFound(*document_id))?;
        let head = head_record.version_record.fingerprint;

        if let Some(expected_head) = expected_head_o {
            if *expected_head != head {
                return Err(Error::HeadChanged {
                    document_id: *document_id,
                    expected: *expected_head,
                    actual: head,
                });
            }
        }
        if *new_fingerprint == head {
            return Err(Error::NoOpUpdate {
                document_id: *document_id,
                fingerprint: head,
            });
        }

        // Timestamps never go backward within a chain, even if the wall clock does.
        let timestamp = time::OffsetDateTime::now_utc().max(head_record.version_record.timestamp);
        let ledger_record = LedgerRecord {
            document_id: *document_id,
            version_index: head_record.version_index + 1,
            version_record: VersionRecord {
                fingerprint: *new_fingerprint,
                previous_fingerprint: head,
                timestamp,
                recorded_by: recorded_by.clone(),
            },
        };
        ledger_record
            .validate_consistency(Some(&head_record))
            .map_err(|err| Error::RecordCorruption(err.to_string().into(), *document_id))?;

        match self
            .ledger_storage_a
            .add_ledger_record(Some(&mut *transaction), &ledger_record)
            .await
        {
            Ok(()) => {}
            Err(Error::VersionIndexTaken { .. }) => {
                // Another writer appended after our read.  Report what the head is now.
                let actual = self
                    .ledger_storage_a
                    .get_latest_ledger_record(Some(transaction), document_id)
                    .await?
                    .map(|ledger_record| ledger_record.version_record.fingerprint)
                    .unwrap_or(head);
                tracing::debug!(
                    "update of document {} lost a race; head moved from {} to {}",
                    document_id,
                    head,
                    actual
                );
                return Err(Error::HeadChanged {
                    document_id: *document_id,
                    expected: head,
                    actual,
                });
            }
            Err(err) => return Err(err),
        }

        let ledger_event = LedgerEvent::DocumentUpdated {
            document_id: *document_id,
            new_fingerprint: *new_fingerprint,
            previous_fingerprint: head,
        };
        tracing::info!(
            document_id = %document_id,
            new_fingerprint = %new_fingerprint,
            previous_fingerprint = %head,
            version_index = ledger_record.version_index,
            "DocumentUpdated"
        );
        Ok(ledger_event)
    }
}

#[async_trait::async_trait]
impl storage_traits::StorageDynT for LedgerStore {
    async fn begin_transaction(
        &self,
    ) -> storage_traits::Result<Box<dyn storage_traits::TransactionDynT>> {
        self.ledger_storage_a.begin_transaction().await
    }
}
