use crate::{Error, LedgerStore, Result};
use contract_ledger_core::{DocumentId, Fingerprint, Verification};
use storage_traits::TransactionDynT;

/// Answers whether a claimed fingerprint is the current version of a document.
#[derive(Clone)]
pub struct Verifier {
    ledger_store: LedgerStore,
}

impl Verifier {
    pub fn new(ledger_store: LedgerStore) -> Self {
        Self { ledger_store }
    }
    pub fn ledger_store(&self) -> &LedgerStore {
        &self.ledger_store
    }
    /// Compare the claimed fingerprint against the ledger's head for the document.  The
    /// comparison is on fingerprint values, so any textual spelling the caller parsed from
    /// (prefix or hex case) yields the same answer.  The zero sentinel never verifies, even
    /// when the missing-identity policy reports it as the head of an absent document.
    pub async fn verify(
        &self,
        transaction_o: Option<&mut dyn TransactionDynT>,
        document_id: &DocumentId,
        claimed_fingerprint: &Fingerprint,
    ) -> Result<Verification> {
        if claimed_fingerprint.is_zero() {
            return Err(Error::InvalidInput(
                "claimed fingerprint must not be the all-zero sentinel value".into(),
            ));
        }
        let latest_fingerprint = self
            .ledger_store
            .get_latest_hash(transaction_o, document_id)
            .await?;
        let is_latest = !latest_fingerprint.is_zero() && latest_fingerprint == *claimed_fingerprint;
        tracing::debug!(
            document_id = %document_id,
            claimed_fingerprint = %claimed_fingerprint,
            latest_fingerprint = %latest_fingerprint,
            is_latest,
            "verified"
        );
        Ok(Verification {
            is_latest,
            latest_fingerprint,
        })
    }
}
