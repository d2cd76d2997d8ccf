use contract_ledger_core::{DocumentId, Fingerprint};
use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Document {0} already exists; use update instead of create")]
    AlreadyExists(DocumentId),
    #[error("Document {0} does not exist; create it before updating or querying it")]
    DocumentNotFound(DocumentId),
    #[error("Latest version of document {document_id} changed from {expected} to {actual}; retry the update against the new latest version")]
    HeadChanged {
        document_id: DocumentId,
        expected: Fingerprint,
        actual: Fingerprint,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(Cow<'static, str>),
    #[error("Fingerprint {fingerprint} is already the latest version of document {document_id}; nothing to update")]
    NoOpUpdate {
        document_id: DocumentId,
        fingerprint: Fingerprint,
    },
    #[error("Record corruption detected: {0}; document was {1}")]
    RecordCorruption(Cow<'static, str>, DocumentId),
    #[error(transparent)]
    StorageError(#[from] storage_traits::Error),
    /// Returned by LedgerStorage impls when the (document, version index) slot is already taken.
    #[error("Version {version_index} of document {document_id} was already written")]
    VersionIndexTaken {
        document_id: DocumentId,
        version_index: u64,
    },
    #[error("Document {document_id} has no version at index {version_index}")]
    VersionNotFound {
        document_id: DocumentId,
        version_index: u64,
    },
}

impl Error {
    /// True for the outcomes of the ledger's own rules, as opposed to input or storage failures.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists(_)
                | Self::DocumentNotFound(_)
                | Self::HeadChanged { .. }
                | Self::NoOpUpdate { .. }
                | Self::VersionIndexTaken { .. }
                | Self::VersionNotFound { .. }
        )
    }
}

impl From<contract_ledger_core::Error> for Error {
    fn from(e: contract_ledger_core::Error) -> Self {
        Self::InvalidInput(e.to_string().into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Self::StorageError(storage_traits::Error::from(e))
    }
}
