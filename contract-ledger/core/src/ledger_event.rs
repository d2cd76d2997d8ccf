use crate::{DocumentId, Fingerprint, Principal};

/// Emitted once per successful ledger mutation.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    #[serde(rename_all = "camelCase")]
    DocumentCreated {
        document_id: DocumentId,
        fingerprint: Fingerprint,
        creator: Principal,
    },
    #[serde(rename_all = "camelCase")]
    DocumentUpdated {
        document_id: DocumentId,
        new_fingerprint: Fingerprint,
        previous_fingerprint: Fingerprint,
    },
}

impl LedgerEvent {
    pub fn document_id(&self) -> &DocumentId {
        match self {
            Self::DocumentCreated { document_id, .. } => document_id,
            Self::DocumentUpdated { document_id, .. } => document_id,
        }
    }
    /// The head fingerprint of the document after the mutation.
    pub fn head(&self) -> &Fingerprint {
        match self {
            Self::DocumentCreated { fingerprint, .. } => fingerprint,
            Self::DocumentUpdated {
                new_fingerprint, ..
            } => new_fingerprint,
        }
    }
}
