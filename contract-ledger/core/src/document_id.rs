use crate::{Error, Fingerprint, Result};

/// Stable key under which a document's version chain is indexed.  By convention it is the
/// fingerprint of the document's first version, but the ledger treats it as opaque.
#[derive(
    Clone,
    Copy,
    Debug,
    derive_more::Deref,
    derive_more::Display,
    Eq,
    derive_more::From,
    Hash,
    derive_more::Into,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct DocumentId(Fingerprint);

impl DocumentId {
    /// The identity a new document receives when it is created from its first version.
    pub fn from_genesis_fingerprint(genesis_fingerprint: Fingerprint) -> Self {
        Self(genesis_fingerprint)
    }
    pub fn as_fingerprint(&self) -> &Fingerprint {
        &self.0
    }
}

impl std::str::FromStr for DocumentId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let fingerprint = Fingerprint::from_str(s)?.require_nonzero("document identity")?;
        Ok(Self(fingerprint))
    }
}
