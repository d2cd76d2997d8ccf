use crate::{Fingerprint, Principal};

/// One entry in a document's version chain.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub fingerprint: Fingerprint,
    /// Fingerprint of the version this one supersedes; Fingerprint::ZERO for the genesis record.
    pub previous_fingerprint: Fingerprint,
    /// Assigned by the ledger at commit time, never supplied by the client.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
    pub recorded_by: Principal,
}

impl VersionRecord {
    pub fn is_genesis(&self) -> bool {
        self.previous_fingerprint.is_zero()
    }
}
