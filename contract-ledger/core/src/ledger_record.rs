use crate::{DocumentId, Error, Result, VersionRecord};

/// A VersionRecord as stored in the ledger: tagged with its document identity and its
/// zero-based position in that document's chain.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub document_id: DocumentId,
    pub version_index: u64,
    #[serde(flatten)]
    pub version_record: VersionRecord,
}

impl LedgerRecord {
    /// Check the linking rules between this record and its predecessor (which must be None
    /// exactly when this is the genesis record at index 0).
    pub fn validate_consistency(&self, prev_record_o: Option<&LedgerRecord>) -> Result<()> {
        let version_record = &self.version_record;
        if version_record.fingerprint.is_zero() {
            return Err(Error::BrokenChain(
                format!(
                    "record {} of document {} has the zero fingerprint",
                    self.version_index, self.document_id
                )
                .into(),
            ));
        }
        match prev_record_o {
            None => {
                if self.version_index != 0 {
                    return Err(Error::BrokenChain(
                        format!(
                            "record {} of document {} has no predecessor",
                            self.version_index, self.document_id
                        )
                        .into(),
                    ));
                }
                if !version_record.is_genesis() {
                    return Err(Error::BrokenChain(
                        format!(
                            "genesis record of document {} has nonzero previousFingerprint {}",
                            self.document_id, version_record.previous_fingerprint
                        )
                        .into(),
                    ));
                }
            }
            Some(prev_record) => {
                if prev_record.document_id != self.document_id {
                    return Err(Error::BrokenChain(
                        format!(
                            "predecessor belongs to document {} rather than {}",
                            prev_record.document_id, self.document_id
                        )
                        .into(),
                    ));
                }
                if prev_record.version_index + 1 != self.version_index {
                    return Err(Error::BrokenChain(
                        format!(
                            "record {} of document {} follows record {}",
                            self.version_index, self.document_id, prev_record.version_index
                        )
                        .into(),
                    ));
                }
                if version_record.previous_fingerprint != prev_record.version_record.fingerprint {
                    return Err(Error::BrokenChain(
                        format!(
                            "record {} of document {} links to {} but its predecessor is {}",
                            self.version_index,
                            self.document_id,
                            version_record.previous_fingerprint,
                            prev_record.version_record.fingerprint
                        )
                        .into(),
                    ));
                }
                if version_record.fingerprint == prev_record.version_record.fingerprint {
                    return Err(Error::BrokenChain(
                        format!(
                            "record {} of document {} repeats its predecessor's fingerprint",
                            self.version_index, self.document_id
                        )
                        .into(),
                    ));
                }
                if version_record.timestamp < prev_record.version_record.timestamp {
                    return Err(Error::BrokenChain(
                        format!(
                            "record {} of document {} is timestamped before its predecessor",
                            self.version_index, self.document_id
                        )
                        .into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
