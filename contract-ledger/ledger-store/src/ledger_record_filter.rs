use contract_ledger_core::{DocumentId, Fingerprint, LedgerRecord};

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecordFilter {
    #[serde(rename = "documentId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id_o: Option<DocumentId>,
    #[serde(rename = "fingerprint")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_o: Option<Fingerprint>,
    #[serde(rename = "recordedBy")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by_o: Option<String>,
}

impl LedgerRecordFilter {
    pub fn for_document(document_id: DocumentId) -> Self {
        Self {
            document_id_o: Some(document_id),
            ..Default::default()
        }
    }
    pub fn for_fingerprint(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint_o: Some(fingerprint),
            ..Default::default()
        }
    }
    pub fn matches(&self, ledger_record: &LedgerRecord) -> bool {
        if let Some(document_id) = self.document_id_o.as_ref() {
            if ledger_record.document_id != *document_id {
                return false;
            }
        }
        if let Some(fingerprint) = self.fingerprint_o.as_ref() {
            if ledger_record.version_record.fingerprint != *fingerprint {
                return false;
            }
        }
        if let Some(recorded_by) = self.recorded_by_o.as_deref() {
            if ledger_record.version_record.recorded_by.as_str() != recorded_by {
                return false;
            }
        }
        true
    }
}
