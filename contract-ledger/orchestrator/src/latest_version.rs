use contract_ledger_core::{DocumentId, Fingerprint};

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVersion {
    pub document_id: DocumentId,
    pub latest_fingerprint: Fingerprint,
}
