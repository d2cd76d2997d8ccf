use crate::Fingerprint;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub is_latest: bool,
    pub latest_fingerprint: Fingerprint,
}
