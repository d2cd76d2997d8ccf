mod analysis;
mod document_id;
mod error;
mod fingerprint;
mod hasher;
mod ledger_event;
mod ledger_record;
mod missing_identity_policy;
mod principal;
mod verification;
mod version_record;

pub use crate::{
    analysis::{AnalysisReport, Risk, Severity, UploadAnalysis},
    document_id::DocumentId,
    error::Error,
    fingerprint::Fingerprint,
    hasher::{fingerprint_bytes, fingerprint_reader},
    ledger_event::LedgerEvent,
    ledger_record::LedgerRecord,
    missing_identity_policy::MissingIdentityPolicy,
    principal::Principal,
    verification::Verification,
    version_record::VersionRecord,
};
pub type Result<T> = std::result::Result<T, Error>;
