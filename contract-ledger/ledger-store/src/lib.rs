mod error;
mod ledger_record_filter;
mod ledger_storage;
mod ledger_store;
mod verifier;

pub use crate::{
    error::Error, ledger_record_filter::LedgerRecordFilter, ledger_storage::LedgerStorage,
    ledger_store::LedgerStore, verifier::Verifier,
};
pub type Result<T> = std::result::Result<T, Error>;
