mod ledger_storage_sqlite;
mod version_record_row;

pub use crate::ledger_storage_sqlite::LedgerStorageSQLite;
