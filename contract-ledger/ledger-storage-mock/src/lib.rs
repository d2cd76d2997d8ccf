mod ledger_storage_mock;

pub use crate::ledger_storage_mock::{LedgerStorageMock, LedgerStorageMockTransaction};
