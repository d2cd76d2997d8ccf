mod error;
mod storage_dyn_t;
mod transaction_dyn_t;

pub use crate::{
    error::Error, storage_dyn_t::StorageDynT, transaction_dyn_t::TransactionDynT,
};
pub type Result<T> = std::result::Result<T, Error>;
