mod error;
mod latest_version;
mod orchestrator;

pub use crate::{
    error::{Error, InputErrorKind},
    latest_version::LatestVersion,
    orchestrator::Orchestrator,
};
pub type Result<T> = std::result::Result<T, Error>;
