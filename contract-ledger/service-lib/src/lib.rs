mod http_error;
mod logging;
mod service_app_state;
mod service_config;
pub(crate) mod services;
mod spawn_service;

pub(crate) use crate::service_app_state::ServiceAppState;
pub use crate::{
    http_error::{ErrorBody, HTTPError},
    logging::{init_logging, LogFormat},
    service_config::ServiceConfig,
    spawn_service::{create_ledger_store, spawn_service, spawn_service_with_orchestrator},
};

/// Name of the request header that carries the principal for ledger mutations.
pub const PRINCIPAL_HEADER: &str = "x-principal";
