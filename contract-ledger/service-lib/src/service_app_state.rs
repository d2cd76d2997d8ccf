use crate::{HTTPError, PRINCIPAL_HEADER};
use axum::http::HeaderMap;
use contract_ledger_core::Principal;
use contract_ledger_orchestrator::Orchestrator;

#[derive(Clone)]
pub struct ServiceAppState {
    pub orchestrator: Orchestrator,
}

impl ServiceAppState {
    /// Ledger mutations are attributed to the principal named in the request headers.
    pub fn principal_from_headers(&self, header_map: &HeaderMap) -> Result<Principal, HTTPError> {
        let header_value = header_map.get(PRINCIPAL_HEADER).ok_or_else(|| {
            tracing::warn!("ledger mutation attempted without a principal");
            HTTPError::bad_request(format!(
                "the {} header is required for ledger mutations",
                PRINCIPAL_HEADER
            ))
        })?;
        let principal_str = header_value.to_str().map_err(|_| {
            HTTPError::bad_request(format!("malformed {} header", PRINCIPAL_HEADER))
        })?;
        Principal::new(principal_str).map_err(|err| {
            HTTPError::bad_request(format!("malformed {} header: {}", PRINCIPAL_HEADER, err))
        })
    }
}
