use crate::{HTTPError, ServiceAppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use contract_ledger_core::LedgerRecord;

pub fn get_routes(service_app_state: ServiceAppState) -> Router {
    Router::new()
        .route("/fingerprints/:fingerprint/records", get(find_records))
        .with_state(service_app_state)
}

/// Which documents contain a given file, and at which versions.  An unknown fingerprint yields
/// an empty array rather than 404.
#[tracing::instrument(err(Debug), skip(service_app_state))]
async fn find_records(
    State(service_app_state): State<ServiceAppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<Vec<LedgerRecord>>, HTTPError> {
    Ok(Json(
        service_app_state
            .orchestrator
            .find_by_fingerprint(&fingerprint)
            .await?,
    ))
}
