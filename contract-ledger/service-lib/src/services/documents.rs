use crate::{HTTPError, ServiceAppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use contract_ledger_core::{LedgerEvent, LedgerRecord, Verification};
use contract_ledger_orchestrator::LatestVersion;

pub fn get_routes(service_app_state: ServiceAppState) -> Router {
    Router::new()
        .route("/documents", post(create_document))
        .route("/documents/:document_id", put(update_document))
        .route("/documents/:document_id/latest", get(latest))
        .route("/documents/:document_id/history", get(history))
        .route(
            "/documents/:document_id/history/:version_index",
            get(history_at),
        )
        .route("/documents/:document_id/verify/:fingerprint", get(verify))
        .with_state(service_app_state)
}

#[derive(Debug, serde::Deserialize)]
struct CreateDocumentRequest {
    fingerprint: String,
}

#[derive(Debug, serde::Deserialize)]
struct UpdateDocumentRequest {
    fingerprint: String,
    #[serde(rename = "expectedHead", default)]
    expected_head_o: Option<String>,
}

#[tracing::instrument(err(Debug), skip(service_app_state, header_map))]
async fn create_document(
    State(service_app_state): State<ServiceAppState>,
    header_map: HeaderMap,
    request_r: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LedgerEvent>), HTTPError> {
    let principal = service_app_state.principal_from_headers(&header_map)?;
    let Json(request) = request_r?;
    let ledger_event = service_app_state
        .orchestrator
        .create_document(&request.fingerprint, &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(ledger_event)))
}

#[tracing::instrument(err(Debug), skip(service_app_state, header_map))]
async fn update_document(
    State(service_app_state): State<ServiceAppState>,
    header_map: HeaderMap,
    Path(document_id): Path<String>,
    request_r: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> Result<Json<LedgerEvent>, HTTPError> {
    let principal = service_app_state.principal_from_headers(&header_map)?;
    let Json(request) = request_r?;
    let ledger_event = service_app_state
        .orchestrator
        .update_document(
            &document_id,
            &request.fingerprint,
            request.expected_head_o.as_deref(),
            &principal,
        )
        .await?;
    Ok(Json(ledger_event))
}

#[tracing::instrument(err(Debug), skip(service_app_state))]
async fn latest(
    State(service_app_state): State<ServiceAppState>,
    Path(document_id): Path<String>,
) -> Result<Json<LatestVersion>, HTTPError> {
    Ok(Json(service_app_state.orchestrator.latest(&document_id).await?))
}

#[tracing::instrument(err(Debug), skip(service_app_state))]
async fn history(
    State(service_app_state): State<ServiceAppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Vec<LedgerRecord>>, HTTPError> {
    Ok(Json(service_app_state.orchestrator.history(&document_id).await?))
}

#[tracing::instrument(err(Debug), skip(service_app_state))]
async fn history_at(
    State(service_app_state): State<ServiceAppState>,
    Path((document_id, version_index_str)): Path<(String, String)>,
) -> Result<Json<LedgerRecord>, HTTPError> {
    let version_index = version_index_str.parse::<u64>().map_err(|_| {
        HTTPError::bad_request(format!(
            "version index must be a non-negative integer, got {:?}",
            version_index_str
        ))
    })?;
    Ok(Json(
        service_app_state
            .orchestrator
            .history_at(&document_id, version_index)
            .await?,
    ))
}

#[tracing::instrument(err(Debug), skip(service_app_state))]
async fn verify(
    State(service_app_state): State<ServiceAppState>,
    Path((document_id, fingerprint)): Path<(String, String)>,
) -> Result<Json<Verification>, HTTPError> {
    Ok(Json(
        service_app_state
            .orchestrator
            .verify(&document_id, &fingerprint)
            .await?,
    ))
}
