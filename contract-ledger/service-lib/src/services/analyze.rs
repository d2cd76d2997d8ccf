use crate::{HTTPError, ServiceAppState};
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    routing::post,
    Json, Router,
};
use contract_ledger_core::UploadAnalysis;

/// Name of the multipart form field that carries the PDF.
pub const PDF_FIELD_NAME: &str = "pdf";
/// Room for multipart boundaries and part headers on top of the PDF itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn get_routes(service_app_state: ServiceAppState) -> Router {
    let body_limit = service_app_state
        .orchestrator
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service_app_state)
}

/// Analysis only.  Committing the returned fingerprint to the ledger is a separate request.
#[tracing::instrument(err(Debug), skip(service_app_state, multipart_r))]
async fn analyze(
    State(service_app_state): State<ServiceAppState>,
    multipart_r: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadAnalysis>, HTTPError> {
    let mut multipart = multipart_r
        .map_err(|rejection| HTTPError::input_error(rejection.status(), rejection.body_text()))?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PDF_FIELD_NAME) {
            tracing::debug!("ignoring multipart field {:?}", field.name());
            continue;
        }
        let content_type_o = field.content_type().map(str::to_string);
        let pdf_bytes = field.bytes().await?;
        let upload_analysis = service_app_state
            .orchestrator
            .analyze_upload(&pdf_bytes, content_type_o.as_deref())
            .await?;
        return Ok(Json(upload_analysis));
    }
    Err(HTTPError::bad_request(format!(
        "multipart form has no {:?} file field",
        PDF_FIELD_NAME
    )))
}
