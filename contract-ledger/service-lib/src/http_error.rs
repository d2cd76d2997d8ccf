use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contract_ledger_orchestrator::{Error, InputErrorKind};

/// The JSON body of every error response.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ErrorBody {
    /// One of InputError, AnalyzerUnavailable, LedgerConflict, LedgerUnavailable.
    pub error: String,
    pub message: String,
    #[serde(
        rename = "analyzerExitCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub analyzer_exit_code_o: Option<i32>,
}

#[derive(Debug)]
pub struct HTTPError {
    pub status_code: StatusCode,
    pub error_body: ErrorBody,
}

impl HTTPError {
    pub fn input_error(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            error_body: ErrorBody {
                error: "InputError".to_string(),
                message: message.into(),
                analyzer_exit_code_o: None,
            },
        }
    }
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::input_error(StatusCode::BAD_REQUEST, message)
    }
}

impl From<Error> for HTTPError {
    fn from(err: Error) -> Self {
        use contract_ledger_store::Error as LedgerError;
        let status_code = match &err {
            Error::InputError { kind, .. } => match kind {
                InputErrorKind::Malformed => StatusCode::BAD_REQUEST,
                InputErrorKind::NotPdf => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                InputErrorKind::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            },
            Error::AnalyzerUnavailable { timed_out, .. } => {
                if *timed_out {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            Error::LedgerConflict(LedgerError::DocumentNotFound(_))
            | Error::LedgerConflict(LedgerError::VersionNotFound { .. }) => StatusCode::NOT_FOUND,
            Error::LedgerConflict(_) => StatusCode::CONFLICT,
            Error::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status_code,
            error_body: ErrorBody {
                error: err.kind_str().to_string(),
                message: err.to_string(),
                analyzer_exit_code_o: err.analyzer_exit_code_o(),
            },
        }
    }
}

impl From<JsonRejection> for HTTPError {
    fn from(rejection: JsonRejection) -> Self {
        Self::input_error(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for HTTPError {
    fn from(err: MultipartError) -> Self {
        // The body limit surfaces here as 413.
        Self::input_error(err.status(), err.body_text())
    }
}

impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status_code, axum::Json(self.error_body)).into_response()
    }
}
