use std::borrow::Cow;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputErrorKind {
    /// Empty, unparseable, or otherwise invalid input.
    Malformed,
    /// The upload is not a PDF.
    NotPdf,
    /// The upload, or the text extracted from it, is too large to process.
    TooLarge,
}

/// The outcomes a caller of the Orchestrator has to distinguish.  None of them are retried or
/// recovered on the caller's behalf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{message}")]
    InputError {
        kind: InputErrorKind,
        message: Cow<'static, str>,
    },
    #[error("Analyzer unavailable: {message}")]
    AnalyzerUnavailable {
        message: Cow<'static, str>,
        exit_code_o: Option<i32>,
        timed_out: bool,
    },
    #[error(transparent)]
    LedgerConflict(contract_ledger_store::Error),
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(Cow<'static, str>),
}

impl Error {
    pub fn malformed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InputError {
            kind: InputErrorKind::Malformed,
            message: message.into(),
        }
    }
    /// Short machine-readable name of the error category.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::InputError { .. } => "InputError",
            Self::AnalyzerUnavailable { .. } => "AnalyzerUnavailable",
            Self::LedgerConflict(_) => "LedgerConflict",
            Self::LedgerUnavailable(_) => "LedgerUnavailable",
        }
    }
    pub fn analyzer_exit_code_o(&self) -> Option<i32> {
        match self {
            Self::AnalyzerUnavailable { exit_code_o, .. } => *exit_code_o,
            _ => None,
        }
    }
}

impl From<contract_ledger_store::Error> for Error {
    fn from(e: contract_ledger_store::Error) -> Self {
        use contract_ledger_store::Error as LedgerError;
        match e {
            LedgerError::InvalidInput(message) => Self::malformed(message),
            LedgerError::StorageError(_) | LedgerError::RecordCorruption(_, _) => {
                tracing::error!("ledger failure: {}", e);
                Self::LedgerUnavailable(e.to_string().into())
            }
            e => Self::LedgerConflict(e),
        }
    }
}

impl From<contract_ledger_analyzer::Error> for Error {
    fn from(e: contract_ledger_analyzer::Error) -> Self {
        use contract_ledger_analyzer::Error as AnalyzerError;
        match e {
            AnalyzerError::InputTooLarge { .. } => Self::InputError {
                kind: InputErrorKind::TooLarge,
                message: e.to_string().into(),
            },
            AnalyzerError::TimedOut { .. } => Self::AnalyzerUnavailable {
                message: e.to_string().into(),
                exit_code_o: None,
                timed_out: true,
            },
            AnalyzerError::Unavailable {
                message,
                exit_code_o,
            } => Self::AnalyzerUnavailable {
                message,
                exit_code_o,
                timed_out: false,
            },
        }
    }
}
