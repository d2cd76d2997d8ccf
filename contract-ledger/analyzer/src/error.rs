use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Analyzer input of {len} bytes exceeds the {limit}-byte limit of argument input mode; switch the analyzer to stdin input mode or submit a smaller document")]
    InputTooLarge { len: usize, limit: usize },
    #[error("{program} did not finish within {timeout:?} and was killed")]
    TimedOut {
        program: Cow<'static, str>,
        timeout: std::time::Duration,
    },
    #[error("{message}")]
    Unavailable {
        message: Cow<'static, str>,
        exit_code_o: Option<i32>,
    },
}

impl Error {
    /// The external process's exit code, if it ran to completion.
    pub fn exit_code_o(&self) -> Option<i32> {
        match self {
            Self::Unavailable { exit_code_o, .. } => *exit_code_o,
            Self::InputTooLarge { .. } | Self::TimedOut { .. } => None,
        }
    }
}
