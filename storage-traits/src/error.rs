use std::borrow::Cow;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The backend could not be reached or is temporarily locked; the operation may be retried.
    #[error("Storage backend unavailable: {0}")]
    Unavailable(Cow<'static, str>),
    #[error("Storage error: {0}")]
    Backend(Cow<'static, str>),
    #[error("Transaction type mismatch: {0}")]
    TransactionTypeMismatch(&'static str),
}

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[cfg(feature = "sqlx-sqlite")]
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(Cow::Owned(e.to_string()))
            }
            // SQLITE_BUSY (5) and SQLITE_LOCKED (6), including their extended codes, clear up
            // once the competing writer finishes.
            sqlx::Error::Database(db_err)
                if db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| matches!(code & 0xff, 5 | 6))
                    .unwrap_or(false) =>
            {
                Self::Unavailable(Cow::Owned(e.to_string()))
            }
            _ => Self::Backend(Cow::Owned(e.to_string())),
        }
    }
}
