use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Broken version chain: {0}")]
    BrokenChain(Cow<'static, str>),
    #[error("Invalid: {0}")]
    Invalid(Cow<'static, str>),
    #[error("Malformed: {0}")]
    Malformed(Cow<'static, str>),
}
