use crate::{Error, Result};

/// The authenticated actor that commits a version record, e.g. a wallet address.
#[derive(
    Clone,
    Debug,
    derive_more::Deref,
    derive_more::Display,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    pub const MAX_LEN: usize = 256;

    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::Invalid("principal must not be empty".into()));
        }
        if s.chars().count() > Self::MAX_LEN {
            return Err(Error::Invalid(
                format!("principal exceeds {} characters", Self::MAX_LEN).into(),
            ));
        }
        if s.chars().any(|c| c.is_control()) {
            return Err(Error::Invalid(
                "principal must not contain control characters".into(),
            ));
        }
        Ok(Self(s))
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Principal {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

impl std::str::FromStr for Principal {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
