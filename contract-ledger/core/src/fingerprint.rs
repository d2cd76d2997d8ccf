use crate::{Error, Result};

/// 256-bit content fingerprint (SHA-256 of a document's exact bytes).  The textual form is
/// `0x` followed by 64 lowercase hex digits.  Parsing accepts an optional `0x`/`0X` prefix
/// and either hex case, so two spellings of the same value always compare equal.
#[derive(
    Clone,
    Copy,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde_with::DeserializeFromStr,
    serde_with::SerializeDisplay,
)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The all-zero value.  Used as the `previousFingerprint` of a genesis record, and never a
    /// valid content fingerprint or document identity.
    pub const ZERO: Fingerprint = Fingerprint([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
    /// Returns self, or an Error::Invalid naming `what` if self is the zero sentinel.
    pub fn require_nonzero(self, what: &'static str) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::Invalid(
                format!("{} must not be the all-zero sentinel value", what).into(),
            ));
        }
        Ok(self)
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0x")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex_str = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex_str.len() != 64 {
            return Err(Error::Malformed(
                format!(
                    "expected 64 hex digits (optionally prefixed by 0x) but got {} characters: {:?}",
                    hex_str.len(),
                    s
                )
                .into(),
            ));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|err| {
            Error::Malformed(format!("invalid hex value {:?}: {}", s, err).into())
        })?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for Fingerprint {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
