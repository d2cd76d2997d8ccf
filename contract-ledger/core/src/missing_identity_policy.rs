/// How head queries treat a document identity that was never created.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum MissingIdentityPolicy {
    /// Fail with a not-found error.
    #[default]
    Fail,
    /// Report Fingerprint::ZERO as the head.
    ZeroSentinel,
}
