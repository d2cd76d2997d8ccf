use crate::Result;
use anyhow::Context;
use contract_ledger_core::Fingerprint;
use std::path::{Path, PathBuf};

/// Exactly one of a file to hash or an explicit fingerprint.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct FingerprintSourceArgs {
    /// Path of the PDF whose fingerprint is used.
    #[arg(name = "file", value_name = "FILE")]
    pub file_o: Option<PathBuf>,
    /// Use this fingerprint (0x followed by 64 hex digits) instead of hashing a file.
    #[arg(name = "fingerprint", long, value_name = "FINGERPRINT")]
    pub fingerprint_o: Option<Fingerprint>,
}

impl FingerprintSourceArgs {
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        match (self.fingerprint_o, self.file_o.as_deref()) {
            (Some(fingerprint), _) => Ok(fingerprint),
            (None, Some(path)) => fingerprint_file_at(path),
            (None, None) => anyhow::bail!("either a FILE or --fingerprint must be given"),
        }
    }
}

pub(crate) fn fingerprint_file_at(path: &Path) -> Result<Fingerprint> {
    let file = std::fs::File::open(path).with_context(|| format!("can't open {:?}", path))?;
    let fingerprint = contract_ledger_core::fingerprint_reader(std::io::BufReader::new(file))
        .with_context(|| format!("can't read {:?}", path))?;
    tracing::debug!("fingerprint of {:?} is {}", path, fingerprint);
    Ok(fingerprint)
}
