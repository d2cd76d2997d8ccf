use crate::{fingerprint_source_args::fingerprint_file_at, print_json, NewlineArgs, Result};
use contract_ledger_core::Fingerprint;
use std::path::PathBuf;

/// Print the fingerprint (SHA-256 of the exact bytes) of a file.
#[derive(Debug, clap::Parser)]
pub struct FingerprintFile {
    /// Path of the file to fingerprint.
    pub file: PathBuf,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

#[derive(serde::Serialize)]
struct FingerprintOutput {
    fingerprint: Fingerprint,
}

impl FingerprintFile {
    pub fn handle(self) -> Result<()> {
        let fingerprint = fingerprint_file_at(&self.file)?;
        print_json(&FingerprintOutput { fingerprint }, &self.newline_args)
    }
}
