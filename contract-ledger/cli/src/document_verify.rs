use crate::{print_json, FingerprintSourceArgs, LedgerDBArgs, NewlineArgs, Result};
use contract_ledger_core::DocumentId;
use contract_ledger_store::Verifier;

/// Check whether a file (or fingerprint) is the latest version of a document.  An outdated
/// version is a successful verification with `isLatest` false, not an error.
#[derive(Debug, clap::Parser)]
pub struct DocumentVerify {
    /// Specify the document to verify against.
    #[arg(name = "document-id", short, long, value_name = "ID")]
    pub document_id: DocumentId,
    #[command(flatten)]
    pub fingerprint_source_args: FingerprintSourceArgs,
    #[command(flatten)]
    pub ledger_db_args: LedgerDBArgs,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

impl DocumentVerify {
    pub async fn handle(self) -> Result<()> {
        let claimed_fingerprint = self.fingerprint_source_args.fingerprint()?;
        let verifier = Verifier::new(self.ledger_db_args.get_ledger_store().await?);
        let verification = verifier
            .verify(None, &self.document_id, &claimed_fingerprint)
            .await?;
        print_json(&verification, &self.newline_args)
    }
}
