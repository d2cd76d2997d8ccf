use crate::{print_json, LedgerDBArgs, NewlineArgs, Result};
use contract_ledger_core::DocumentId;
use contract_ledger_orchestrator::LatestVersion;

/// Print the latest fingerprint of a document.
#[derive(Debug, clap::Parser)]
pub struct DocumentLatest {
    /// Specify the document to query.
    #[arg(name = "document-id", short, long, value_name = "ID")]
    pub document_id: DocumentId,
    #[command(flatten)]
    pub ledger_db_args: LedgerDBArgs,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

impl DocumentLatest {
    pub async fn handle(self) -> Result<()> {
        let ledger_store = self.ledger_db_args.get_ledger_store().await?;
        let latest_fingerprint = ledger_store
            .get_latest_hash(None, &self.document_id)
            .await?;
        print_json(
            &LatestVersion {
                document_id: self.document_id,
                latest_fingerprint,
            },
            &self.newline_args,
        )
    }
}
