use crate::{print_json, LedgerDBArgs, NewlineArgs, Result};
use contract_ledger_core::DocumentId;

/// Print a document's version records in order, or a single one if --index is given.
#[derive(Debug, clap::Parser)]
pub struct DocumentHistory {
    /// Specify the document to query.
    #[arg(name = "document-id", short, long, value_name = "ID")]
    pub document_id: DocumentId,
    /// If specified, print only the version record at this zero-based index.
    #[arg(name = "index", long, value_name = "N")]
    pub index_o: Option<u64>,
    #[command(flatten)]
    pub ledger_db_args: LedgerDBArgs,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

impl DocumentHistory {
    pub async fn handle(self) -> Result<()> {
        let ledger_store = self.ledger_db_args.get_ledger_store().await?;
        match self.index_o {
            Some(version_index) => {
                let ledger_record = ledger_store
                    .get_history_at(None, &self.document_id, version_index)
                    .await?;
                print_json(&ledger_record, &self.newline_args)
            }
            None => {
                let ledger_record_v = ledger_store.get_history(None, &self.document_id).await?;
                print_json(&ledger_record_v, &self.newline_args)
            }
        }
    }
}
