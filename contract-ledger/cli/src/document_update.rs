use crate::{print_json, FingerprintSourceArgs, LedgerDBArgs, NewlineArgs, PrincipalArgs, Result};
use contract_ledger_core::{DocumentId, Fingerprint};

/// Append a new version to an existing document.  Prints the DocumentUpdated event.
#[derive(Debug, clap::Parser)]
pub struct DocumentUpdate {
    /// Specify the document to update.
    #[arg(name = "document-id", short, long, value_name = "ID")]
    pub document_id: DocumentId,
    /// If specified, the update is refused unless this is still the document's latest
    /// fingerprint.  Use this to avoid overwriting a version you haven't seen.
    #[arg(name = "expected-head", long, value_name = "FINGERPRINT")]
    pub expected_head_o: Option<Fingerprint>,
    #[command(flatten)]
    pub fingerprint_source_args: FingerprintSourceArgs,
    #[command(flatten)]
    pub principal_args: PrincipalArgs,
    #[command(flatten)]
    pub ledger_db_args: LedgerDBArgs,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

impl DocumentUpdate {
    pub async fn handle(self) -> Result<()> {
        let new_fingerprint = self.fingerprint_source_args.fingerprint()?;
        let ledger_store = self.ledger_db_args.get_ledger_store().await?;
        let principal = &self.principal_args.principal;

        let ledger_event = match self.expected_head_o {
            Some(expected_head) => {
                ledger_store
                    .update_document_if_head(
                        None,
                        &self.document_id,
                        &expected_head,
                        &new_fingerprint,
                        principal,
                    )
                    .await?
            }
            None => {
                ledger_store
                    .update_document(None, &self.document_id, &new_fingerprint, principal)
                    .await?
            }
        };
        print_json(&ledger_event, &self.newline_args)
    }
}
