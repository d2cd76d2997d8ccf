use crate::{print_json, FingerprintSourceArgs, LedgerDBArgs, NewlineArgs, PrincipalArgs, Result};
use contract_ledger_core::DocumentId;

/// Create a document in the ledger from its first version.  The document's identity is that
/// version's fingerprint.  Prints the DocumentCreated event.
#[derive(Debug, clap::Parser)]
pub struct DocumentCreate {
    #[command(flatten)]
    pub fingerprint_source_args: FingerprintSourceArgs,
    #[command(flatten)]
    pub principal_args: PrincipalArgs,
    #[command(flatten)]
    pub ledger_db_args: LedgerDBArgs,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

impl DocumentCreate {
    pub async fn handle(self) -> Result<()> {
        let fingerprint = self.fingerprint_source_args.fingerprint()?;
        let document_id = DocumentId::from_genesis_fingerprint(fingerprint);
        let ledger_store = self.ledger_db_args.get_ledger_store().await?;

        let ledger_event = ledger_store
            .create_document(None, &document_id, &fingerprint, &self.principal_args.principal)
            .await?;
        print_json(&ledger_event, &self.newline_args)
    }
}
