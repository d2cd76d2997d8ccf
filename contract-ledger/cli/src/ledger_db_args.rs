use crate::Result;
use anyhow::Context;
use contract_ledger_core::MissingIdentityPolicy;
use contract_ledger_store::LedgerStore;
use std::sync::Arc;

#[derive(clap::Args, Debug)]
pub struct LedgerDBArgs {
    /// Specify the URL of the local SQLite ledger.  The URL should have the form
    /// `sqlite://<local-path>`, optionally followed by `?mode=rwc` to create it if it doesn't
    /// exist.  A leading `~` in the path is expanded.
    #[arg(
        name = "ledger-db",
        env = "CONTRACT_LEDGER_LEDGER_DB",
        long,
        value_name = "URL",
        default_value = "sqlite://~/.contract-ledger/ledger.db?mode=rwc"
    )]
    pub ledger_db_url: String,
    /// Specify what a head query reports for a document that was never created.
    #[arg(
        name = "missing-identity-policy",
        env = "CONTRACT_LEDGER_MISSING_IDENTITY_POLICY",
        long,
        value_name = "POLICY",
        default_value = "fail",
        value_enum
    )]
    pub missing_identity_policy: MissingIdentityPolicy,
}

impl LedgerDBArgs {
    pub async fn get_ledger_store(&self) -> Result<LedgerStore> {
        tracing::debug!("get_ledger_store; ledger_db_url: {}", self.ledger_db_url);
        let Some(ledger_db_path_and_query) = self.ledger_db_url.strip_prefix("sqlite://") else {
            anyhow::bail!(
                "only sqlite:// ledger URLs are supported; got {:?}",
                self.ledger_db_url
            );
        };
        let (ledger_db_path_str, query) = match ledger_db_path_and_query.split_once('?') {
            Some((path_str, query)) => (path_str, format!("?{}", query)),
            None => (ledger_db_path_and_query, String::new()),
        };
        // Apply tilde expansion to the path.
        let ledger_db_path = expanduser::expanduser(ledger_db_path_str)?;
        if !ledger_db_path.exists() {
            if let Some(ledger_db_parent) = ledger_db_path.parent() {
                tracing::debug!(
                    "Ensuring ledger DB parent directory exists: {:?}",
                    ledger_db_parent
                );
                std::fs::create_dir_all(ledger_db_parent).with_context(|| {
                    format!("can't create ledger directory {:?}", ledger_db_parent)
                })?;
            }
        }
        let ledger_db_path_str = ledger_db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("ledger DB path {:?} is not UTF-8", ledger_db_path))?;
        let database_url = format!("sqlite://{}{}", ledger_db_path_str, query);
        tracing::debug!("Connecting to ledger DB at {}", database_url);

        let sqlite_pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .with_context(|| format!("can't open ledger DB {:?}", database_url))?;
        let ledger_storage_sqlite =
            contract_ledger_storage_sqlite::LedgerStorageSQLite::open_and_run_migrations(
                sqlite_pool,
            )
            .await?;
        Ok(LedgerStore::new(Arc::new(ledger_storage_sqlite))
            .with_missing_identity_policy(self.missing_identity_policy))
    }
}
