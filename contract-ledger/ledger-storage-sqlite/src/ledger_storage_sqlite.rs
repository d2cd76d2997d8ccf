use crate::version_record_row::VersionRecordRow;
use contract_ledger_core::{DocumentId, LedgerRecord};
use contract_ledger_store::{Error, LedgerRecordFilter, Result};
use sqlx::SqlitePool;

type SQLiteTransaction = sqlx::Transaction<'static, sqlx::Sqlite>;

#[derive(Clone)]
pub struct LedgerStorageSQLite {
    sqlite_pool: SqlitePool,
}

impl LedgerStorageSQLite {
    pub async fn open_and_run_migrations(sqlite_pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!().run(&sqlite_pool).await.map_err(|err| {
            Error::StorageError(storage_traits::Error::Unavailable(
                format!(
                    "Failed to run SQLite database migrations; error was: {}",
                    err
                )
                .into(),
            ))
        })?;
        Ok(Self { sqlite_pool })
    }
}

fn downcast_transaction(
    transaction: &mut dyn storage_traits::TransactionDynT,
) -> Result<&mut SQLiteTransaction> {
    transaction
        .as_any_mut()
        .downcast_mut::<SQLiteTransaction>()
        .ok_or(Error::StorageError(
            storage_traits::Error::TransactionTypeMismatch(
                "LedgerStorageSQLite requires a sqlx SQLite transaction",
            ),
        ))
}

const SELECT_COLUMNS: &str = "SELECT document_id, version_index, fingerprint, previous_fingerprint, recorded_at, recorded_by FROM version_records";

#[async_trait::async_trait]
impl storage_traits::StorageDynT for LedgerStorageSQLite {
    async fn begin_transaction(
        &self,
    ) -> storage_traits::Result<Box<dyn storage_traits::TransactionDynT>> {
        let mut transaction = self.sqlite_pool.begin().await?;
        // Take the write lock as the transaction's first statement.  A deferred transaction
        // that reads first can't upgrade once another writer has committed, and fails with
        // SQLITE_BUSY instead of waiting out the busy timeout.
        sqlx::query("UPDATE ledger_write_lock SET generation = generation + 1 WHERE id = 0")
            .execute(transaction.as_mut())
            .await?;
        Ok(Box::new(transaction))
    }
}

#[async_trait::async_trait]
impl contract_ledger_store::LedgerStorage for LedgerStorageSQLite {
    async fn add_ledger_record(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        ledger_record: &LedgerRecord,
    ) -> Result<()> {
        let row = VersionRecordRow::try_from_ledger_record(ledger_record)?;
        tracing::trace!(
            "LedgerStorageSQLite adding record {} of document {}",
            row.version_index,
            row.document_id
        );
        let query = sqlx::query(
            r#"
                INSERT INTO version_records(document_id, version_index, fingerprint, previous_fingerprint, recorded_at, recorded_by)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.document_id.as_str())
        .bind(row.version_index)
        .bind(row.fingerprint.as_str())
        .bind(row.previous_fingerprint.as_str())
        .bind(row.recorded_at.as_str())
        .bind(row.recorded_by.as_str());
        let execute_result = if let Some(transaction) = transaction_o {
            query
                .execute(downcast_transaction(transaction)?.as_mut())
                .await
        } else {
            query.execute(&self.sqlite_pool).await
        };
        match execute_result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::VersionIndexTaken {
                    document_id: ledger_record.document_id,
                    version_index: ledger_record.version_index,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
    async fn get_ledger_record(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        document_id: &DocumentId,
        version_index: u64,
    ) -> Result<Option<LedgerRecord>> {
        // No stored index can exceed i64::MAX.
        let version_index = match i64::try_from(version_index) {
            Ok(version_index) => version_index,
            Err(_) => return Ok(None),
        };
        let sql = format!(
            "{} WHERE document_id = $1 AND version_index = $2",
            SELECT_COLUMNS
        );
        let query = sqlx::query_as::<_, VersionRecordRow>(sql.as_str())
            .bind(document_id.to_string())
            .bind(version_index);
        let row_o = if let Some(transaction) = transaction_o {
            query
                .fetch_optional(downcast_transaction(transaction)?.as_mut())
                .await?
        } else {
            query.fetch_optional(&self.sqlite_pool).await?
        };
        row_o.map(LedgerRecord::try_from).transpose()
    }
    async fn get_latest_ledger_record(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        document_id: &DocumentId,
    ) -> Result<Option<LedgerRecord>> {
        let sql = format!(
            "{} WHERE document_id = $1 ORDER BY version_index DESC LIMIT 1",
            SELECT_COLUMNS
        );
        let query =
            sqlx::query_as::<_, VersionRecordRow>(sql.as_str()).bind(document_id.to_string());
        let row_o = if let Some(transaction) = transaction_o {
            query
                .fetch_optional(downcast_transaction(transaction)?.as_mut())
                .await?
        } else {
            query.fetch_optional(&self.sqlite_pool).await?
        };
        row_o.map(LedgerRecord::try_from).transpose()
    }
    async fn get_ledger_records(
        &self,
        transaction_o: Option<&mut dyn storage_traits::TransactionDynT>,
        ledger_record_filter: &LedgerRecordFilter,
    ) -> Result<Vec<LedgerRecord>> {
        let sql = format!(
            r#"{}
                WHERE (NOT $1 OR document_id = $2) AND
                      (NOT $3 OR fingerprint = $4) AND
                      (NOT $5 OR recorded_by = $6)
                ORDER BY document_id ASC, version_index ASC"#,
            SELECT_COLUMNS
        );
        let query = sqlx::query_as::<_, VersionRecordRow>(sql.as_str())
            .bind(ledger_record_filter.document_id_o.is_some())
            .bind(
                ledger_record_filter
                    .document_id_o
                    .map(|document_id| document_id.to_string()),
            )
            .bind(ledger_record_filter.fingerprint_o.is_some())
            .bind(
                ledger_record_filter
                    .fingerprint_o
                    .map(|fingerprint| fingerprint.to_string()),
            )
            .bind(ledger_record_filter.recorded_by_o.is_some())
            .bind(ledger_record_filter.recorded_by_o.clone());
        let row_v = if let Some(transaction) = transaction_o {
            query
                .fetch_all(downcast_transaction(transaction)?.as_mut())
                .await?
        } else {
            query.fetch_all(&self.sqlite_pool).await?
        };
        row_v
            .into_iter()
            .map(LedgerRecord::try_from)
            .collect::<Result<Vec<_>>>()
    }
}
