use contract_ledger_core::{DocumentId, Fingerprint, LedgerRecord, Principal, VersionRecord};
use contract_ledger_store::{Error, Result};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;

/// Row form of a LedgerRecord.  Fingerprints are stored in their canonical text form, so
/// ordering by document_id matches the ordering of DocumentId values.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VersionRecordRow {
    pub(crate) document_id: String,
    pub(crate) version_index: i64,
    pub(crate) fingerprint: String,
    pub(crate) previous_fingerprint: String,
    pub(crate) recorded_at: String,
    pub(crate) recorded_by: String,
}

impl VersionRecordRow {
    pub(crate) fn try_from_ledger_record(ledger_record: &LedgerRecord) -> Result<Self> {
        let version_index = i64::try_from(ledger_record.version_index).map_err(|_| {
            Error::InvalidInput(
                format!(
                    "version index {} is out of range for storage",
                    ledger_record.version_index
                )
                .into(),
            )
        })?;
        let recorded_at = ledger_record
            .version_record
            .timestamp
            .format(&Rfc3339)
            .map_err(|err| {
                Error::InvalidInput(format!("timestamp can't be formatted: {}", err).into())
            })?;
        Ok(Self {
            document_id: ledger_record.document_id.to_string(),
            version_index,
            fingerprint: ledger_record.version_record.fingerprint.to_string(),
            previous_fingerprint: ledger_record.version_record.previous_fingerprint.to_string(),
            recorded_at,
            recorded_by: ledger_record.version_record.recorded_by.to_string(),
        })
    }
}

impl TryFrom<VersionRecordRow> for LedgerRecord {
    type Error = Error;
    fn try_from(row: VersionRecordRow) -> Result<Self> {
        let document_id = DocumentId::from_str(&row.document_id).map_err(|err| {
            Error::StorageError(storage_traits::Error::Backend(
                format!(
                    "version_records.document_id contained invalid value {:?}; error was: {}",
                    row.document_id, err
                )
                .into(),
            ))
        })?;
        let corruption = |column: &str, value: &str, err: &dyn std::fmt::Display| {
            Error::RecordCorruption(
                format!(
                    "version_records.{} contained invalid value {:?}; error was: {}",
                    column, value, err
                )
                .into(),
                document_id,
            )
        };
        let version_index = u64::try_from(row.version_index).map_err(|err| {
            corruption("version_index", &row.version_index.to_string(), &err)
        })?;
        let fingerprint = Fingerprint::from_str(&row.fingerprint)
            .map_err(|err| corruption("fingerprint", &row.fingerprint, &err))?;
        let previous_fingerprint = Fingerprint::from_str(&row.previous_fingerprint)
            .map_err(|err| corruption("previous_fingerprint", &row.previous_fingerprint, &err))?;
        let timestamp = time::OffsetDateTime::parse(&row.recorded_at, &Rfc3339)
            .map_err(|err| corruption("recorded_at", &row.recorded_at, &err))?;
        let recorded_by = Principal::new(row.recorded_by.as_str())
            .map_err(|err| corruption("recorded_by", &row.recorded_by, &err))?;
        Ok(LedgerRecord {
            document_id,
            version_index,
            version_record: VersionRecord {
                fingerprint,
                previous_fingerprint,
                timestamp,
                recorded_by,
            },
        })
    }
}
