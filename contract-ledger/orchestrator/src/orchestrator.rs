use crate::{Error, InputErrorKind, LatestVersion, Result};
use contract_ledger_analyzer::{Analyzer, TextExtractor};
use contract_ledger_core::{
    fingerprint_bytes, DocumentId, Fingerprint, LedgerEvent, LedgerRecord, Principal,
    UploadAnalysis, Verification,
};
use contract_ledger_store::{LedgerStore, Verifier};
use std::{str::FromStr, sync::Arc};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Sequences the upload, analysis, and ledger steps.  Analysis never writes to the ledger; the
/// caller decides whether to commit the analyzed fingerprint afterward.  Every textual input is
/// parsed before any collaborator is called.
#[derive(Clone)]
pub struct Orchestrator {
    analyzer_a: Arc<dyn Analyzer>,
    text_extractor_a: Arc<dyn TextExtractor>,
    ledger_store: LedgerStore,
    verifier: Verifier,
    max_upload_bytes: usize,
}

impl Orchestrator {
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

    pub fn new(
        analyzer_a: Arc<dyn Analyzer>,
        text_extractor_a: Arc<dyn TextExtractor>,
        ledger_store: LedgerStore,
    ) -> Self {
        let verifier = Verifier::new(ledger_store.clone());
        Self {
            analyzer_a,
            text_extractor_a,
            ledger_store,
            verifier,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
    pub fn ledger_store(&self) -> &LedgerStore {
        &self.ledger_store
    }

    /// Validate and fingerprint an uploaded PDF, then extract its text and analyze it.
    #[tracing::instrument(level = tracing::Level::DEBUG, err(Debug), skip(self, pdf_bytes), fields(pdf_len = pdf_bytes.len()))]
    pub async fn analyze_upload(
        &self,
        pdf_bytes: &[u8],
        content_type_o: Option<&str>,
    ) -> Result<UploadAnalysis> {
        self.validate_upload(pdf_bytes, content_type_o)?;
        let fingerprint = fingerprint_bytes(pdf_bytes);
        tracing::debug!("upload fingerprint is {}", fingerprint);

        let text = self.text_extractor_a.extract_text(pdf_bytes).await?;
        if text.trim().is_empty() {
            tracing::warn!(
                "no text could be extracted from upload {}; analyzing empty text",
                fingerprint
            );
        }
        let report = self.analyzer_a.analyze(&text).await?;
        tracing::info!(
            fingerprint = %fingerprint,
            document_type = %report.document_type,
            safety_score = report.safety_score,
            risk_count = report.risks.len(),
            "analyzed upload"
        );
        Ok(UploadAnalysis { fingerprint, report })
    }
    /// Create a document whose identity is the fingerprint of its first version.
    pub async fn create_document(
        &self,
        fingerprint_str: &str,
        principal: &Principal,
    ) -> Result<LedgerEvent> {
        let fingerprint = parse_fingerprint("fingerprint", fingerprint_str)?;
        let document_id = DocumentId::from_genesis_fingerprint(fingerprint);
        Ok(self
            .ledger_store
            .create_document(None, &document_id, &fingerprint, principal)
            .await?)
    }
    /// Append a version to an existing document.  If expected_head_str_o is given, the update
    /// only succeeds if the document's head is still that fingerprint.
    pub async fn update_document(
        &self,
        document_id_str: &str,
        fingerprint_str: &str,
        expected_head_str_o: Option<&str>,
        principal: &Principal,
    ) -> Result<LedgerEvent> {
        let document_id = parse_document_id(document_id_str)?;
        let new_fingerprint = parse_fingerprint("fingerprint", fingerprint_str)?;
        let expected_head_o = expected_head_str_o
            .map(|expected_head_str| parse_fingerprint("expectedHead", expected_head_str))
            .transpose()?;
        let ledger_event = match expected_head_o {
            Some(expected_head) => {
                self.ledger_store
                    .update_document_if_head(
                        None,
                        &document_id,
                        &expected_head,
                        &new_fingerprint,
                        principal,
                    )
                    .await?
            }
            None => {
                self.ledger_store
                    .update_document(None, &document_id, &new_fingerprint, principal)
                    .await?
            }
        };
        Ok(ledger_event)
    }
    pub async fn latest(&self, document_id_str: &str) -> Result<LatestVersion> {
        let document_id = parse_document_id(document_id_str)?;
        let latest_fingerprint = self.ledger_store.get_latest_hash(None, &document_id).await?;
        Ok(LatestVersion {
            document_id,
            latest_fingerprint,
        })
    }
    pub async fn history(&self, document_id_str: &str) -> Result<Vec<LedgerRecord>> {
        let document_id = parse_document_id(document_id_str)?;
        Ok(self.ledger_store.get_history(None, &document_id).await?)
    }
    pub async fn history_at(&self, document_id_str: &str, version_index: u64) -> Result<LedgerRecord> {
        let document_id = parse_document_id(document_id_str)?;
        Ok(self
            .ledger_store
            .get_history_at(None, &document_id, version_index)
            .await?)
    }
    pub async fn verify(
        &self,
        document_id_str: &str,
        claimed_fingerprint_str: &str,
    ) -> Result<Verification> {
        let document_id = parse_document_id(document_id_str)?;
        let claimed_fingerprint = parse_fingerprint("fingerprint", claimed_fingerprint_str)?;
        Ok(self
            .verifier
            .verify(None, &document_id, &claimed_fingerprint)
            .await?)
    }
    /// Every ledger record, across documents, whose content has the given fingerprint.
    pub async fn find_by_fingerprint(&self, fingerprint_str: &str) -> Result<Vec<LedgerRecord>> {
        let fingerprint = parse_fingerprint("fingerprint", fingerprint_str)?;
        Ok(self
            .ledger_store
            .find_records_with_fingerprint(None, &fingerprint)
            .await?)
    }

    fn validate_upload(&self, pdf_bytes: &[u8], content_type_o: Option<&str>) -> Result<()> {
        if pdf_bytes.is_empty() {
            return Err(Error::malformed("uploaded file is empty"));
        }
        if pdf_bytes.len() > self.max_upload_bytes {
            return Err(Error::InputError {
                kind: InputErrorKind::TooLarge,
                message: format!(
                    "uploaded file is {} bytes, which exceeds the {}-byte limit",
                    pdf_bytes.len(),
                    self.max_upload_bytes
                )
                .into(),
            });
        }
        if let Some(content_type) = content_type_o {
            let media_type = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if media_type != "application/pdf" && media_type != "application/octet-stream" {
                return Err(Error::InputError {
                    kind: InputErrorKind::NotPdf,
                    message: format!(
                        "uploaded file has content type {:?}; only PDF documents are accepted",
                        content_type
                    )
                    .into(),
                });
            }
        }
        if !pdf_bytes.starts_with(PDF_MAGIC) {
            return Err(Error::InputError {
                kind: InputErrorKind::NotPdf,
                message: "uploaded file is not a PDF document (missing %PDF- header)".into(),
            });
        }
        Ok(())
    }
}

fn parse_fingerprint(field_name: &str, s: &str) -> Result<Fingerprint> {
    let fingerprint = Fingerprint::from_str(s)
        .map_err(|err| Error::malformed(format!("{} is malformed: {}", field_name, err)))?;
    if fingerprint.is_zero() {
        return Err(Error::malformed(format!(
            "{} must not be the all-zero sentinel value",
            field_name
        )));
    }
    Ok(fingerprint)
}

fn parse_document_id(s: &str) -> Result<DocumentId> {
    DocumentId::from_str(s)
        .map_err(|err| Error::malformed(format!("documentId is malformed: {}", err)))
}
