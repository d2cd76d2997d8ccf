use crate::{print_json, AnalyzerArgs, LedgerDBArgs, NewlineArgs, Result};
use anyhow::Context;
use contract_ledger_core::{LedgerRecord, UploadAnalysis};
use contract_ledger_orchestrator::Orchestrator;
use std::{path::PathBuf, sync::Arc};

/// Analyze a PDF contract and print the report.  Nothing is written to the ledger; the output
/// lists any ledger records that already contain this exact file.
#[derive(Debug, clap::Parser)]
pub struct AnalyzeFile {
    /// Path of the PDF to analyze.
    pub file: PathBuf,
    #[command(flatten)]
    pub analyzer_args: AnalyzerArgs,
    #[command(flatten)]
    pub ledger_db_args: LedgerDBArgs,
    /// Specify the largest PDF accepted, in bytes.
    #[arg(
        name = "max-upload-bytes",
        env = "CONTRACT_LEDGER_MAX_UPLOAD_BYTES",
        long,
        value_name = "BYTES",
        default_value = "20971520"
    )]
    pub max_upload_bytes: usize,
    #[command(flatten)]
    pub newline_args: NewlineArgs,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput {
    #[serde(flatten)]
    upload_analysis: UploadAnalysis,
    ledger_records: Vec<LedgerRecord>,
}

impl AnalyzeFile {
    pub async fn handle(self) -> Result<()> {
        let pdf_bytes =
            std::fs::read(&self.file).with_context(|| format!("can't read {:?}", self.file))?;
        let orchestrator = Orchestrator::new(
            Arc::new(self.analyzer_args.get_analyzer()),
            Arc::new(self.analyzer_args.get_text_extractor()),
            self.ledger_db_args.get_ledger_store().await?,
        )
        .with_max_upload_bytes(self.max_upload_bytes);

        let upload_analysis = orchestrator.analyze_upload(&pdf_bytes, None).await?;
        let ledger_records = orchestrator
            .find_by_fingerprint(&upload_analysis.fingerprint.to_string())
            .await?;
        print_json(
            &AnalyzeOutput {
                upload_analysis,
                ledger_records,
            },
            &self.newline_args,
        )
    }
}
