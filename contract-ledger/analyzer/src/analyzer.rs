use crate::Result;
use contract_ledger_core::AnalysisReport;

/// Produces a risk report for the extracted text of a contract.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AnalysisReport>;
}
