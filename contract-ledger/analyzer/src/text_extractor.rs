use crate::Result;

/// Turns the bytes of a PDF into plain text for the Analyzer.
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String>;
}
