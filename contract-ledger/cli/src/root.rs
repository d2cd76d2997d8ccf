use crate::{AnalyzeFile, Document, FingerprintFile, Result};

/// Analyze PDF contracts and keep a local ledger of their version chains.
#[derive(clap::Parser)]
#[command(name = "contract-ledger", version)]
pub enum Root {
    Fingerprint(FingerprintFile),
    Analyze(AnalyzeFile),
    #[command(subcommand)]
    Document(Document),
}

impl Root {
    pub async fn handle(self) -> Result<()> {
        match self {
            Self::Fingerprint(x) => x.handle(),
            Self::Analyze(x) => x.handle().await,
            Self::Document(x) => x.handle().await,
        }
    }
}
