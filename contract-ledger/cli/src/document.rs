use crate::{
    DocumentCreate, DocumentHistory, DocumentLatest, DocumentUpdate, DocumentVerify, Result,
};

/// Record and query document versions in the local ledger.
#[derive(clap::Subcommand)]
pub enum Document {
    Create(DocumentCreate),
    Update(DocumentUpdate),
    Latest(DocumentLatest),
    History(DocumentHistory),
    Verify(DocumentVerify),
}

impl Document {
    pub async fn handle(self) -> Result<()> {
        match self {
            Self::Create(x) => x.handle().await,
            Self::Update(x) => x.handle().await,
            Self::Latest(x) => x.handle().await,
            Self::History(x) => x.handle().await,
            Self::Verify(x) => x.handle().await,
        }
    }
}
