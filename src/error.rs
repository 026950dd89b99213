use crate::db::StoreError;
use crate::gate::AuthError;
use crate::llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Upstream(#[from] LlmError),
    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    #[error("Chat session not found: {0}")]
    SessionNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VaultError>;
