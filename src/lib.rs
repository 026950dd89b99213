//! Department-scoped knowledge assistant: a shared-key login gate, a document
//! repository and saved chat sessions persisted to a blob store, and a prompt
//! builder that hands every department document to a hosted language model.

pub mod assistant;
pub mod chat;
pub mod db;
pub mod doc_processor;
pub mod error;
pub mod gate;
pub mod knowledge;
pub mod llm;
pub mod overview;
pub mod prompt;
pub mod settings;
pub mod store;

pub use assistant::Assistant;
pub use db::models::{ChatSession, Department, Document, Message, MessageRole, Role, User};
pub use db::{BlobStore, Database, MemoryBlobStore};
pub use error::{Result, VaultError};
pub use gate::{AccessGate, AuthError, DepartmentKeys, SharedKeyGate};
pub use store::Vault;
