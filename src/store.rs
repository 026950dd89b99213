use crate::chat::SessionList;
use crate::db::models::{ChatSession, Department, Document, Message, User};
use crate::db::{BlobStore, StoreError};
use crate::doc_processor;
use crate::error::Result;
use crate::knowledge::DocumentRepository;
use crate::overview::DepartmentOverview;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const DOCUMENTS_KEY: &str = "cliniq_vault_docs";
pub const SESSIONS_KEY: &str = "cliniq_vault_chats";

/// Documents present on first run.
pub fn seed_documents() -> Vec<Document> {
    vec![
        Document {
            id: "uuid-rad-001".into(),
            name: "MRI_Protocol_v2.pdf".into(),
            content: "MRI Safety guidelines and scanning protocols for high-field magnets. \
                      Ensure patient is screened for metal implants."
                .into(),
            department: Department::Radiology,
            uploaded_by: "System".into(),
            uploaded_at: "2023-10-24".into(),
            size: "2.4 MB".into(),
        },
        Document {
            id: "uuid-rad-002".into(),
            name: "Patient_Safety_Guidelines.pdf".into(),
            content: "Standard patient safety procedures in diagnostic imaging environment. \
                      Focus on sedation and monitoring."
                .into(),
            department: Department::Radiology,
            uploaded_by: "System".into(),
            uploaded_at: "2023-10-25".into(),
            size: "1.1 MB".into(),
        },
    ]
}

fn load_collection<S: BlobStore, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> std::result::Result<Option<Vec<T>>, StoreError> {
    match store.load(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

fn save_collection<S: BlobStore, T: Serialize>(
    store: &S,
    key: &str,
    items: &[T],
) -> std::result::Result<(), StoreError> {
    let raw = serde_json::to_string(items).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &raw)
}

/// Documents and chat sessions, flushed whole to the blob store after every
/// mutation. Last writer wins; there is no versioning.
pub struct Vault<S> {
    store: S,
    documents: DocumentRepository,
    sessions: SessionList,
}

impl<S: BlobStore> Vault<S> {
    /// Loads both collections. Missing keys are seeded; malformed ones abort.
    pub fn open(store: S) -> Result<Self> {
        let documents = match load_collection(&store, DOCUMENTS_KEY)? {
            Some(docs) => docs,
            None => {
                let seed = seed_documents();
                save_collection(&store, DOCUMENTS_KEY, &seed)?;
                seed
            }
        };
        let sessions: Vec<ChatSession> = match load_collection(&store, SESSIONS_KEY)? {
            Some(sessions) => sessions,
            None => {
                save_collection::<_, ChatSession>(&store, SESSIONS_KEY, &[])?;
                Vec::new()
            }
        };

        info!(
            documents = documents.len(),
            sessions = sessions.len(),
            "vault opened"
        );
        Ok(Self {
            store,
            documents: DocumentRepository::new(documents),
            sessions: SessionList::new(sessions),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn documents(&self) -> &DocumentRepository {
        &self.documents
    }

    pub fn sessions(&self) -> &SessionList {
        &self.sessions
    }

    fn flush_documents(&self) -> Result<()> {
        save_collection(&self.store, DOCUMENTS_KEY, self.documents.all())?;
        Ok(())
    }

    fn flush_sessions(&self) -> Result<()> {
        save_collection(&self.store, SESSIONS_KEY, self.sessions.all())?;
        Ok(())
    }

    // ── Documents ──

    pub fn list_documents(&self, department: Department) -> Vec<&Document> {
        self.documents.list(department)
    }

    pub fn search_documents(&self, department: Department, query: &str) -> Vec<&Document> {
        self.documents.search(department, query)
    }

    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn add_document(&mut self, doc: Document) -> Result<()> {
        info!(id = %doc.id, name = %doc.name, department = %doc.department, "document added");
        self.documents.add(doc);
        self.flush_documents()
    }

    pub fn upload_document(&mut self, path: &Path, uploader: &User) -> Result<Document> {
        let doc = doc_processor::document_from_file(path, uploader)?;
        self.add_document(doc.clone())?;
        Ok(doc)
    }

    pub fn update_document(&mut self, id: &str, new_name: &str, new_content: &str) -> Result<()> {
        self.documents.update(id, new_name, new_content)?;
        info!(id, "document updated");
        self.flush_documents()
    }

    pub fn delete_document(&mut self, id: &str) -> Result<bool> {
        let removed = self.documents.delete(id);
        if removed {
            info!(id, "document deleted");
        }
        self.flush_documents()?;
        Ok(removed)
    }

    // ── Chat sessions ──

    pub fn list_sessions(&self, department: Department) -> Vec<&ChatSession> {
        self.sessions.list_by_department(department)
    }

    pub fn get_session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    pub fn save_session(
        &mut self,
        session_id: Option<&str>,
        department: Department,
        transcript: &[Message],
    ) -> Result<Option<String>> {
        let saved = self
            .sessions
            .save_or_update(session_id, department, transcript)?;
        if let Some(id) = &saved {
            info!(id = %id, messages = transcript.len(), "chat session saved");
            self.flush_sessions()?;
        }
        Ok(saved)
    }

    pub fn rename_session(&mut self, id: &str, title: &str) -> Result<()> {
        self.sessions.rename(id, title)?;
        self.flush_sessions()
    }

    pub fn delete_session(&mut self, id: &str) -> Result<bool> {
        let removed = self.sessions.delete(id);
        if removed {
            info!(id, "chat session deleted");
        }
        self.flush_sessions()?;
        Ok(removed)
    }

    pub fn overview(&self, department: Department) -> DepartmentOverview {
        DepartmentOverview::collect(department, &self.documents, &self.sessions)
    }
}
