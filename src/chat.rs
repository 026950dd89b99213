use crate::assistant::Assistant;
use crate::db::models::{ChatSession, Department, Document, Message, MessageRole};
use crate::error::{Result, VaultError};
use crate::llm::TextGenerator;
use crate::prompt::PromptBuilder;

pub const TITLE_MAX_CHARS: usize = 30;

/// First 30 characters of the opening message, with "..." when cut.
pub fn derive_title(first_message: &str) -> String {
    let mut chars = first_message.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn new_message(role: MessageRole, text: &str) -> Message {
    Message {
        id: uuid::Uuid::new_v4().to_string(),
        role,
        text: text.to_string(),
        timestamp: chrono::Local::now().format("%H:%M").to_string(),
    }
}

/// One conversational turn: the user's message, the assistant's reply.
/// Upstream failures become the apology reply rather than an error.
pub async fn send<G: TextGenerator, P: PromptBuilder>(
    assistant: &Assistant<G, P>,
    department: Department,
    documents: &[Document],
    mut transcript: Vec<Message>,
    query: &str,
) -> Result<(Vec<Message>, String)> {
    if query.trim().is_empty() {
        return Err(VaultError::InvalidInput("query must not be blank".into()));
    }

    transcript.push(new_message(MessageRole::User, query));
    let reply = assistant
        .ask_or_apologize(query, department, documents)
        .await;
    transcript.push(new_message(MessageRole::Assistant, &reply));
    Ok((transcript, reply))
}

/// Saved conversations, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionList {
    sessions: Vec<ChatSession>,
}

impl SessionList {
    pub fn new(sessions: Vec<ChatSession>) -> Self {
        Self { sessions }
    }

    pub fn all(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn list_by_department(&self, department: Department) -> Vec<&ChatSession> {
        self.sessions
            .iter()
            .filter(|s| s.department == department)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Creates a session when `session_id` is `None`, otherwise replaces the
    /// messages of the existing one in place. An empty transcript saves nothing.
    pub fn save_or_update(
        &mut self,
        session_id: Option<&str>,
        department: Department,
        transcript: &[Message],
    ) -> Result<Option<String>> {
        let Some(first) = transcript.first() else {
            return Ok(None);
        };

        match session_id {
            Some(id) => {
                let session = self
                    .sessions
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| VaultError::SessionNotFound(id.to_string()))?;
                session.messages = transcript.to_vec();
                Ok(Some(session.id.clone()))
            }
            None => {
                let session = ChatSession {
                    id: uuid::Uuid::new_v4().to_string(),
                    title: derive_title(&first.text),
                    messages: transcript.to_vec(),
                    department,
                };
                let id = session.id.clone();
                self.sessions.insert(0, session);
                Ok(Some(id))
            }
        }
    }

    pub fn rename(&mut self, id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(VaultError::InvalidInput("title must not be blank".into()));
        }
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| VaultError::SessionNotFound(id.to_string()))?;
        session.title = title.to_string();
        Ok(())
    }

    /// Returns whether a session was removed. A caller holding it as the
    /// active conversation should start a fresh transcript.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        self.sessions.len() != before
    }
}
