use crate::db::models::{Department, Document};
use crate::llm::{GenerationRequest, LlmError, TextGenerator};
use crate::prompt::{ContextStuffing, PromptBuilder};
use tracing::{debug, error};

/// Low temperature: answers should stick to the records.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

pub const EMPTY_RESPONSE_REPLY: &str = "I'm sorry, I couldn't process that query.";
pub const UPSTREAM_FAILURE_REPLY: &str =
    "Error communicating with the private LLM node. Please check server status.";

pub struct Assistant<G, P = ContextStuffing> {
    generator: G,
    prompt: P,
    temperature: f32,
}

impl<G: TextGenerator> Assistant<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            prompt: ContextStuffing,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl<G: TextGenerator, P: PromptBuilder> Assistant<G, P> {
    pub fn with_prompt_builder<Q: PromptBuilder>(self, prompt: Q) -> Assistant<G, Q> {
        Assistant {
            generator: self.generator,
            prompt,
            temperature: self.temperature,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Answer `query` using every `department` document as context.
    pub async fn ask(
        &self,
        query: &str,
        department: Department,
        documents: &[Document],
    ) -> Result<String, LlmError> {
        let system = self.prompt.build(department, documents);
        debug!(
            department = %department,
            model = self.generator.model_name(),
            prompt_chars = system.len(),
            "sending query to model"
        );

        let request = GenerationRequest {
            model: self.generator.model_name().to_string(),
            system,
            prompt: query.to_string(),
            temperature: self.temperature,
        };
        let text = self.generator.generate(&request).await?;

        if text.trim().is_empty() {
            Ok(EMPTY_RESPONSE_REPLY.to_string())
        } else {
            Ok(text)
        }
    }

    /// Like [`ask`](Self::ask) but never fails: upstream errors are logged and
    /// replaced with a fixed apology.
    pub async fn ask_or_apologize(
        &self,
        query: &str,
        department: Department,
        documents: &[Document],
    ) -> String {
        match self.ask(query, department, documents).await {
            Ok(text) => text,
            Err(e) => {
                error!(department = %department, error = %e, "assistant request failed");
                UPSTREAM_FAILURE_REPLY.to_string()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{EchoGenerator, FixedGenerator};
    use super::*;
    use crate::prompt::NO_DOCUMENTS_MARKER;

    fn radiology_doc() -> Document {
        Document {
            id: "r1".into(),
            name: "MRI_Protocol_v2.pdf".into(),
            content: "Screen for metal implants.".into(),
            department: Department::Radiology,
            uploaded_by: "System".into(),
            uploaded_at: "2023-10-24".into(),
            size: "2.4 MB".into(),
        }
    }

    #[tokio::test]
    async fn test_no_documents_marker_reaches_endpoint() {
        let assistant = Assistant::new(EchoGenerator::default());
        let reply = assistant
            .ask("anything?", Department::Oncology, &[radiology_doc()])
            .await
            .unwrap();
        assert!(!reply.is_empty());
        assert!(reply.contains(NO_DOCUMENTS_MARKER));
        assert!(!reply.contains("MRI_Protocol_v2.pdf"));
    }

    #[tokio::test]
    async fn test_request_carries_query_and_low_temperature() {
        let assistant = Assistant::new(EchoGenerator::default());
        assistant
            .ask("What about implants?", Department::Radiology, &[radiology_doc()])
            .await
            .unwrap();

        let requests = assistant.generator().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "What about implants?");
        assert_eq!(requests[0].model, "echo");
        assert!((requests[0].temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert!(requests[0]
            .system
            .contains("[DOCUMENT: MRI_Protocol_v2.pdf]\nScreen for metal implants."));
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_apology() {
        let assistant = Assistant::new(FixedGenerator(Ok("  ".into())));
        let reply = assistant.ask("q", Department::Radiology, &[]).await.unwrap();
        assert_eq!(reply, EMPTY_RESPONSE_REPLY);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_an_error_or_apology() {
        let assistant = Assistant::new(FixedGenerator(Err(503)));
        assert!(matches!(
            assistant.ask("q", Department::Radiology, &[]).await,
            Err(LlmError::Api { status: 503, .. })
        ));
        assert_eq!(
            assistant
                .ask_or_apologize("q", Department::Radiology, &[])
                .await,
            UPSTREAM_FAILURE_REPLY
        );
    }

    #[tokio::test]
    async fn test_custom_prompt_builder() {
        struct Bare;
        impl PromptBuilder for Bare {
            fn build(&self, department: Department, _documents: &[Document]) -> String {
                format!("dept={}", department)
            }
        }

        let assistant = Assistant::new(EchoGenerator::default()).with_prompt_builder(Bare);
        let reply = assistant.ask("q", Department::Pathology, &[]).await.unwrap();
        assert_eq!(reply, "dept=Pathology");
    }
}
