use crate::db::models::{Department, Document};

pub const NO_DOCUMENTS_MARKER: &str = "No documents found for this department.";

/// Turns a department's documents into the system instruction sent with a query.
pub trait PromptBuilder: Send + Sync {
    fn build(&self, department: Department, documents: &[Document]) -> String;
}

/// Every document of the department, verbatim, in list order. No ranking,
/// chunking or size bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextStuffing;

/// `[DOCUMENT: name]` blocks separated by blank lines, or the no-documents marker.
pub fn render_context(department: Department, documents: &[Document]) -> String {
    let context = documents
        .iter()
        .filter(|d| d.department == department)
        .map(|d| format!("[DOCUMENT: {}]\n{}", d.name, d.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    if context.is_empty() {
        NO_DOCUMENTS_MARKER.to_string()
    } else {
        context
    }
}

impl PromptBuilder for ContextStuffing {
    fn build(&self, department: Department, documents: &[Document]) -> String {
        format!(
            "You are ClinIQ Vault, a healthcare knowledge assistant running on a private, isolated server.\n\
             \n\
             Rules:\n\
             1. You are assisting the {department} department.\n\
             2. The department records below are the only knowledge you are authorized to use.\n\
             3. Do not mention names or sensitive identifiers unless they appear in those records.\n\
             4. If the answer is not contained in the records, say clearly that the authorized records do not include that information.\n\
             \n\
             AUTHORIZED DEPARTMENT RECORDS:\n\
             {context}\n",
            department = department,
            context = render_context(department, documents),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, content: &str, department: Department) -> Document {
        Document {
            id: name.into(),
            name: name.into(),
            content: content.into(),
            department,
            uploaded_by: "System".into(),
            uploaded_at: "2023-10-24".into(),
            size: "1.0 MB".into(),
        }
    }

    #[test]
    fn test_render_context_joins_department_documents_in_order() {
        let docs = vec![
            doc("a.pdf", "alpha", Department::Radiology),
            doc("b.pdf", "beta", Department::Oncology),
            doc("c.pdf", "gamma", Department::Radiology),
        ];
        assert_eq!(
            render_context(Department::Radiology, &docs),
            "[DOCUMENT: a.pdf]\nalpha\n\n[DOCUMENT: c.pdf]\ngamma"
        );
    }

    #[test]
    fn test_render_context_empty_uses_marker() {
        let docs = vec![doc("a.pdf", "alpha", Department::Radiology)];
        assert_eq!(render_context(Department::Pathology, &docs), NO_DOCUMENTS_MARKER);
    }

    #[test]
    fn test_instruction_names_department_and_excludes_others() {
        let docs = vec![
            doc("a.pdf", "alpha", Department::Radiology),
            doc("secret.pdf", "oncology only", Department::Oncology),
        ];
        let prompt = ContextStuffing.build(Department::Radiology, &docs);
        assert!(prompt.contains("assisting the Radiology department"));
        assert!(prompt.contains("[DOCUMENT: a.pdf]"));
        assert!(!prompt.contains("secret.pdf"));
        assert!(prompt.contains("not contained in the records"));
    }
}
