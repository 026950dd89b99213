use crate::chat::SessionList;
use crate::db::models::Department;
use crate::knowledge::DocumentRepository;
use serde::Serialize;

/// Figures for the signed-in department's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentOverview {
    pub department: Department,
    pub indexed_files: usize,
    pub chat_sessions: usize,
    pub messages: usize,
    pub distribution: Vec<(Department, usize)>,
}

impl DepartmentOverview {
    pub fn collect(
        department: Department,
        documents: &DocumentRepository,
        sessions: &SessionList,
    ) -> Self {
        let own_sessions = sessions.list_by_department(department);
        Self {
            department,
            indexed_files: documents.list(department).len(),
            chat_sessions: own_sessions.len(),
            messages: own_sessions.iter().map(|s| s.messages.len()).sum(),
            distribution: documents.distribution(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::new_message;
    use crate::db::models::MessageRole;
    use crate::store::seed_documents;

    #[test]
    fn test_overview_counts_only_own_department() {
        let documents = DocumentRepository::new(seed_documents());
        let mut sessions = SessionList::default();
        let turn = vec![
            new_message(MessageRole::User, "q"),
            new_message(MessageRole::Assistant, "a"),
        ];
        sessions
            .save_or_update(None, Department::Radiology, &turn)
            .unwrap();
        sessions
            .save_or_update(None, Department::Oncology, &turn[..1])
            .unwrap();

        let rad = DepartmentOverview::collect(Department::Radiology, &documents, &sessions);
        assert_eq!(rad.indexed_files, 2);
        assert_eq!(rad.chat_sessions, 1);
        assert_eq!(rad.messages, 2);
        assert_eq!(rad.distribution[0], (Department::Radiology, 2));

        let onc = DepartmentOverview::collect(Department::Oncology, &documents, &sessions);
        assert_eq!(onc.indexed_files, 0);
        assert_eq!(onc.messages, 1);
    }
}
