use crate::db::models::{Department, Document};
use crate::error::{Result, VaultError};

/// Ordered document collection, partitioned by department at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRepository {
    docs: Vec<Document>,
}

impl DocumentRepository {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    pub fn all(&self) -> &[Document] {
        &self.docs
    }

    pub fn list(&self, department: Department) -> Vec<&Document> {
        self.docs
            .iter()
            .filter(|d| d.department == department)
            .collect()
    }

    /// Case-insensitive substring match over name or content.
    pub fn search(&self, department: Department, query: &str) -> Vec<&Document> {
        let needle = query.to_lowercase();
        self.docs
            .iter()
            .filter(|d| d.department == department)
            .filter(|d| {
                d.name.to_lowercase().contains(&needle)
                    || d.content.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }

    pub fn add(&mut self, doc: Document) {
        self.docs.push(doc);
    }

    pub fn update(&mut self, id: &str, new_name: &str, new_content: &str) -> Result<&Document> {
        if new_name.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "document name must not be blank".into(),
            ));
        }
        let doc = self
            .docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| VaultError::DocumentNotFound(id.to_string()))?;
        doc.name = new_name.to_string();
        doc.content = new_content.to_string();
        Ok(&*doc)
    }

    /// Returns whether a document was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.docs.len();
        self.docs.retain(|d| d.id != id);
        self.docs.len() != before
    }

    /// Document count per department, in [`Department::ALL`] order.
    pub fn distribution(&self) -> Vec<(Department, usize)> {
        Department::ALL
            .iter()
            .map(|&dept| (dept, self.docs.iter().filter(|d| d.department == dept).count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, name: &str, content: &str, department: Department) -> Document {
        Document {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            department,
            uploaded_by: "System".into(),
            uploaded_at: "2023-10-24".into(),
            size: "1.0 MB".into(),
        }
    }

    fn sample() -> DocumentRepository {
        DocumentRepository::new(vec![
            doc("r1", "MRI_Protocol_v2.pdf", "High-field magnet safety.", Department::Radiology),
            doc("o1", "Chemo_Dosing.pdf", "Protocol for cisplatin.", Department::Oncology),
            doc("r2", "Patient_Safety.pdf", "Sedation and monitoring.", Department::Radiology),
            doc("p1", "Biopsy_Handling.pdf", "Fixation in formalin.", Department::Pathology),
        ])
    }

    fn ids(docs: &[&Document]) -> Vec<String> {
        docs.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_list_filters_by_department() {
        let repo = sample();
        for dept in Department::ALL {
            assert!(repo.list(dept).iter().all(|d| d.department == dept));
        }
        assert_eq!(ids(&repo.list(Department::Radiology)), vec!["r1", "r2"]);
        assert!(repo.list(Department::Administration).is_empty());
    }

    #[test]
    fn test_empty_search_equals_list() {
        let repo = sample();
        for dept in Department::ALL {
            assert_eq!(repo.search(dept, ""), repo.list(dept));
        }
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_content() {
        let repo = sample();
        assert_eq!(ids(&repo.search(Department::Radiology, "protocol")), vec!["r1"]);
        assert_eq!(ids(&repo.search(Department::Radiology, "MRI")), vec!["r1"]);
        assert_eq!(ids(&repo.search(Department::Radiology, "SEDATION")), vec!["r2"]);
        // Oncology content matches "protocol" but is not visible from Radiology.
        assert_eq!(ids(&repo.search(Department::Oncology, "protocol")), vec!["o1"]);
        assert!(repo.search(Department::Pathology, "magnet").is_empty());
    }

    #[test]
    fn test_update_replaces_name_and_content() {
        let mut repo = sample();
        let updated = repo.update("r2", "Safety_v2.pdf", "Updated text").unwrap();
        assert_eq!(updated.name, "Safety_v2.pdf");
        assert_eq!(repo.get("r2").unwrap().content, "Updated text");
        assert_eq!(repo.get("r2").unwrap().uploaded_by, "System");
    }

    #[test]
    fn test_update_rejects_unknown_id_and_blank_name() {
        let mut repo = sample();
        assert!(matches!(
            repo.update("nope", "x", "y"),
            Err(VaultError::DocumentNotFound(_))
        ));
        assert!(matches!(
            repo.update("r1", "   ", "y"),
            Err(VaultError::InvalidInput(_))
        ));
        assert_eq!(repo.get("r1").unwrap().name, "MRI_Protocol_v2.pdf");
    }

    #[test]
    fn test_delete_removes_exactly_one_and_keeps_order() {
        let mut repo = sample();
        assert!(repo.delete("o1"));
        let remaining: Vec<_> = repo.all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(remaining, vec!["r1", "r2", "p1"]);

        let before = repo.clone();
        assert!(!repo.delete("missing"));
        assert_eq!(repo, before);
    }

    #[test]
    fn test_distribution_counts_every_department() {
        let repo = sample();
        assert_eq!(
            repo.distribution(),
            vec![
                (Department::Radiology, 2),
                (Department::Oncology, 1),
                (Department::Pathology, 1),
                (Department::Administration, 0),
            ]
        );
    }
}
