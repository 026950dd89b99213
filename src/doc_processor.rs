use crate::db::models::{Document, User};
use std::fs;
use std::path::Path;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Human size label, e.g. `"2.4 MB"`.
pub fn size_label(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / BYTES_PER_MB)
}

/// Text stored for a freshly uploaded file until someone edits it.
pub fn placeholder_content(filename: &str) -> String {
    format!(
        "Extracted content for {}... No clinical summary available yet. \
         Please edit to add patient notes or protocol data for AI context.",
        filename
    )
}

/// Build a repository entry for a file on disk. The file body is not read;
/// only its name and size are recorded.
pub fn document_from_file(path: &Path, uploader: &User) -> std::io::Result<Document> {
    let metadata = fs::metadata(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(Document {
        id: uuid::Uuid::new_v4().to_string(),
        content: placeholder_content(&filename),
        name: filename,
        department: uploader.department,
        uploaded_by: uploader.name.clone(),
        uploaded_at: chrono::Local::now().format("%Y-%m-%d").to_string(),
        size: size_label(metadata.len()),
    })
}
