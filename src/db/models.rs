use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Radiology,
    Oncology,
    Pathology,
    Administration,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Radiology,
        Department::Oncology,
        Department::Pathology,
        Department::Administration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Radiology => "Radiology",
            Department::Oncology => "Oncology",
            Department::Pathology => "Pathology",
            Department::Administration => "Administration",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "radiology" => Ok(Department::Radiology),
            "oncology" => Ok(Department::Oncology),
            "pathology" => Ok(Department::Pathology),
            "administration" | "admin" => Ok(Department::Administration),
            other => Err(format!("Unknown department: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Doctor,
    Admin,
    Staff,
}

/// Signed-in identity. Lives only as long as the login; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub department: Department,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub content: String,
    pub department: Department,
    pub uploaded_by: String,
    pub uploaded_at: String,
    pub size: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub department: Department,
}
