//! Department login.
//!
//! This is a capability gate, not a security boundary: the shared keys are
//! plaintext, compared verbatim, with no hashing, rate limiting or lockout.
//! Callers only depend on [`AccessGate`], so a real identity provider can be
//! dropped in later.

use crate::db::models::{Department, Role, User};
use tracing::{info, warn};

pub const FALLBACK_DISPLAY_NAME: &str = "Healthcare Professional";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Please select a department node.")]
    NoDepartmentSelected,
    #[error("Invalid access key for {department} department.")]
    InvalidCredential { department: Department },
}

pub trait AccessGate {
    fn authenticate(
        &self,
        department: Option<Department>,
        supplied_password: &str,
        display_name: &str,
    ) -> Result<User, AuthError>;
}

/// Shared key per department. `None` means the department cannot log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentKeys {
    pub radiology: Option<String>,
    pub oncology: Option<String>,
    pub pathology: Option<String>,
    pub administration: Option<String>,
}

impl Default for DepartmentKeys {
    fn default() -> Self {
        Self {
            radiology: Some("rad123".to_string()),
            oncology: Some("onc123".to_string()),
            pathology: Some("pat123".to_string()),
            administration: None,
        }
    }
}

impl DepartmentKeys {
    pub fn key_for(&self, department: Department) -> Option<&str> {
        match department {
            Department::Radiology => self.radiology.as_deref(),
            Department::Oncology => self.oncology.as_deref(),
            Department::Pathology => self.pathology.as_deref(),
            Department::Administration => self.administration.as_deref(),
        }
    }

    /// Defaults overlaid with `CLINIQ_KEY_<DEPARTMENT>` environment values.
    pub fn from_env() -> Self {
        let mut keys = Self::default();
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        if let Some(v) = read("CLINIQ_KEY_RADIOLOGY") {
            keys.radiology = Some(v);
        }
        if let Some(v) = read("CLINIQ_KEY_ONCOLOGY") {
            keys.oncology = Some(v);
        }
        if let Some(v) = read("CLINIQ_KEY_PATHOLOGY") {
            keys.pathology = Some(v);
        }
        if let Some(v) = read("CLINIQ_KEY_ADMINISTRATION") {
            keys.administration = Some(v);
        }
        keys
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedKeyGate {
    keys: DepartmentKeys,
}

impl SharedKeyGate {
    pub fn new(keys: DepartmentKeys) -> Self {
        Self { keys }
    }
}

impl AccessGate for SharedKeyGate {
    fn authenticate(
        &self,
        department: Option<Department>,
        supplied_password: &str,
        display_name: &str,
    ) -> Result<User, AuthError> {
        let department = department.ok_or(AuthError::NoDepartmentSelected)?;

        match self.keys.key_for(department) {
            Some(expected) if expected == supplied_password => {}
            _ => {
                warn!(department = %department, "rejected department access key");
                return Err(AuthError::InvalidCredential { department });
            }
        }

        let name = match display_name.trim() {
            "" => FALLBACK_DISPLAY_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };

        info!(department = %department, user = %name, "department login");
        Ok(User {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            role: Role::Doctor,
            department,
        })
    }
}
