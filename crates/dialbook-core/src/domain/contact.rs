use crate::domain::email::normalize_email;
use crate::domain::ids::ContactId;
use crate::domain::phone::normalize_phone;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Raw, user-supplied contact fields before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Contact fields that passed validation: trimmed name, canonical phone,
/// lowercased email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email,
        }
    }

    pub fn validate(&self) -> Result<ValidContact, CoreError> {
        let name = normalize_name(&self.name)?;
        let phone = normalize_phone(&self.phone)?;
        let email = match self.email.as_deref() {
            Some(raw) => normalize_email(raw)?,
            None => None,
        };
        Ok(ValidContact { name, phone, email })
    }
}

pub fn normalize_name(value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}
