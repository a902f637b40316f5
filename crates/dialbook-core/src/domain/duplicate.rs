use serde::{Deserialize, Serialize};

/// What an import does with a record whose phone number is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Leave the stored contact alone and count the record as skipped.
    #[default]
    Skip,
    /// Overwrite the stored contact's name and email.
    Update,
}
