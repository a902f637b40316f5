pub mod contact;
pub mod db_name;
pub mod duplicate;
pub mod email;
pub mod ids;
pub mod phone;
pub mod search;

pub use contact::{normalize_name, Contact, ContactDraft, ValidContact};
pub use db_name::normalize_db_name;
pub use duplicate::DuplicatePolicy;
pub use email::normalize_email;
pub use ids::ContactId;
pub use phone::normalize_phone;
pub use search::SearchField;
