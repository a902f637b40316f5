pub mod error;
pub mod importer;
pub mod json;
pub mod report;

pub use error::{ImportError, Result};
pub use importer::{import_file, import_records};
pub use json::{parse_contacts, ParsedImport};
pub use report::{ImportFailure, ImportReport};
