use serde::Serialize;

/// Outcome counts for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<ImportFailure>,
    pub warnings: Vec<String>,
}

/// A record that could not be stored; `index` is its zero-based position in
/// the input array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub index: usize,
    pub reason: String,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported + self.updated + self.skipped + self.failed
    }

    pub(crate) fn record_failure(&mut self, index: usize, reason: impl Into<String>) {
        self.failed += 1;
        self.failures.push(ImportFailure {
            index,
            reason: reason.into(),
        });
    }
}
