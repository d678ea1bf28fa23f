use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Why an item was left out of a traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skip {
    /// What could not be fetched (e.g., "projects of group 6")
    pub subject: String,
    pub reason: String,
}

/// Result of a best-effort fetch inside a traversal.
///
/// A `Skipped` item degrades the response instead of aborting it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Fetched(T),
    Skipped(Skip),
}

impl<T> Outcome<T> {
    /// Converts a fetch result, logging and recording the failure as a skip.
    pub fn from_result(result: Result<T>, subject: impl Into<String>) -> Self {
        match result {
            Ok(value) => Self::Fetched(value),
            Err(e) => {
                let subject = subject.into();
                warn!("Skipping {subject}: {e}");
                Self::Skipped(Skip {
                    subject,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Returns the fetched value, or `fallback` after pushing the skip
    /// onto `skipped`.
    pub fn or_record(self, fallback: T, skipped: &mut Vec<Skip>) -> T {
        match self {
            Self::Fetched(value) => value,
            Self::Skipped(skip) => {
                skipped.push(skip);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;

    #[test]
    fn test_ok_result_is_fetched() {
        let outcome = Outcome::from_result(Ok(3), "branches of project 1");
        assert_eq!(outcome, Outcome::Fetched(3));
    }

    #[test]
    fn test_error_is_recorded_with_subject() {
        let outcome: Outcome<Vec<u8>> = Outcome::from_result(
            Err(ExplorerError::ProjectNotFound(1)),
            "branches of project 1",
        );

        let mut skipped = Vec::new();
        let value = outcome.or_record(Vec::new(), &mut skipped);

        assert!(value.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].subject, "branches of project 1");
        assert!(skipped[0].reason.contains("Project not found"));
    }
}
