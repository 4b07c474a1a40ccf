use thiserror::Error;

use crate::ledger::FighterId;

/// Failures of the rating core.
///
/// `Validation` aborts the rebuild or import that hit it, `NotFound` is an
/// ordinary query result and `ComputationInvariant` means the replay itself
/// is broken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("invalid ledger record {record}: {reason}")]
    Validation { record: String, reason: String },

    #[error("fighter not found: {0}")]
    NotFound(String),

    #[error("rating invariant violated for fighter {fighter}: {detail}")]
    ComputationInvariant { fighter: FighterId, detail: String },
}

impl RatingError {
    pub fn validation(record: impl Into<String>, reason: impl Into<String>) -> Self {
        RatingError::Validation {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(fighter: impl Into<String>) -> Self {
        RatingError::NotFound(fighter.into())
    }

    pub fn invariant(fighter: FighterId, detail: impl Into<String>) -> Self {
        RatingError::ComputationInvariant {
            fighter,
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RatingError::NotFound(_))
    }
}

pub type RatingResult<T> = Result<T, RatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_record() {
        let err = RatingError::validation("bout 7", "missing date");
        assert_eq!(err.to_string(), "invalid ledger record bout 7: missing date");
    }

    #[test]
    fn not_found_is_recoverable() {
        assert!(RatingError::not_found("Nobody").is_not_found());
        assert!(!RatingError::invariant(3, "broken chain").is_not_found());
    }
}
