use thiserror::Error;

use skillforge_content::ContentError;
use skillforge_exam::ExamError;
use skillforge_ledger::LedgerError;
use skillforge_types::{CurrencyError, Wei};

/// Workflow-level error taxonomy.
///
/// Every precondition check fails fast with a specific variant before any
/// external write is attempted. `AlreadyEnrolled` and `AlreadyCompleted`
/// mean the state already satisfies the goal and are informational to the
/// caller; `PinningFailed` and `LedgerWriteFailed` recommend retry — the
/// operations that raise them are idempotent re-invocations by design.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("student is already enrolled in this course")]
    AlreadyEnrolled,

    #[error("course is already completed for this student")]
    AlreadyCompleted,

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Wei, available: Wei },

    #[error("student is not enrolled in this course")]
    NotEnrolled,

    #[error("exam has not been passed")]
    ExamNotPassed,

    #[error("failed to pin content; retry the operation")]
    PinningFailed(#[source] ContentError),

    #[error("ledger write failed; retry the operation")]
    LedgerWriteFailed(#[source] LedgerError),

    #[error("ledger read failed")]
    Ledger(#[from] LedgerError),
}

impl WorkflowError {
    /// Map a ledger write rejection onto the workflow taxonomy.
    ///
    /// The ledger is the final arbiter: a racing session that loses at the
    /// write observes the same precondition variant it would have seen had
    /// its optimistic check caught the conflict. Everything else — whether
    /// transient transport trouble or a permanent contract rejection — is
    /// surfaced identically as a retryable write failure.
    pub fn from_write(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyEnrolled(_) => WorkflowError::AlreadyEnrolled,
            LedgerError::AlreadyCompleted(_) => WorkflowError::AlreadyCompleted,
            LedgerError::NotEnrolled(_) => WorkflowError::NotEnrolled,
            LedgerError::InsufficientValue => WorkflowError::Validation(
                "attached value does not cover the course fee".to_string(),
            ),
            LedgerError::ResultLocked => WorkflowError::Validation(
                "exam is already passed and cannot be retaken".to_string(),
            ),
            other => WorkflowError::LedgerWriteFailed(other),
        }
    }
}

impl From<ExamError> for WorkflowError {
    fn from(err: ExamError) -> Self {
        WorkflowError::Validation(err.to_string())
    }
}

impl From<CurrencyError> for WorkflowError {
    fn from(err: CurrencyError) -> Self {
        WorkflowError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_races_surface_as_precondition_failures() {
        assert!(matches!(
            WorkflowError::from_write(LedgerError::AlreadyCompleted(2)),
            WorkflowError::AlreadyCompleted
        ));
        assert!(matches!(
            WorkflowError::from_write(LedgerError::AlreadyEnrolled(2)),
            WorkflowError::AlreadyEnrolled
        ));
    }

    #[test]
    fn transport_and_contract_rejections_map_identically() {
        let transport = WorkflowError::from_write(LedgerError::Transport("timeout".into()));
        let rejected =
            WorkflowError::from_write(LedgerError::WriteRejected("out of gas".into()));
        assert!(matches!(transport, WorkflowError::LedgerWriteFailed(_)));
        assert!(matches!(rejected, WorkflowError::LedgerWriteFailed(_)));
    }
}
