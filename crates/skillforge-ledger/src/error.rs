use thiserror::Error;

/// Errors surfaced by the ledger client boundary.
///
/// Contract-logic rejections and transport failures are distinct variants
/// here; the workflow layer maps write-path failures it cannot act on
/// identically and recommends retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("course {0} does not exist")]
    CourseNotFound(u64),

    #[error("no certificate exists for token {0}")]
    CertificateNotFound(u64),

    #[error("student is already enrolled in course {0}")]
    AlreadyEnrolled(u64),

    #[error("course {0} is already completed for this student")]
    AlreadyCompleted(u64),

    #[error("attached value does not cover the course fee")]
    InsufficientValue,

    #[error("student is not enrolled in course {0}")]
    NotEnrolled(u64),

    #[error("a passing exam result is already recorded and cannot be overwritten")]
    ResultLocked,

    #[error("a course with this title already exists")]
    DuplicateTitle,

    #[error("write rejected by contract logic: {0}")]
    WriteRejected(String),

    #[error("ledger transport error: {0}")]
    Transport(String),
}
