use skillforge_exam::Verdict;
use skillforge_ledger::LedgerClient;
use skillforge_types::{Address, Course};

use crate::error::WorkflowError;

/// Capability level of an address with respect to one course.
///
/// Role determination is a capability check, not a type hierarchy: one
/// address can be owner of the platform, instructor of course A, and
/// student of course B at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Owner,
    Instructor,
    Student,
}

/// Resolve the acting address's role for a course.
pub async fn resolve_role(
    ledger: &dyn LedgerClient,
    acting: &Address,
    course: &Course,
) -> Result<Role, WorkflowError> {
    if *acting == ledger.owner().await? {
        return Ok(Role::Owner);
    }
    if *acting == course.instructor {
        return Ok(Role::Instructor);
    }
    Ok(Role::Student)
}

/// Authorization rule for certificate issuance.
///
/// The instructor of the course and the platform owner may always trigger
/// issuance. A student may self-serve only for their own address, and only
/// within an exam session that produced a verdict — whether that verdict
/// passed is the saga's exam-status check, not an authorization question.
pub async fn authorize_issuance(
    ledger: &dyn LedgerClient,
    acting: &Address,
    course: &Course,
    student: &Address,
    session_verdict: Option<&Verdict>,
) -> Result<(), WorkflowError> {
    match resolve_role(ledger, acting, course).await? {
        Role::Owner | Role::Instructor => Ok(()),
        Role::Student => {
            if acting == student && session_verdict.is_some() {
                Ok(())
            } else {
                Err(WorkflowError::Unauthorized(format!(
                    "{} may not issue a certificate for course {}",
                    acting, course.id
                )))
            }
        }
    }
}
