use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use skillforge_ledger::{EnrollInCourse, LedgerClient};
use skillforge_types::{Address, CourseId, TxId};

use crate::error::WorkflowError;
use crate::session::SessionContext;

/// Receipt for a confirmed enrollment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentReceipt {
    pub tx_id: TxId,
    pub course_id: CourseId,
    pub student: Address,
}

/// Admission control for course enrollment.
pub struct EnrollmentService {
    ledger: Arc<dyn LedgerClient>,
}

impl EnrollmentService {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Enroll the session's actor into a course.
    ///
    /// Preconditions are checked in order and the first failure wins:
    /// non-empty name, no existing enrollment, sufficient funds. On success
    /// exactly one payable ledger write is submitted; the session cache is
    /// updated only after the ledger confirms, never speculatively.
    pub async fn enroll(
        &self,
        session: &mut SessionContext,
        course_id: CourseId,
        student_name: &str,
    ) -> Result<EnrollmentReceipt, WorkflowError> {
        let student = session.actor.clone();

        if student_name.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "student name must not be empty".to_string(),
            ));
        }

        if session.is_enrolled_locally(course_id) {
            return Err(WorkflowError::AlreadyEnrolled);
        }
        let already = self
            .ledger
            .enrollments_of(&student)
            .await?
            .iter()
            .any(|enrollment| enrollment.course_id == course_id);
        if already {
            return Err(WorkflowError::AlreadyEnrolled);
        }

        let course = self.ledger.course(course_id).await?;
        let available = self.ledger.funds_of(&student).await?;
        if available < course.fee {
            return Err(WorkflowError::InsufficientFunds {
                needed: course.fee,
                available,
            });
        }

        // The ledger enforces atomicity of "accept payment + record
        // enrollment"; a racing duplicate loses here and surfaces as
        // AlreadyEnrolled.
        let tx_id = self
            .ledger
            .enroll_in_course(EnrollInCourse {
                course_id,
                student_name: student_name.to_string(),
                from: student.clone(),
                value: course.fee,
            })
            .await
            .map_err(|err| {
                warn!(course = %course_id, student = %student, %err, "enrollment write failed");
                WorkflowError::from_write(err)
            })?;

        session.mark_enrolled(course_id);
        info!(course = %course_id, student = %student, tx = %tx_id, "enrollment confirmed");

        Ok(EnrollmentReceipt {
            tx_id,
            course_id,
            student,
        })
    }
}
