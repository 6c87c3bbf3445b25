use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use skillforge_content::ContentStore;
use skillforge_exam::Verdict;
use skillforge_ledger::{LedgerClient, MarkCompletion};
use skillforge_types::{Address, CertificateMetadata, ContentId, CourseId, TxId};

use crate::auth::authorize_issuance;
use crate::error::WorkflowError;

/// Issuance command.
#[derive(Clone, Debug)]
pub struct IssueRequest {
    pub course_id: CourseId,
    pub student: Address,
    /// Name to record on the certificate; falls back to the name recorded
    /// at enrollment when empty.
    pub student_name: String,
    pub acting: Address,
    /// Verdict from the acting session's exam sitting, if any. Required
    /// for student self-service; ignored for instructor/owner issuance.
    pub session_verdict: Option<Verdict>,
}

/// Receipt for a completed issuance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceReceipt {
    pub tx_id: TxId,
    pub metadata_content_id: ContentId,
    pub completed_on: NaiveDate,
}

/// The completion/certificate-issuance saga.
///
/// The only multi-step, multi-system operation in the platform: it spans
/// the content store and the ledger with no cross-system transaction, so
/// consistency rests on ordering and idempotence rather than atomic
/// commit. Every precondition is re-evaluated on each invocation, the pin
/// happens strictly before the ledger write, and both halves are safe to
/// retry: pinning is idempotent by content, and the ledger accepts at most
/// one completion per (course, student) pair.
pub struct CertificateIssuanceSaga {
    ledger: Arc<dyn LedgerClient>,
    content: Arc<dyn ContentStore>,
}

impl CertificateIssuanceSaga {
    pub fn new(ledger: Arc<dyn LedgerClient>, content: Arc<dyn ContentStore>) -> Self {
        Self { ledger, content }
    }

    /// Run the saga to completion or to a clean, retry-safe failure.
    ///
    /// Failure modes by step:
    /// - precondition failures (authorization, duplicate, enrollment, exam
    ///   status) abort with no side effects at all;
    /// - a pin failure aborts with no ledger write — nothing on-chain ever
    ///   references a blob that was not pinned;
    /// - a ledger write failure after a successful pin leaves an orphaned
    ///   blob, which is inert: the retry re-pins the identical document to
    ///   the identical id and re-attempts the write.
    pub async fn issue(&self, request: &IssueRequest) -> Result<IssuanceReceipt, WorkflowError> {
        let IssueRequest {
            course_id,
            student,
            acting,
            ..
        } = request;
        info!(course = %course_id, student = %student, acting = %acting, "issuance requested");

        // Step 1: authorization. No side effects on failure.
        let course = self.ledger.course(*course_id).await?;
        authorize_issuance(
            self.ledger.as_ref(),
            acting,
            &course,
            student,
            request.session_verdict.as_ref(),
        )
        .await?;

        // Step 2: optimistic duplicate check. Not atomic with the final
        // write; the ledger re-arbitrates at step 7.
        if self
            .ledger
            .completion_date(*course_id, student)
            .await?
            .is_some()
        {
            return Err(WorkflowError::AlreadyCompleted);
        }

        // Step 3: enrollment.
        let enrollment = self
            .ledger
            .enrollments_of(student)
            .await?
            .into_iter()
            .find(|enrollment| enrollment.course_id == *course_id)
            .ok_or(WorkflowError::NotEnrolled)?;

        // Step 4: exam status, resolved from the ledger rather than any
        // session-cached verdict.
        let exam_result = self.ledger.exam_result(*course_id, student).await?;
        if !exam_result.passed {
            return Err(WorkflowError::ExamNotPassed);
        }

        // Step 5: deterministic metadata assembly.
        let student_name = if request.student_name.trim().is_empty() {
            enrollment.student_name.clone()
        } else {
            request.student_name.clone()
        };
        let completed_on = Utc::now().date_naive();
        let metadata = CertificateMetadata::new(
            *course_id,
            &course.title,
            course.fee,
            &course.instructor,
            &student_name,
            student,
            enrollment.enrolled_at.date_naive(),
            exam_result.status(),
            completed_on,
        );

        // Step 6: pin before telling the ledger the certificate exists.
        let metadata_content_id = self
            .content
            .pin(&metadata.canonical_bytes())
            .await
            .map_err(|err| {
                warn!(course = %course_id, student = %student, %err, "metadata pin failed");
                WorkflowError::PinningFailed(err)
            })?;

        // Step 7: the completion write. The ledger is the final arbiter of
        // the at-most-once invariant; a lost race surfaces AlreadyCompleted.
        let tx_id = self
            .ledger
            .mark_completion_and_issue_certificate(MarkCompletion {
                course_id: *course_id,
                student: student.clone(),
                student_name,
                metadata_content_id: metadata_content_id.clone(),
                from: acting.clone(),
            })
            .await
            .map_err(|err| {
                warn!(course = %course_id, student = %student, %err, "completion write failed");
                WorkflowError::from_write(err)
            })?;

        info!(
            course = %course_id,
            student = %student,
            tx = %tx_id,
            content_id = %metadata_content_id,
            "completion marked, certificate issued"
        );

        // Step 8: receipt.
        Ok(IssuanceReceipt {
            tx_id,
            metadata_content_id,
            completed_on,
        })
    }
}
