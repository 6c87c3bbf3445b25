use std::sync::Arc;

use tracing::{debug, info};

use skillforge_exam::{ExamAttempt, ExamEngine, QuestionBank, Verdict};
use skillforge_ledger::{LedgerClient, RecordExamResult};
use skillforge_types::{CourseId, TxId};

use crate::error::WorkflowError;
use crate::session::SessionContext;

/// Outcome of one graded exam sitting, with the ledger write receipt.
#[derive(Clone, Debug)]
pub struct ExamSitting {
    pub verdict: Verdict,
    pub tx_id: TxId,
}

/// Administers exam sittings for enrolled students and records outcomes on
/// the ledger.
pub struct ExamService {
    ledger: Arc<dyn LedgerClient>,
    engine: Arc<ExamEngine>,
}

impl ExamService {
    pub fn new(ledger: Arc<dyn LedgerClient>, engine: Arc<ExamEngine>) -> Self {
        Self { ledger, engine }
    }

    /// Open an exam sitting: hand out the course's fixed question bank.
    ///
    /// Only enrolled students who have not already passed may sit.
    pub async fn begin(
        &self,
        session: &mut SessionContext,
        course_id: CourseId,
    ) -> Result<&QuestionBank, WorkflowError> {
        self.ensure_may_sit(session, course_id).await?;
        let course = self.ledger.course(course_id).await?;
        let bank = self.engine.administer(&course.exam_id)?;
        session.begin_exam(course_id);
        debug!(course = %course_id, exam = %course.exam_id, "exam sitting opened");
        Ok(bank)
    }

    /// Grade a completed attempt and record the outcome on the ledger.
    ///
    /// Grading itself is pure and deterministic; only the result write
    /// crosses the system boundary. A failed sitting may be retried later
    /// — the ledger overwrites a failing result and locks a passing one.
    pub async fn submit(
        &self,
        session: &mut SessionContext,
        attempt: &ExamAttempt,
    ) -> Result<ExamSitting, WorkflowError> {
        let course_id = attempt.course_id;
        self.ensure_may_sit(session, course_id).await?;

        let course = self.ledger.course(course_id).await?;
        let verdict = self.engine.grade(&course.exam_id, attempt)?;

        let tx_id = self
            .ledger
            .record_exam_result(RecordExamResult {
                course_id,
                passed: verdict.passed,
                from: session.actor.clone(),
            })
            .await
            .map_err(WorkflowError::from_write)?;

        session.end_exam(course_id);
        info!(
            course = %course_id,
            student = %session.actor,
            passed = verdict.passed,
            tx = %tx_id,
            "exam graded and recorded"
        );

        Ok(ExamSitting { verdict, tx_id })
    }

    /// A pass is terminal for the pair: the sitting may not be reopened.
    async fn ensure_may_sit(
        &self,
        session: &SessionContext,
        course_id: CourseId,
    ) -> Result<(), WorkflowError> {
        let enrolled = session.is_enrolled_locally(course_id)
            || self
                .ledger
                .enrollments_of(&session.actor)
                .await?
                .iter()
                .any(|enrollment| enrollment.course_id == course_id);
        if !enrolled {
            return Err(WorkflowError::NotEnrolled);
        }

        let result = self.ledger.exam_result(course_id, &session.actor).await?;
        if result.passed {
            return Err(WorkflowError::Validation(
                "exam is already passed and cannot be retaken".to_string(),
            ));
        }
        Ok(())
    }
}
