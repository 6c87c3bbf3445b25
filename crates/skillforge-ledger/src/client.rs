use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillforge_types::{
    Address, Certificate, ContentId, Course, CourseId, Enrollment, ExamId, ExamResult, TxId, Wei,
};

use crate::error::LedgerError;

/// Course creation command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub instructor: Address,
    pub material_content_id: ContentId,
    pub exam_id: ExamId,
    pub certificate_image_content_id: ContentId,
    pub fee: Wei,
    /// Submitting account; must hold the platform-owner role on the ledger.
    pub from: Address,
}

/// Payable enrollment command.
///
/// The ledger enforces atomicity of "accept payment + record enrollment":
/// either the attached value is debited and the enrollment recorded, or
/// neither happens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollInCourse {
    pub course_id: CourseId,
    pub student_name: String,
    pub from: Address,
    pub value: Wei,
}

/// Exam outcome write, submitted by the student after grading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordExamResult {
    pub course_id: CourseId,
    pub passed: bool,
    pub from: Address,
}

/// Completion-and-issuance command, the final step of the issuance saga.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkCompletion {
    pub course_id: CourseId,
    pub student: Address,
    pub student_name: String,
    pub metadata_content_id: ContentId,
    pub from: Address,
}

/// Thin typed surface over the external ledger's RPC operations.
///
/// All writes return a transaction identifier usable for audit and receipt
/// display. Implementations are expected to be the final arbiter of
/// conflicting writes: two racing enrollments or completions for the same
/// (course, student) pair must resolve to exactly one success.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    // ── Read surface ────────────────────────────────────────────────

    async fn course_count(&self) -> Result<u64, LedgerError>;

    async fn course(&self, id: CourseId) -> Result<Course, LedgerError>;

    /// Platform owner address.
    async fn owner(&self) -> Result<Address, LedgerError>;

    /// Latest exam result for the pair; never-attempted pairs resolve to
    /// [`ExamResult::not_attempted`] rather than an error.
    async fn exam_result(
        &self,
        course_id: CourseId,
        student: &Address,
    ) -> Result<ExamResult, LedgerError>;

    /// All enrollments held by one student.
    async fn enrollments_of(&self, student: &Address) -> Result<Vec<Enrollment>, LedgerError>;

    async fn enrollment_date(
        &self,
        course_id: CourseId,
        student: &Address,
    ) -> Result<Option<DateTime<Utc>>, LedgerError>;

    /// Completion timestamp for the pair; `None` until the completion write
    /// lands. The ledger's zero-sentinel encoding is decoded here and never
    /// exposed.
    async fn completion_date(
        &self,
        course_id: CourseId,
        student: &Address,
    ) -> Result<Option<DateTime<Utc>>, LedgerError>;

    async fn certificate(&self, token_id: CourseId) -> Result<Certificate, LedgerError>;

    /// Number of certificate tokens held by an address.
    async fn balance_of(&self, holder: &Address) -> Result<u64, LedgerError>;

    async fn token_of_owner_by_index(
        &self,
        holder: &Address,
        index: u64,
    ) -> Result<CourseId, LedgerError>;

    /// Spendable account balance (not certificate tokens).
    async fn funds_of(&self, account: &Address) -> Result<Wei, LedgerError>;

    /// Every address that has ever enrolled in a course.
    async fn student_addresses(&self) -> Result<Vec<Address>, LedgerError>;

    // ── Write surface ───────────────────────────────────────────────

    async fn create_course(&self, cmd: CreateCourse) -> Result<TxId, LedgerError>;

    async fn enroll_in_course(&self, cmd: EnrollInCourse) -> Result<TxId, LedgerError>;

    async fn record_exam_result(&self, cmd: RecordExamResult) -> Result<TxId, LedgerError>;

    async fn mark_completion_and_issue_certificate(
        &self,
        cmd: MarkCompletion,
    ) -> Result<TxId, LedgerError>;
}
