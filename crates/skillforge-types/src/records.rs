use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::Wei;
use crate::ids::{Address, ContentId, CourseId, ExamId};

/// A course as recorded on the ledger.
///
/// Immutable after creation; enrollment and issuance counters live on the
/// ledger side only. The title is unique across the whole platform, which
/// is enforced at creation time by the catalog's duplicate check and again
/// by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub instructor: Address,
    pub material_content_id: ContentId,
    pub exam_id: ExamId,
    pub certificate_image_content_id: ContentId,
    pub fee: Wei,
}

/// One student's enrollment in one course.
///
/// Created exactly once per (course, student) pair; owned by the ledger and
/// read-only to this core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: CourseId,
    pub student: Address,
    pub student_name: String,
    pub enrolled_at: DateTime<Utc>,
}

/// Latest exam outcome for a (course, student) pair.
///
/// `recorded_at == None` means the exam was never attempted. The ledger's
/// zero-timestamp sentinel is decoded to `None` at the client boundary and
/// never leaks past it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    pub course_id: CourseId,
    pub student: Address,
    pub passed: bool,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ExamResult {
    /// A result for a pair that never sat the exam.
    pub fn not_attempted(course_id: CourseId, student: Address) -> Self {
        Self {
            course_id,
            student,
            passed: false,
            recorded_at: None,
        }
    }

    pub fn status(&self) -> ExamStatus {
        match self.recorded_at {
            None => ExamStatus::NotAttempted,
            Some(_) if self.passed => ExamStatus::Passed,
            Some(_) => ExamStatus::Failed,
        }
    }
}

/// Display projection of an exam result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamStatus {
    NotAttempted,
    Passed,
    Failed,
}

impl ExamStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExamStatus::NotAttempted => "Not Attempted",
            ExamStatus::Passed => "Passed",
            ExamStatus::Failed => "Failed",
        }
    }
}

/// An issued certificate token.
///
/// A present `completed_at` marks the course permanently completed for the
/// owning student.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub token_id: CourseId,
    pub metadata_content_id: ContentId,
    pub completed_at: DateTime<Utc>,
}
