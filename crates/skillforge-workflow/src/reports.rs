use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use skillforge_ledger::LedgerClient;
use skillforge_types::{Address, ContentId, CourseId, ExamResult, ExamStatus};

use crate::catalog::CourseCatalog;
use crate::error::WorkflowError;

/// One row of the instructor/owner enrollment report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentReportRow {
    pub course_id: CourseId,
    pub course_title: String,
    pub student: Address,
    pub student_name: String,
    pub enrolled_on: NaiveDate,
    pub exam_status: ExamStatus,
    /// `None` renders as "Not Completed".
    pub completed_on: Option<NaiveDate>,
}

/// A certificate as listed for its owning student.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCertificate {
    pub course_id: CourseId,
    pub course_title: String,
    pub image_content_id: ContentId,
    pub metadata_content_id: ContentId,
    pub completed_on: NaiveDate,
}

/// Read-side reporting for instructors, owners, and students.
pub struct ReportingService {
    ledger: Arc<dyn LedgerClient>,
    catalog: CourseCatalog,
}

impl ReportingService {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        let catalog = CourseCatalog::new(ledger.clone());
        Self { ledger, catalog }
    }

    /// Full enrollment report across all students and courses.
    ///
    /// Restricted to the platform owner and to addresses instructing at
    /// least one course.
    pub async fn enrollment_report(
        &self,
        acting: &Address,
    ) -> Result<Vec<EnrollmentReportRow>, WorkflowError> {
        self.ensure_instructor_or_owner(acting).await?;

        let mut rows = Vec::new();
        for student in self.ledger.student_addresses().await? {
            for enrollment in self.ledger.enrollments_of(&student).await? {
                let course = self.ledger.course(enrollment.course_id).await?;
                let exam = self
                    .ledger
                    .exam_result(enrollment.course_id, &student)
                    .await?;
                let completed_on = self
                    .ledger
                    .completion_date(enrollment.course_id, &student)
                    .await?
                    .map(|at| at.date_naive());

                rows.push(EnrollmentReportRow {
                    course_id: course.id,
                    course_title: course.title,
                    student: student.clone(),
                    student_name: enrollment.student_name,
                    enrolled_on: enrollment.enrolled_at.date_naive(),
                    exam_status: exam.status(),
                    completed_on,
                });
            }
        }
        Ok(rows)
    }

    /// Latest exam result for one student in one course, named by title.
    ///
    /// Owner or that course's instructor only; the student must be
    /// enrolled.
    pub async fn exam_result_for(
        &self,
        acting: &Address,
        course_title: &str,
        student: &Address,
    ) -> Result<ExamResult, WorkflowError> {
        let course = self
            .catalog
            .find_by_title(course_title)
            .await?
            .ok_or_else(|| {
                WorkflowError::Validation(format!("no course titled '{}'", course_title))
            })?;

        let owner = self.ledger.owner().await?;
        if *acting != owner && *acting != course.instructor {
            return Err(WorkflowError::Unauthorized(
                "only the owner or the course instructor may view exam results".to_string(),
            ));
        }

        let enrolled = self
            .ledger
            .enrollments_of(student)
            .await?
            .iter()
            .any(|enrollment| enrollment.course_id == course.id);
        if !enrolled {
            return Err(WorkflowError::NotEnrolled);
        }

        Ok(self.ledger.exam_result(course.id, student).await?)
    }

    /// All certificates owned by a student, resolved through the token
    /// index.
    pub async fn certificates_of(
        &self,
        student: &Address,
    ) -> Result<Vec<IssuedCertificate>, WorkflowError> {
        let count = self.ledger.balance_of(student).await?;
        let mut certificates = Vec::with_capacity(count as usize);
        for index in 0..count {
            let token_id = self.ledger.token_of_owner_by_index(student, index).await?;
            let certificate = self.ledger.certificate(token_id).await?;
            let course = self.ledger.course(token_id).await?;
            certificates.push(IssuedCertificate {
                course_id: token_id,
                course_title: course.title,
                image_content_id: course.certificate_image_content_id,
                metadata_content_id: certificate.metadata_content_id,
                completed_on: certificate.completed_at.date_naive(),
            });
        }
        Ok(certificates)
    }

    async fn ensure_instructor_or_owner(&self, acting: &Address) -> Result<(), WorkflowError> {
        if *acting == self.ledger.owner().await? {
            return Ok(());
        }
        let instructs = self
            .catalog
            .list_courses()
            .await?
            .iter()
            .any(|course| course.instructor == *acting);
        if instructs {
            return Ok(());
        }
        Err(WorkflowError::Unauthorized(
            "only the owner or an instructor may view enrollments".to_string(),
        ))
    }
}
