use std::sync::Arc;

use skillforge_ledger::LedgerClient;
use skillforge_types::{Address, Course, CourseId, Enrollment};

use crate::error::WorkflowError;

/// Read-side projection of the course ledger.
///
/// All reads pass straight through to the ledger: courses can be created
/// concurrently by other actors, so nothing is cached beyond the lifetime
/// of one call.
pub struct CourseCatalog {
    ledger: Arc<dyn LedgerClient>,
}

impl CourseCatalog {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, WorkflowError> {
        let count = self.ledger.course_count().await?;
        let mut courses = Vec::with_capacity(count as usize);
        for id in 0..count {
            courses.push(self.ledger.course(CourseId(id)).await?);
        }
        Ok(courses)
    }

    /// Resolve a course by exact title.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Course>, WorkflowError> {
        Ok(self
            .list_courses()
            .await?
            .into_iter()
            .find(|course| course.title == title))
    }

    /// True iff a course with exactly this title already exists. Used by
    /// course creation to enforce title uniqueness before writing.
    pub async fn is_duplicate_title(&self, title: &str) -> Result<bool, WorkflowError> {
        Ok(self.find_by_title(title).await?.is_some())
    }

    /// Resolve a student's enrollment in a course named by title.
    pub async fn find_enrollment(
        &self,
        student: &Address,
        course_title: &str,
    ) -> Result<Option<Enrollment>, WorkflowError> {
        let Some(course) = self.find_by_title(course_title).await? else {
            return Ok(None);
        };
        Ok(self
            .ledger
            .enrollments_of(student)
            .await?
            .into_iter()
            .find(|enrollment| enrollment.course_id == course.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillforge_ledger::{CreateCourse, EnrollInCourse, InMemoryLedger};
    use skillforge_types::{ContentId, ExamId, Wei};

    fn owner() -> Address {
        Address::new("0xowner")
    }

    async fn create(ledger: &InMemoryLedger, title: &str) {
        ledger
            .create_course(CreateCourse {
                title: title.into(),
                instructor: Address::new("0xinstructor"),
                material_content_id: ContentId::new(format!("Qm{}", title.len())),
                exam_id: ExamId::new("machine-learning"),
                certificate_image_content_id: ContentId::new("QmImage"),
                fee: Wei::ZERO,
                from: owner(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_title_iff_exact_match_exists() {
        let ledger = Arc::new(InMemoryLedger::new(owner()));
        create(&ledger, "Machine Learning").await;

        let catalog = CourseCatalog::new(ledger);
        assert!(catalog.is_duplicate_title("Machine Learning").await.unwrap());
        assert!(!catalog.is_duplicate_title("machine learning").await.unwrap());
        assert!(!catalog.is_duplicate_title("Machine Learning ").await.unwrap());
        assert!(!catalog.is_duplicate_title("Quantum Basket Weaving").await.unwrap());
    }

    #[tokio::test]
    async fn listing_preserves_ledger_order() {
        let ledger = Arc::new(InMemoryLedger::new(owner()));
        create(&ledger, "Introduction to Python").await;
        create(&ledger, "Machine Learning").await;

        let catalog = CourseCatalog::new(ledger);
        let titles: Vec<_> = catalog
            .list_courses()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Introduction to Python", "Machine Learning"]);
    }

    #[tokio::test]
    async fn find_enrollment_joins_title_to_ledger_record() {
        let ledger = Arc::new(InMemoryLedger::new(owner()));
        create(&ledger, "Machine Learning").await;
        let student = Address::new("0xstudent");
        ledger
            .enroll_in_course(EnrollInCourse {
                course_id: CourseId(0),
                student_name: "Ada".into(),
                from: student.clone(),
                value: Wei::ZERO,
            })
            .await
            .unwrap();

        let catalog = CourseCatalog::new(ledger);
        let enrollment = catalog
            .find_enrollment(&student, "Machine Learning")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.student_name, "Ada");

        assert!(catalog
            .find_enrollment(&student, "Introduction to Python")
            .await
            .unwrap()
            .is_none());
    }
}
