use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use skillforge_content::ContentStore;
use skillforge_exam::ExamEngine;
use skillforge_ledger::{CreateCourse, LedgerClient, LedgerError};
use skillforge_types::{Address, ExamId, TxId, Wei};

use crate::catalog::CourseCatalog;
use crate::error::WorkflowError;

/// Course creation command, carrying the raw artifacts to pin.
#[derive(Clone, Debug)]
pub struct CreateCourseRequest {
    pub title: String,
    pub instructor: Address,
    pub material: Vec<u8>,
    pub certificate_image: Vec<u8>,
    pub exam_id: ExamId,
    /// Fee in the display unit, as entered ("0.05").
    pub fee_ether: String,
    pub acting: Address,
}

/// Receipt for a created course.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseReceipt {
    pub tx_id: TxId,
}

/// Admin-side course creation.
///
/// Same pin-then-write ordering as the issuance saga: both artifacts are
/// pinned before the ledger learns about the course, so a failed create
/// leaves at worst inert pinned content and never a course that references
/// missing material.
pub struct CourseAdmin {
    ledger: Arc<dyn LedgerClient>,
    content: Arc<dyn ContentStore>,
    engine: Arc<ExamEngine>,
    catalog: CourseCatalog,
}

impl CourseAdmin {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        content: Arc<dyn ContentStore>,
        engine: Arc<ExamEngine>,
    ) -> Self {
        let catalog = CourseCatalog::new(ledger.clone());
        Self {
            ledger,
            content,
            engine,
            catalog,
        }
    }

    pub async fn create_course(
        &self,
        request: CreateCourseRequest,
    ) -> Result<CourseReceipt, WorkflowError> {
        if request.acting != self.ledger.owner().await? {
            return Err(WorkflowError::Unauthorized(
                "only the platform owner may create courses".to_string(),
            ));
        }

        if request.title.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "course title must not be empty".to_string(),
            ));
        }
        if request.material.is_empty() || request.certificate_image.is_empty() {
            return Err(WorkflowError::Validation(
                "course material and certificate image are required".to_string(),
            ));
        }
        let fee = Wei::from_ether_str(&request.fee_ether)?;

        // Every course is examined against a fixed bank, and the course is
        // findable by the bank's title, so the two must agree.
        let bank = self.engine.administer(&request.exam_id)?;
        if bank.title != request.title {
            return Err(WorkflowError::Validation(format!(
                "course title '{}' must match exam title '{}'",
                request.title, bank.title
            )));
        }

        if self.catalog.is_duplicate_title(&request.title).await? {
            return Err(WorkflowError::Validation(format!(
                "a course titled '{}' already exists",
                request.title
            )));
        }

        let material_content_id = self
            .content
            .pin(&request.material)
            .await
            .map_err(WorkflowError::PinningFailed)?;
        let certificate_image_content_id = self
            .content
            .pin(&request.certificate_image)
            .await
            .map_err(WorkflowError::PinningFailed)?;

        let tx_id = self
            .ledger
            .create_course(CreateCourse {
                title: request.title.clone(),
                instructor: request.instructor,
                material_content_id,
                exam_id: request.exam_id,
                certificate_image_content_id,
                fee,
                from: request.acting,
            })
            .await
            .map_err(|err| {
                warn!(title = %request.title, %err, "course creation write failed");
                match err {
                    // A racing creation with the same title lost the
                    // duplicate check at the ledger.
                    LedgerError::DuplicateTitle => WorkflowError::Validation(format!(
                        "a course titled '{}' already exists",
                        request.title
                    )),
                    other => WorkflowError::from_write(other),
                }
            })?;

        info!(title = %request.title, tx = %tx_id, "course created");
        Ok(CourseReceipt { tx_id })
    }
}
