use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::Wei;
use crate::ids::{Address, CourseId};
use crate::records::ExamStatus;

/// Date rendering used throughout certificate metadata.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The certificate metadata document.
///
/// This is a value object, not a ledger entity: it is serialized, pinned to
/// the content store, and only the resulting content id is written on-chain.
/// Serialization is canonical (fixed field order), so a retried issuance
/// produces byte-identical documents and pins to the same content id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateMetadata {
    pub certificate_id: String,
    pub course_title: String,
    pub course_fee: String,
    pub instructor_address: String,
    pub student_name: String,
    pub student_address: String,
    pub enrollment_date: String,
    pub exam_status: String,
    pub completion_date: String,
}

impl CertificateMetadata {
    /// Assemble the document from resolved workflow state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        certificate_id: CourseId,
        course_title: &str,
        course_fee: Wei,
        instructor: &Address,
        student_name: &str,
        student: &Address,
        enrollment_date: NaiveDate,
        exam_status: ExamStatus,
        completion_date: NaiveDate,
    ) -> Self {
        Self {
            certificate_id: certificate_id.to_string(),
            course_title: course_title.to_string(),
            course_fee: course_fee.format_ether(),
            instructor_address: instructor.to_string(),
            student_name: student_name.to_string(),
            student_address: student.to_string(),
            enrollment_date: enrollment_date.format(DATE_FORMAT).to_string(),
            exam_status: exam_status.label().to_string(),
            completion_date: completion_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Canonical bytes for pinning.
    ///
    /// serde_json preserves struct field order, which is what makes repeated
    /// pins of the same document land on the same content id.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("metadata document serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CertificateMetadata {
        CertificateMetadata::new(
            CourseId(2),
            "Machine Learning",
            Wei::from_ether_str("0.05").unwrap(),
            &Address::new("0xinstructor"),
            "Ada Lovelace",
            &Address::new("0xstudent"),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ExamStatus::Passed,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    #[test]
    fn wire_field_names_are_stable() {
        let doc = sample();
        let value: serde_json::Value = serde_json::from_slice(&doc.canonical_bytes()).unwrap();
        assert_eq!(value["certificate_id"], "2");
        assert_eq!(value["course_fee"], "0.05");
        assert_eq!(value["exam_status"], "Passed");
        assert_eq!(value["enrollment_date"], "2024-01-10");
        assert_eq!(value["completion_date"], "2024-02-01");
    }

    #[test]
    fn canonical_bytes_are_deterministic() {
        assert_eq!(sample().canonical_bytes(), sample().canonical_bytes());
    }
}
