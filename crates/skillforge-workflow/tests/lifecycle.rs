//! End-to-end lifecycle scenarios: enrollment, exam, issuance, and the
//! failure modes of the cross-system saga.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use skillforge_content::{ContentError, ContentStore, InMemoryContentStore};
use skillforge_exam::{ExamAttempt, ExamEngine, QuestionBank};
use skillforge_ledger::{InMemoryLedger, LedgerClient};
use skillforge_types::{Address, ContentId, CourseId, ExamId, Wei};
use skillforge_workflow::{
    CertificateIssuanceSaga, CourseAdmin, CreateCourseRequest, EnrollmentService, ExamService,
    IssueRequest, ReportingService, SessionContext, WorkflowError,
};

/// Content store that fails a configured number of pins before recovering.
struct FlakyContentStore {
    inner: InMemoryContentStore,
    failures_left: AtomicUsize,
}

impl FlakyContentStore {
    fn failing(failures: usize) -> Self {
        Self {
            inner: InMemoryContentStore::new(),
            failures_left: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl ContentStore for FlakyContentStore {
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, ContentError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(ContentError::Transport("pinning service unreachable".into()));
        }
        self.inner.pin(bytes).await
    }
}

struct Platform {
    ledger: Arc<InMemoryLedger>,
    content: Arc<InMemoryContentStore>,
    enrollment: EnrollmentService,
    exams: ExamService,
    saga: CertificateIssuanceSaga,
    reports: ReportingService,
}

fn owner() -> Address {
    Address::new("0xowner")
}

fn instructor() -> Address {
    Address::new("0xinstructor")
}

fn student() -> Address {
    Address::new("0xstudent")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A platform with the three built-in courses created and the student
/// funded with 1 ether.
async fn platform() -> Platform {
    init_tracing();
    let ledger = Arc::new(InMemoryLedger::new(owner()));
    let content = Arc::new(InMemoryContentStore::new());
    let engine = Arc::new(ExamEngine::builtin());

    let admin = CourseAdmin::new(ledger.clone(), content.clone(), engine.clone());
    for (title, exam_id, fee) in [
        ("Introduction to Python", "introduction-to-python", "0.02"),
        ("Machine Learning", "machine-learning", "0.03"),
        ("Blockchain & Web3", "blockchain-web3", "0.05"),
    ] {
        admin
            .create_course(CreateCourseRequest {
                title: title.into(),
                instructor: instructor(),
                material: format!("{} material", title).into_bytes(),
                certificate_image: format!("{} certificate", title).into_bytes(),
                exam_id: ExamId::new(exam_id),
                fee_ether: fee.into(),
                acting: owner(),
            })
            .await
            .unwrap();
    }

    ledger
        .credit(student(), Wei::from_ether_str("1").unwrap())
        .await;

    Platform {
        enrollment: EnrollmentService::new(ledger.clone()),
        exams: ExamService::new(ledger.clone(), engine.clone()),
        saga: CertificateIssuanceSaga::new(ledger.clone(), content.clone()),
        reports: ReportingService::new(ledger.clone()),
        ledger,
        content,
    }
}

fn answers(bank: &QuestionBank, wrong: usize) -> ExamAttempt {
    let mut attempt = ExamAttempt::new(CourseId(2), student());
    for (index, question) in bank.questions.iter().enumerate() {
        let selected = if index < wrong {
            (question.correct + 1) % question.options.len()
        } else {
            question.correct
        };
        attempt.answer(question.id, selected);
    }
    attempt
}

#[tokio::test]
async fn full_lifecycle_enroll_pass_self_issue() {
    let platform = platform().await;
    let mut session = SessionContext::new(student());

    // Enroll in course 2 (fee 0.05, balance 1.0).
    let receipt = platform
        .enrollment
        .enroll(&mut session, CourseId(2), "Ada Lovelace")
        .await
        .unwrap();
    assert_eq!(receipt.course_id, CourseId(2));
    assert_eq!(
        platform.ledger.funds_of(&student()).await.unwrap(),
        Wei::from_ether_str("0.95").unwrap()
    );

    // Score 10/10 on the fixed bank.
    let bank = platform
        .exams
        .begin(&mut session, CourseId(2))
        .await
        .unwrap()
        .clone();
    assert_eq!(bank.len(), 10);
    let sitting = platform
        .exams
        .submit(&mut session, &answers(&bank, 0))
        .await
        .unwrap();
    assert!(sitting.verdict.passed);

    // Self-service issuance by the student's own address.
    let receipt = platform
        .saga
        .issue(&IssueRequest {
            course_id: CourseId(2),
            student: student(),
            student_name: "Ada Lovelace".into(),
            acting: student(),
            session_verdict: Some(sitting.verdict),
        })
        .await
        .unwrap();
    assert!(!receipt.tx_id.0.is_empty());
    assert_eq!(receipt.completed_on, Utc::now().date_naive());
    assert!(platform
        .content
        .get(&receipt.metadata_content_id)
        .await
        .is_some());

    // Exactly one certificate, completed today.
    let certificates = platform.reports.certificates_of(&student()).await.unwrap();
    assert_eq!(certificates.len(), 1);
    assert_eq!(certificates[0].course_title, "Blockchain & Web3");
    assert_eq!(certificates[0].completed_on, Utc::now().date_naive());
    assert_eq!(
        certificates[0].metadata_content_id,
        receipt.metadata_content_id
    );
    assert_eq!(platform.ledger.completion_records(CourseId(2)).await, 1);
}

#[tokio::test]
async fn eight_of_ten_cannot_issue() {
    let platform = platform().await;
    let mut session = SessionContext::new(student());
    platform
        .enrollment
        .enroll(&mut session, CourseId(2), "Ada")
        .await
        .unwrap();

    let bank = platform
        .exams
        .begin(&mut session, CourseId(2))
        .await
        .unwrap()
        .clone();
    let sitting = platform
        .exams
        .submit(&mut session, &answers(&bank, 2))
        .await
        .unwrap();
    assert!(!sitting.verdict.passed);

    let blobs_before = platform.content.blob_count().await;
    let result = platform
        .saga
        .issue(&IssueRequest {
            course_id: CourseId(2),
            student: student(),
            student_name: "Ada".into(),
            acting: student(),
            session_verdict: Some(sitting.verdict),
        })
        .await;
    assert!(matches!(result, Err(WorkflowError::ExamNotPassed)));

    // No pin and no ledger write happened.
    assert_eq!(platform.content.blob_count().await, blobs_before);
    assert_eq!(platform.ledger.completion_records(CourseId(2)).await, 0);
}

#[tokio::test]
async fn instructor_cannot_issue_for_unenrolled_student() {
    let platform = platform().await;

    let result = platform
        .saga
        .issue(&IssueRequest {
            course_id: CourseId(2),
            student: Address::new("0xghost"),
            student_name: "Ghost".into(),
            acting: instructor(),
            session_verdict: None,
        })
        .await;
    assert!(matches!(result, Err(WorkflowError::NotEnrolled)));
    assert_eq!(platform.ledger.completion_records(CourseId(2)).await, 0);
}

#[tokio::test]
async fn instructor_issues_after_student_passes() {
    let platform = platform().await;
    let mut session = SessionContext::new(student());
    platform
        .enrollment
        .enroll(&mut session, CourseId(2), "Ada")
        .await
        .unwrap();
    let bank = platform
        .exams
        .begin(&mut session, CourseId(2))
        .await
        .unwrap()
        .clone();
    platform
        .exams
        .submit(&mut session, &answers(&bank, 0))
        .await
        .unwrap();

    // Instructor triggers issuance from their own session, no verdict.
    let receipt = platform
        .saga
        .issue(&IssueRequest {
            course_id: CourseId(2),
            student: student(),
            // Blank name: the enrollment record supplies it.
            student_name: String::new(),
            acting: instructor(),
            session_verdict: None,
        })
        .await
        .unwrap();

    let metadata = platform
        .content
        .get(&receipt.metadata_content_id)
        .await
        .unwrap();
    let document: serde_json::Value = serde_json::from_slice(&metadata).unwrap();
    assert_eq!(document["student_name"], "Ada");
    assert_eq!(document["course_title"], "Blockchain & Web3");
    assert_eq!(document["course_fee"], "0.05");
    assert_eq!(document["exam_status"], "Passed");
}

#[tokio::test]
async fn second_issue_reports_already_completed() {
    let platform = platform().await;
    let mut session = SessionContext::new(student());
    platform
        .enrollment
        .enroll(&mut session, CourseId(2), "Ada")
        .await
        .unwrap();
    let bank = platform
        .exams
        .begin(&mut session, CourseId(2))
        .await
        .unwrap()
        .clone();
    let sitting = platform
        .exams
        .submit(&mut session, &answers(&bank, 0))
        .await
        .unwrap();

    let request = IssueRequest {
        course_id: CourseId(2),
        student: student(),
        student_name: "Ada".into(),
        acting: student(),
        session_verdict: Some(sitting.verdict),
    };
    platform.saga.issue(&request).await.unwrap();

    let second = platform.saga.issue(&request).await;
    assert!(matches!(second, Err(WorkflowError::AlreadyCompleted)));
    assert_eq!(platform.ledger.completion_records(CourseId(2)).await, 1);
}

#[tokio::test]
async fn pin_failure_is_recoverable_and_leaves_no_ledger_state() {
    let ledger = Arc::new(InMemoryLedger::new(owner()));
    let engine = Arc::new(ExamEngine::builtin());
    let flaky = Arc::new(FlakyContentStore::failing(1));

    let admin = CourseAdmin::new(
        ledger.clone(),
        Arc::new(InMemoryContentStore::new()),
        engine.clone(),
    );
    admin
        .create_course(CreateCourseRequest {
            title: "Machine Learning".into(),
            instructor: instructor(),
            material: b"material".to_vec(),
            certificate_image: b"image".to_vec(),
            exam_id: ExamId::new("machine-learning"),
            fee_ether: "0".into(),
            acting: owner(),
        })
        .await
        .unwrap();

    let enrollment = EnrollmentService::new(ledger.clone());
    let exams = ExamService::new(ledger.clone(), engine.clone());
    let saga = CertificateIssuanceSaga::new(ledger.clone(), flaky.clone());

    let mut session = SessionContext::new(student());
    enrollment
        .enroll(&mut session, CourseId(0), "Ada")
        .await
        .unwrap();
    let bank = exams.begin(&mut session, CourseId(0)).await.unwrap().clone();
    let mut attempt = ExamAttempt::new(CourseId(0), student());
    for question in &bank.questions {
        attempt.answer(question.id, question.correct);
    }
    let sitting = exams.submit(&mut session, &attempt).await.unwrap();

    let request = IssueRequest {
        course_id: CourseId(0),
        student: student(),
        student_name: "Ada".into(),
        acting: student(),
        session_verdict: Some(sitting.verdict),
    };

    // First attempt: the pin fails, and no ledger write happens.
    let failed = saga.issue(&request).await;
    assert!(matches!(failed, Err(WorkflowError::PinningFailed(_))));
    assert_eq!(ledger.completion_records(CourseId(0)).await, 0);
    assert!(ledger
        .completion_date(CourseId(0), &student())
        .await
        .unwrap()
        .is_none());

    // Retry with identical inputs: succeeds, one metadata blob, one
    // completion record.
    let receipt = saga.issue(&request).await.unwrap();
    assert_eq!(ledger.completion_records(CourseId(0)).await, 1);
    assert_eq!(flaky.inner.blob_count().await, 1);
    assert!(flaky.inner.get(&receipt.metadata_content_id).await.is_some());
}

#[tokio::test]
async fn enrollment_report_reflects_lifecycle_state() {
    let platform = platform().await;
    let mut session = SessionContext::new(student());
    platform
        .enrollment
        .enroll(&mut session, CourseId(1), "Ada")
        .await
        .unwrap();

    let rows = platform.reports.enrollment_report(&owner()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].course_title, "Machine Learning");
    assert_eq!(rows[0].completed_on, None);

    let denied = platform.reports.enrollment_report(&student()).await;
    assert!(matches!(denied, Err(WorkflowError::Unauthorized(_))));
}
