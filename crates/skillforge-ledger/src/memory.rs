use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use skillforge_types::{
    Address, Certificate, ContentId, Course, CourseId, Enrollment, ExamResult, TxId, Wei,
};

use crate::client::{CreateCourse, EnrollInCourse, LedgerClient, MarkCompletion, RecordExamResult};
use crate::error::LedgerError;

/// One entry in the write audit log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditEntry {
    pub tx_id: TxId,
    pub action: String,
}

#[derive(Clone, Debug)]
struct ExamRecord {
    passed: bool,
    recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
struct TokenRecord {
    owner: Address,
    metadata_content_id: ContentId,
    completed_at: DateTime<Utc>,
}

#[derive(Default)]
struct LedgerState {
    courses: Vec<Course>,
    enrollments: HashMap<Address, Vec<Enrollment>>,
    exam_results: HashMap<(CourseId, Address), ExamRecord>,
    completions: HashMap<(CourseId, Address), DateTime<Utc>>,
    tokens: HashMap<CourseId, TokenRecord>,
    owner_index: HashMap<Address, Vec<CourseId>>,
    funds: HashMap<Address, Wei>,
    students: BTreeSet<Address>,
    audit: Vec<AuditEntry>,
    tx_counter: u64,
}

impl LedgerState {
    fn next_tx(&mut self, action: String) -> TxId {
        self.tx_counter += 1;
        let tx_id = TxId(format!("0x{:064x}", self.tx_counter));
        self.audit.push(AuditEntry {
            tx_id: tx_id.clone(),
            action,
        });
        tx_id
    }

    fn course(&self, id: CourseId) -> Result<&Course, LedgerError> {
        self.courses
            .get(usize::try_from(id.0).map_err(|_| LedgerError::CourseNotFound(id.0))?)
            .ok_or(LedgerError::CourseNotFound(id.0))
    }

    fn enrollment(&self, course_id: CourseId, student: &Address) -> Option<&Enrollment> {
        self.enrollments
            .get(student)
            .and_then(|list| list.iter().find(|e| e.course_id == course_id))
    }
}

/// In-memory ledger with the contract's semantics, used for tests, local
/// demos, and embedding.
///
/// Writes are serialized behind a single lock, which makes this
/// implementation the arbiter the workflow relies on: of two racing
/// enrollments or completion writes for the same (course, student) pair,
/// exactly one succeeds and the loser observes the precondition failure.
pub struct InMemoryLedger {
    owner: Address,
    inner: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Seed a spendable balance for an account.
    pub async fn credit(&self, account: Address, amount: Wei) {
        let mut state = self.inner.write().await;
        let balance = state.funds.entry(account).or_insert(Wei::ZERO);
        *balance = balance
            .checked_add(amount)
            .expect("seeded balance overflows");
    }

    /// Snapshot of the write audit log.
    pub async fn audit_log(&self) -> Vec<AuditEntry> {
        self.inner.read().await.audit.clone()
    }

    /// Number of completion writes accepted for a course, across all
    /// students. Test observability for the at-most-once invariant.
    pub async fn completion_records(&self, course_id: CourseId) -> usize {
        let state = self.inner.read().await;
        state
            .completions
            .keys()
            .filter(|(course, _)| *course == course_id)
            .count()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn course_count(&self) -> Result<u64, LedgerError> {
        Ok(self.inner.read().await.courses.len() as u64)
    }

    async fn course(&self, id: CourseId) -> Result<Course, LedgerError> {
        self.inner.read().await.course(id).cloned()
    }

    async fn owner(&self) -> Result<Address, LedgerError> {
        Ok(self.owner.clone())
    }

    async fn exam_result(
        &self,
        course_id: CourseId,
        student: &Address,
    ) -> Result<ExamResult, LedgerError> {
        let state = self.inner.read().await;
        state.course(course_id)?;
        Ok(
            match state.exam_results.get(&(course_id, student.clone())) {
                Some(record) => ExamResult {
                    course_id,
                    student: student.clone(),
                    passed: record.passed,
                    recorded_at: Some(record.recorded_at),
                },
                None => ExamResult::not_attempted(course_id, student.clone()),
            },
        )
    }

    async fn enrollments_of(&self, student: &Address) -> Result<Vec<Enrollment>, LedgerError> {
        Ok(self
            .inner
            .read()
            .await
            .enrollments
            .get(student)
            .cloned()
            .unwrap_or_default())
    }

    async fn enrollment_date(
        &self,
        course_id: CourseId,
        student: &Address,
    ) -> Result<Option<DateTime<Utc>>, LedgerError> {
        let state = self.inner.read().await;
        state.course(course_id)?;
        Ok(state
            .enrollment(course_id, student)
            .map(|e| e.enrolled_at))
    }

    async fn completion_date(
        &self,
        course_id: CourseId,
        student: &Address,
    ) -> Result<Option<DateTime<Utc>>, LedgerError> {
        let state = self.inner.read().await;
        state.course(course_id)?;
        Ok(state.completions.get(&(course_id, student.clone())).copied())
    }

    async fn certificate(&self, token_id: CourseId) -> Result<Certificate, LedgerError> {
        let state = self.inner.read().await;
        let record = state
            .tokens
            .get(&token_id)
            .ok_or(LedgerError::CertificateNotFound(token_id.0))?;
        Ok(Certificate {
            token_id,
            metadata_content_id: record.metadata_content_id.clone(),
            completed_at: record.completed_at,
        })
    }

    async fn balance_of(&self, holder: &Address) -> Result<u64, LedgerError> {
        Ok(self
            .inner
            .read()
            .await
            .owner_index
            .get(holder)
            .map(|tokens| tokens.len() as u64)
            .unwrap_or(0))
    }

    async fn token_of_owner_by_index(
        &self,
        holder: &Address,
        index: u64,
    ) -> Result<CourseId, LedgerError> {
        let state = self.inner.read().await;
        state
            .owner_index
            .get(holder)
            .and_then(|tokens| tokens.get(index as usize))
            .copied()
            .ok_or(LedgerError::CertificateNotFound(index))
    }

    async fn funds_of(&self, account: &Address) -> Result<Wei, LedgerError> {
        Ok(self
            .inner
            .read()
            .await
            .funds
            .get(account)
            .copied()
            .unwrap_or(Wei::ZERO))
    }

    async fn student_addresses(&self) -> Result<Vec<Address>, LedgerError> {
        Ok(self.inner.read().await.students.iter().cloned().collect())
    }

    async fn create_course(&self, cmd: CreateCourse) -> Result<TxId, LedgerError> {
        let mut state = self.inner.write().await;
        if cmd.from != self.owner {
            return Err(LedgerError::WriteRejected(
                "caller is not the platform owner".into(),
            ));
        }
        if state.courses.iter().any(|c| c.title == cmd.title) {
            return Err(LedgerError::DuplicateTitle);
        }

        let id = CourseId(state.courses.len() as u64);
        state.courses.push(Course {
            id,
            title: cmd.title.clone(),
            instructor: cmd.instructor,
            material_content_id: cmd.material_content_id,
            exam_id: cmd.exam_id,
            certificate_image_content_id: cmd.certificate_image_content_id,
            fee: cmd.fee,
        });
        info!(course = %id, title = %cmd.title, "course created");
        Ok(state.next_tx(format!("createCourse({})", id)))
    }

    async fn enroll_in_course(&self, cmd: EnrollInCourse) -> Result<TxId, LedgerError> {
        let mut state = self.inner.write().await;
        let course = state.course(cmd.course_id)?.clone();

        if state.enrollment(cmd.course_id, &cmd.from).is_some() {
            return Err(LedgerError::AlreadyEnrolled(cmd.course_id.0));
        }
        if cmd.value < course.fee {
            return Err(LedgerError::InsufficientValue);
        }
        let balance = state
            .funds
            .get(&cmd.from)
            .copied()
            .unwrap_or(Wei::ZERO);
        let debited = balance
            .checked_sub(cmd.value)
            .ok_or(LedgerError::InsufficientValue)?;

        // Payment and enrollment record commit together under the lock.
        state.funds.insert(cmd.from.clone(), debited);
        let platform = state.funds.entry(self.owner.clone()).or_insert(Wei::ZERO);
        *platform = platform
            .checked_add(cmd.value)
            .ok_or_else(|| LedgerError::WriteRejected("platform balance overflow".into()))?;

        state
            .enrollments
            .entry(cmd.from.clone())
            .or_default()
            .push(Enrollment {
                course_id: cmd.course_id,
                student: cmd.from.clone(),
                student_name: cmd.student_name,
                enrolled_at: Utc::now(),
            });
        state.students.insert(cmd.from.clone());

        debug!(course = %cmd.course_id, student = %cmd.from, "enrollment recorded");
        Ok(state.next_tx(format!("enrollInCourse({})", cmd.course_id)))
    }

    async fn record_exam_result(&self, cmd: RecordExamResult) -> Result<TxId, LedgerError> {
        let mut state = self.inner.write().await;
        state.course(cmd.course_id)?;
        if state.enrollment(cmd.course_id, &cmd.from).is_none() {
            return Err(LedgerError::NotEnrolled(cmd.course_id.0));
        }

        let key = (cmd.course_id, cmd.from.clone());
        if state.exam_results.get(&key).is_some_and(|r| r.passed) {
            return Err(LedgerError::ResultLocked);
        }
        // A re-attempt overwrites a prior failing result.
        state.exam_results.insert(
            key,
            ExamRecord {
                passed: cmd.passed,
                recorded_at: Utc::now(),
            },
        );

        debug!(course = %cmd.course_id, student = %cmd.from, passed = cmd.passed, "exam result recorded");
        Ok(state.next_tx(format!("recordExamResult({})", cmd.course_id)))
    }

    async fn mark_completion_and_issue_certificate(
        &self,
        cmd: MarkCompletion,
    ) -> Result<TxId, LedgerError> {
        let mut state = self.inner.write().await;
        state.course(cmd.course_id)?;

        if state.enrollment(cmd.course_id, &cmd.student).is_none() {
            return Err(LedgerError::NotEnrolled(cmd.course_id.0));
        }

        let key = (cmd.course_id, cmd.student.clone());
        if state.completions.contains_key(&key) {
            return Err(LedgerError::AlreadyCompleted(cmd.course_id.0));
        }
        if !state.exam_results.get(&key).is_some_and(|r| r.passed) {
            return Err(LedgerError::WriteRejected(
                "exam has not been passed".into(),
            ));
        }
        // Token id equals course id, so the mint is per-course.
        if state.tokens.contains_key(&cmd.course_id) {
            return Err(LedgerError::WriteRejected(format!(
                "certificate token {} is already minted",
                cmd.course_id
            )));
        }

        let now = Utc::now();
        state.completions.insert(key, now);
        state.tokens.insert(
            cmd.course_id,
            TokenRecord {
                owner: cmd.student.clone(),
                metadata_content_id: cmd.metadata_content_id,
                completed_at: now,
            },
        );
        state
            .owner_index
            .entry(cmd.student.clone())
            .or_default()
            .push(cmd.course_id);

        info!(course = %cmd.course_id, student = %cmd.student, "completion marked, certificate issued");
        Ok(state.next_tx(format!("markCompletionAndIssueCertificate({})", cmd.course_id)))
    }
}
