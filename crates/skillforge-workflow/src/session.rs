use std::collections::HashSet;

use uuid::Uuid;

use skillforge_types::{Address, CourseId};

/// Per-session workflow state.
///
/// Everything here is ephemeral and scoped to one user session: the
/// enrolled-course cache is a convenience that avoids a ledger round-trip
/// for the common duplicate-enroll case, and exam flags track which banks
/// are open in this session. None of it is authoritative — the ledger is —
/// and none of it is shared across sessions.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub actor: Address,
    enrolled: HashSet<CourseId>,
    taking_exam: HashSet<CourseId>,
}

impl SessionContext {
    pub fn new(actor: Address) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            actor,
            enrolled: HashSet::new(),
            taking_exam: HashSet::new(),
        }
    }

    /// Record a confirmed enrollment. Only called after the ledger write
    /// succeeds, never speculatively.
    pub fn mark_enrolled(&mut self, course_id: CourseId) {
        self.enrolled.insert(course_id);
    }

    pub fn is_enrolled_locally(&self, course_id: CourseId) -> bool {
        self.enrolled.contains(&course_id)
    }

    pub fn begin_exam(&mut self, course_id: CourseId) {
        self.taking_exam.insert(course_id);
    }

    pub fn end_exam(&mut self, course_id: CourseId) {
        self.taking_exam.remove(&course_id);
    }

    pub fn is_taking_exam(&self, course_id: CourseId) -> bool {
        self.taking_exam.contains(&course_id)
    }
}
