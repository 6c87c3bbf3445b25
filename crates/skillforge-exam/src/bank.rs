use serde::{Deserialize, Serialize};

use skillforge_types::{Address, CourseId, ExamId};

/// Position of a question within its bank.
///
/// Question order is fixed: banks are never shuffled, and option order is
/// the stable identity under which the correct-index comparison happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub u16);

/// One multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`; never exposed to the student-facing surface.
    pub correct: usize,
}

/// A fixed, ordered question bank for one exam.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub exam_id: ExamId,
    /// Human-facing title; course creation requires the course title to
    /// match it.
    pub title: String,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(exam_id: ExamId, title: impl Into<String>) -> Self {
        Self {
            exam_id,
            title: title.into(),
            questions: Vec::new(),
        }
    }

    /// Append a question; ids follow insertion order.
    pub fn push(&mut self, prompt: &str, options: &[&str], correct: usize) {
        let id = QuestionId(self.questions.len() as u16);
        self.questions.push(Question {
            id,
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct,
        });
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// One exam sitting. Ephemeral: it exists only for the duration of the
/// session and is never persisted by this core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamAttempt {
    pub course_id: CourseId,
    pub student: Address,
    /// Ordered `(question, selected option index)` pairs.
    pub answers: Vec<(QuestionId, usize)>,
}

impl ExamAttempt {
    pub fn new(course_id: CourseId, student: Address) -> Self {
        Self {
            course_id,
            student,
            answers: Vec::new(),
        }
    }

    pub fn answer(&mut self, question: QuestionId, selected: usize) {
        self.answers.push((question, selected));
    }

    pub fn selected(&self, question: QuestionId) -> Option<usize> {
        self.answers
            .iter()
            .find(|(id, _)| *id == question)
            .map(|(_, selected)| *selected)
    }
}
