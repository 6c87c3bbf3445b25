use std::collections::HashMap;

use thiserror::Error;

use skillforge_types::ExamId;

use crate::bank::{ExamAttempt, QuestionBank, QuestionId};
use crate::builtin::builtin_banks;

/// Grading failures. These mark malformed attempts, not wrong answers: a
/// wrong answer is a failed verdict, never an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExamError {
    #[error("no question bank registered for exam '{0}'")]
    UnknownExam(String),

    #[error("question {0:?} was not answered")]
    MissingAnswer(QuestionId),

    #[error("answer references unknown question {0:?}")]
    UnknownQuestion(QuestionId),

    #[error("selected option {selected} is out of range for question {question:?}")]
    OptionOutOfRange { question: QuestionId, selected: usize },
}

/// Grading outcome for one attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub exam_id: ExamId,
    pub passed: bool,
}

/// Registry of fixed question banks plus the grading rule.
pub struct ExamEngine {
    banks: HashMap<ExamId, QuestionBank>,
}

impl ExamEngine {
    /// An engine with no banks registered.
    pub fn empty() -> Self {
        Self {
            banks: HashMap::new(),
        }
    }

    /// The production engine: preloaded with the platform's built-in banks.
    pub fn builtin() -> Self {
        let mut engine = Self::empty();
        for bank in builtin_banks() {
            engine.register(bank);
        }
        engine
    }

    pub fn register(&mut self, bank: QuestionBank) {
        self.banks.insert(bank.exam_id.clone(), bank);
    }

    /// Hand out the fixed, ordered question bank for one exam sitting.
    pub fn administer(&self, exam_id: &ExamId) -> Result<&QuestionBank, ExamError> {
        self.banks
            .get(exam_id)
            .ok_or_else(|| ExamError::UnknownExam(exam_id.to_string()))
    }

    /// Look up a bank by its human-facing title.
    pub fn bank_by_title(&self, title: &str) -> Option<&QuestionBank> {
        self.banks.values().find(|bank| bank.title == title)
    }

    /// Grade an attempt: passed iff every question is answered and every
    /// selected index equals that question's correct index. No partial
    /// credit.
    pub fn grade(&self, exam_id: &ExamId, attempt: &ExamAttempt) -> Result<Verdict, ExamError> {
        let bank = self.administer(exam_id)?;

        for (question, selected) in &attempt.answers {
            let known = bank
                .question(*question)
                .ok_or(ExamError::UnknownQuestion(*question))?;
            if *selected >= known.options.len() {
                return Err(ExamError::OptionOutOfRange {
                    question: *question,
                    selected: *selected,
                });
            }
        }

        let mut passed = true;
        for question in &bank.questions {
            let selected = attempt
                .selected(question.id)
                .ok_or(ExamError::MissingAnswer(question.id))?;
            if selected != question.correct {
                passed = false;
            }
        }

        Ok(Verdict {
            exam_id: exam_id.clone(),
            passed,
        })
    }
}
