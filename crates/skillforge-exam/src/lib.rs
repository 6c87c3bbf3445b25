//! Exam administration and grading.
//!
//! The engine is pure: it holds the fixed question banks, hands out one
//! bank per administration, and grades an attempt deterministically with
//! no external dependency. Pass/fail is all-or-nothing over the full
//! question set; pass-is-terminal is enforced by the issuance workflow and
//! the ledger, not here.

#![deny(unsafe_code)]

mod bank;
mod builtin;
mod engine;

pub use bank::{ExamAttempt, Question, QuestionBank, QuestionId};
pub use builtin::builtin_banks;
pub use engine::{ExamEngine, ExamError, Verdict};
