//! # SheetSage Agent
//! Turns a stored dataset plus a question into an answer.
//!
//! - [`answer`]: builds the prompt from context chunks and calls the
//!   completion provider with a fixed generation policy
//! - [`session`]: loads a dataset once and runs the question pipeline against it

pub mod answer;
pub mod session;

pub use answer::{
    AnswerError, AnswerErrorKind, AnswerGenerator, AnswerOutcome, EMPTY_ANSWER, ERROR_MARKER,
    render_outcome,
};
pub use session::{DatasetSession, MAX_QUESTION_CHARS};
