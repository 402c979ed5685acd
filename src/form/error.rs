// src/form/error.rs

use crate::{client::TransportError, form::response::FormPhase};

/// Reasons a survey draft cannot be published.
///
/// Checked in declaration order; only the first failing rule is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Survey title is required")]
    TitleRequired,

    #[error("All questions must have text")]
    QuestionTextRequired,

    #[error("All options must have text")]
    OptionTextRequired,
}

/// Errors raised by the authoring and response controllers.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Please answer all required questions")]
    AnswerRequired { question_id: String },

    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    #[error("question {question_id} takes a {expected} answer")]
    ShapeMismatch {
        question_id: String,
        expected: &'static str,
    },

    #[error("{value:?} is not an option of question {question_id}")]
    NotAnOption { question_id: String, value: String },

    #[error("loaded survey {received} does not belong to this form ({expected})")]
    SurveyMismatch { expected: String, received: String },

    #[error("form is {0}")]
    InvalidPhase(FormPhase),

    #[error("Failed to load survey. Please try again later.")]
    LoadFailed(#[source] TransportError),

    #[error("Failed to create survey. Please try again.")]
    CreateFailed(#[source] TransportError),

    #[error("Failed to submit survey. Please try again.")]
    SubmitFailed(#[source] TransportError),
}
