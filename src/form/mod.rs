// src/form/mod.rs

//! Client-side form engine.
//!
//! [`FormBuilder`] drives survey authoring, [`ResponseForm`] drives filling
//! out a published survey. Both talk to the service only through
//! [`SurveyTransport`](crate::client::SurveyTransport).

pub mod answers;
pub mod builder;
pub mod error;
pub mod response;
pub mod validation;

pub use answers::{AnswerSlot, AnswerState};
pub use builder::{FormBuilder, QuestionEdit};
pub use error::{DraftError, FormError};
pub use response::{FormPhase, ResponseForm};
pub use validation::validate_draft;
