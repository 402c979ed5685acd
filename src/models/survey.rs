// src/models/survey.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::question::Question;

pub const MAX_TITLE_LEN: u64 = 200;
pub const MAX_DESCRIPTION_LEN: u64 = 2000;
pub const MAX_QUESTION_TEXT_LEN: usize = 1000;
pub const MAX_OPTION_LEN: usize = 500;

/// A published survey as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Survey {
    /// Server-assigned identity. Empty while the survey is still a draft.
    #[serde(default)]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Questions in display order.
    pub questions: Vec<Question>,

    #[serde(default, deserialize_with = "crate::models::timestamp::deserialize")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Number of responses received so far.
    #[serde(rename = "responses", default)]
    pub response_count: i64,
}

impl Survey {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }
}

/// Survey as shown in the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SurveySummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "crate::models::timestamp::deserialize")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "responses", default)]
    pub response_count: i64,
    #[serde(default)]
    pub question_count: usize,
}

/// DTO for creating a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSurveyRequest {
    #[validate(length(max = MAX_TITLE_LEN, message = "Title must be at most 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(
        max = MAX_DESCRIPTION_LEN,
        message = "Description must be at most 2000 characters"
    ))]
    pub description: String,

    #[validate(custom(function = validate_questions))]
    pub questions: Vec<Question>,
}

/// Structural checks on a question list that the draft rules do not cover.
fn validate_questions(questions: &[Question]) -> Result<(), validator::ValidationError> {
    if questions.is_empty() {
        return Err(validator::ValidationError::new("questions_cannot_be_empty"));
    }

    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.id()) {
            return Err(validator::ValidationError::new("duplicate_question_id"));
        }
        if question.text().chars().count() > MAX_QUESTION_TEXT_LEN {
            return Err(validator::ValidationError::new("question_text_too_long"));
        }
        if question
            .options()
            .iter()
            .any(|opt| opt.chars().count() > MAX_OPTION_LEN)
        {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
