// src/models/response.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One answer on the wire: a string for text and single-choice questions,
/// an array of selected options for multiple-choice questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Choices(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    pub question_id: String,
    pub answer: AnswerValue,
}

/// DTO for submitting a filled-out survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponseRequest {
    pub survey_id: String,
    /// One entry per question, in the survey's question order.
    pub answers: Vec<Answer>,
}

/// A stored response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SurveyResponse {
    pub id: String,
    pub survey_id: String,
    pub answers: Vec<Answer>,
    #[serde(default, deserialize_with = "crate::models::timestamp::deserialize")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
