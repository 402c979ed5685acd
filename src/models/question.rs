// src/models/question.rs

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Session-scoped counter backing draft question ids.
static NEXT_QUESTION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generates an id for a draft question.
///
/// Combines a millisecond timestamp with a process-wide counter, so ids are
/// unique for the lifetime of the authoring session even when several
/// questions are created within the same millisecond.
pub fn next_question_id() -> String {
    let seq = NEXT_QUESTION_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("q-{}-{}", chrono::Utc::now().timestamp_millis(), seq)
}

/// The four supported question kinds.
///
/// Serialized with the wire names used by the survey API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum QuestionType {
    /// Single-line free text.
    #[default]
    #[serde(rename = "text")]
    ShortText,
    /// Multi-line free text.
    #[serde(rename = "textarea")]
    LongText,
    #[serde(rename = "single_choice")]
    SingleChoice,
    #[serde(rename = "multiple_choice")]
    MultipleChoice,
}

impl QuestionType {
    /// Whether questions of this type carry an option list.
    pub fn is_choice(self) -> bool {
        match self {
            QuestionType::ShortText | QuestionType::LongText => false,
            QuestionType::SingleChoice | QuestionType::MultipleChoice => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::ShortText => "text",
            QuestionType::LongText => "textarea",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single survey question.
///
/// Text questions never hold options; choice questions are seeded with one
/// empty option when they become a choice type. Fields are private so those
/// rules can only be changed through the mutators below. Decoding goes
/// through the same normalization as [`Question::with_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "RawQuestion")]
pub struct Question {
    id: String,

    /// The prompt shown to the respondent.
    text: String,

    #[serde(rename = "type")]
    question_type: QuestionType,

    required: bool,

    /// Choice labels, in display order.
    options: Vec<String>,
}

/// Wire shape of a question before its options are normalized.
#[derive(Deserialize)]
struct RawQuestion {
    id: String,
    text: String,
    #[serde(rename = "type")]
    question_type: QuestionType,
    #[serde(default)]
    required: bool,
    /// Accepts a missing or `null` field.
    #[serde(default, deserialize_with = "null_as_empty")]
    options: Vec<String>,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        Question::with_id(
            raw.id,
            raw.question_type,
            raw.text,
            raw.required,
            raw.options,
        )
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Question {
    /// Builds a question with a freshly generated id.
    ///
    /// Options are normalized the same way a type change would normalize them.
    pub fn new(
        question_type: QuestionType,
        text: impl Into<String>,
        required: bool,
        options: Vec<String>,
    ) -> Self {
        Self::with_id(next_question_id(), question_type, text, required, options)
    }

    /// Builds a question with a caller-supplied id.
    pub fn with_id(
        id: impl Into<String>,
        question_type: QuestionType,
        text: impl Into<String>,
        required: bool,
        options: Vec<String>,
    ) -> Self {
        let mut question = Self {
            id: id.into(),
            text: text.into(),
            question_type,
            required,
            options,
        };
        question.normalize_options();
        question
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Changes the question type and applies the option side effect:
    /// text types drop their options, choice types get one empty option if
    /// they have none.
    pub fn set_type(&mut self, question_type: QuestionType) {
        self.question_type = question_type;
        self.normalize_options();
    }

    fn normalize_options(&mut self) {
        if !self.question_type.is_choice() {
            self.options.clear();
        } else if self.options.is_empty() {
            self.options.push(String::new());
        }
    }

    /// Appends an empty option.
    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Replaces the option at `index`. Returns `false` if there is none.
    pub fn update_option(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(option) => {
                *option = value.into();
                true
            }
            None => false,
        }
    }

    /// Removes the option at `index`, keeping at least one option.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= 1 || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }
}

impl Default for Question {
    /// An empty, optional short-text question.
    fn default() -> Self {
        Self::new(QuestionType::ShortText, "", false, Vec::new())
    }
}
