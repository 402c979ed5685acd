// src/form/builder.rs

use crate::{
    client::SurveyTransport,
    form::{error::FormError, validation::validate_draft},
    models::{
        question::{Question, QuestionType},
        survey::CreateSurveyRequest,
    },
};

/// A single field edit applied to a draft question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionEdit {
    Text(String),
    Type(QuestionType),
    Required(bool),
}

/// Authoring controller for a survey draft.
///
/// Always holds at least one question. Index-based mutations that point
/// past the end are ignored and report `false`.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    title: String,
    description: String,
    questions: Vec<Question>,
    submitting: bool,
    error: Option<String>,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    /// A blank draft with one short-text question.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            questions: vec![Question::default()],
            submitting: false,
            error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Message from the last failed submit, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Appends an empty short-text question and returns its index.
    pub fn add_question(&mut self) -> usize {
        self.questions.push(Question::default());
        self.questions.len() - 1
    }

    /// Removes a question unless it is the only one left.
    pub fn remove_question(&mut self, index: usize) -> bool {
        if self.questions.len() <= 1 || index >= self.questions.len() {
            return false;
        }
        self.questions.remove(index);
        true
    }

    /// Moves the question at `from` so it ends up at position `to`.
    pub fn move_question(&mut self, from: usize, to: usize) -> bool {
        let len = self.questions.len();
        if from >= len || to >= len {
            return false;
        }
        let question = self.questions.remove(from);
        self.questions.insert(to, question);
        true
    }

    pub fn update_question(&mut self, index: usize, edit: QuestionEdit) -> bool {
        let Some(question) = self.questions.get_mut(index) else {
            return false;
        };
        match edit {
            QuestionEdit::Text(text) => question.set_text(text),
            QuestionEdit::Type(question_type) => question.set_type(question_type),
            QuestionEdit::Required(required) => question.set_required(required),
        }
        true
    }

    /// Appends an empty option to a choice question.
    pub fn add_option(&mut self, question_index: usize) -> bool {
        match self.questions.get_mut(question_index) {
            Some(question) if question.question_type().is_choice() => {
                question.add_option();
                true
            }
            _ => false,
        }
    }

    pub fn update_option(
        &mut self,
        question_index: usize,
        option_index: usize,
        value: impl Into<String>,
    ) -> bool {
        self.questions
            .get_mut(question_index)
            .is_some_and(|q| q.update_option(option_index, value))
    }

    /// Removes an option, keeping at least one.
    pub fn remove_option(&mut self, question_index: usize, option_index: usize) -> bool {
        self.questions
            .get_mut(question_index)
            .is_some_and(|q| q.remove_option(option_index))
    }

    /// Runs the publishing rules without touching the draft.
    pub fn validate(&self) -> Result<(), FormError> {
        validate_draft(&self.title, &self.questions)?;
        Ok(())
    }

    /// The create-survey payload for the current draft.
    pub fn to_request(&self) -> CreateSurveyRequest {
        CreateSurveyRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.clone(),
        }
    }

    /// Validates and publishes the draft, returning the new survey's id.
    ///
    /// Nothing is sent when validation fails. On either failure the message
    /// is kept in [`last_error`](Self::last_error) and the draft is left as is.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<String, FormError>
    where
        T: SurveyTransport + ?Sized,
    {
        if let Err(err) = self.validate() {
            tracing::debug!("Draft rejected: {}", err);
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.submitting = true;
        self.error = None;
        let result = transport.create_survey(&self.to_request()).await;
        self.submitting = false;

        match result {
            Ok(survey) => {
                tracing::info!("Created survey {}", survey.id);
                Ok(survey.id)
            }
            Err(e) => {
                tracing::warn!("Failed to create survey: {}", e);
                let err = FormError::CreateFailed(e);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
