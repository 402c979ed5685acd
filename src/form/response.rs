// src/form/response.rs

use std::fmt;

use crate::{
    client::SurveyTransport,
    form::{answers::AnswerState, error::FormError},
    models::{
        question::{Question, QuestionType},
        response::{SubmitResponseRequest, SurveyResponse},
        survey::Survey,
    },
};

/// Lifecycle of a response form.
///
/// `Loading -> {LoadFailed | Ready}`, `Ready -> Submitting -> {Submitted | Ready}`.
/// `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Loading,
    LoadFailed,
    Ready,
    Submitting,
    Submitted,
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormPhase::Loading => "loading",
            FormPhase::LoadFailed => "failed to load",
            FormPhase::Ready => "ready",
            FormPhase::Submitting => "submitting",
            FormPhase::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

fn ensure_option(question: &Question, value: &str) -> Result<(), FormError> {
    if question.options().iter().any(|option| option == value) {
        Ok(())
    } else {
        Err(FormError::NotAnOption {
            question_id: question.id().to_string(),
            value: value.to_string(),
        })
    }
}

/// Respondent-side controller: loads one survey, collects answers and
/// submits them once.
#[derive(Debug, Clone)]
pub struct ResponseForm {
    survey_id: String,
    phase: FormPhase,
    survey: Option<Survey>,
    answers: AnswerState,
    error: Option<String>,
}

impl ResponseForm {
    pub fn new(survey_id: impl Into<String>) -> Self {
        Self {
            survey_id: survey_id.into(),
            phase: FormPhase::Loading,
            survey: None,
            answers: AnswerState::default(),
            error: None,
        }
    }

    pub fn survey_id(&self) -> &str {
        &self.survey_id
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn survey(&self) -> Option<&Survey> {
        self.survey.as_ref()
    }

    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    /// Message to show the respondent, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the survey and initializes the answers.
    ///
    /// Allowed while loading and after a failed load.
    pub async fn load<T>(&mut self, transport: &T) -> Result<(), FormError>
    where
        T: SurveyTransport + ?Sized,
    {
        if !matches!(self.phase, FormPhase::Loading | FormPhase::LoadFailed) {
            return Err(FormError::InvalidPhase(self.phase));
        }

        self.phase = FormPhase::Loading;
        let result = transport.get_survey(&self.survey_id).await;
        match result {
            Ok(survey) => self.apply_survey(survey),
            Err(e) => {
                tracing::warn!("Failed to load survey {}: {}", self.survey_id, e);
                let err = FormError::LoadFailed(e);
                self.phase = FormPhase::LoadFailed;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Installs a fetched survey and resets the answers to empty values.
    ///
    /// A survey with a different id is discarded and the form is unchanged.
    pub fn apply_survey(&mut self, survey: Survey) -> Result<(), FormError> {
        if survey.id != self.survey_id {
            tracing::warn!(
                "Discarding survey {} loaded for form {}",
                survey.id,
                self.survey_id
            );
            return Err(FormError::SurveyMismatch {
                expected: self.survey_id.clone(),
                received: survey.id,
            });
        }
        if matches!(self.phase, FormPhase::Submitting | FormPhase::Submitted) {
            return Err(FormError::InvalidPhase(self.phase));
        }

        self.answers = AnswerState::for_survey(&survey);
        self.survey = Some(survey);
        self.phase = FormPhase::Ready;
        self.error = None;
        tracing::debug!(
            "Survey {} ready with {} questions",
            self.survey_id,
            self.answers.len()
        );
        Ok(())
    }

    fn ensure_ready(&self) -> Result<&Survey, FormError> {
        match (&self.phase, &self.survey) {
            (FormPhase::Ready, Some(survey)) => Ok(survey),
            _ => Err(FormError::InvalidPhase(self.phase)),
        }
    }

    /// Sets a text or single-choice answer.
    ///
    /// A single-choice answer must be one of the question's options, or
    /// empty to clear the selection.
    pub fn set_answer(
        &mut self,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let value = value.into();
        let survey = self.ensure_ready()?;
        if let Some(question) = survey.question(question_id) {
            if question.question_type() == QuestionType::SingleChoice && !value.is_empty() {
                ensure_option(question, &value)?;
            }
        }
        self.answers.set_scalar(question_id, value)
    }

    /// Checks or unchecks a multiple-choice option.
    ///
    /// Only listed options can be checked; unchecking is always allowed.
    pub fn toggle_choice(
        &mut self,
        question_id: &str,
        option: &str,
        included: bool,
    ) -> Result<(), FormError> {
        let survey = self.ensure_ready()?;
        if let Some(question) = survey.question(question_id) {
            if question.question_type() == QuestionType::MultipleChoice && included {
                ensure_option(question, option)?;
            }
        }
        self.answers.toggle(question_id, option, included)
    }

    /// Fails on the first required text or single-choice question left empty.
    pub fn validate(&self) -> Result<(), FormError> {
        let survey = self.ensure_ready()?;
        match self.answers.first_missing_required(survey) {
            Some(question) => Err(FormError::AnswerRequired {
                question_id: question.id().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The submission payload: one answer per question, in question order.
    pub fn payload(&self) -> Result<SubmitResponseRequest, FormError> {
        let survey = self.ensure_ready()?;
        Ok(SubmitResponseRequest {
            survey_id: self.survey_id.clone(),
            answers: self.answers.flatten(survey),
        })
    }

    /// Validates and sends the answers.
    ///
    /// Success ends the session. A failure returns the form to `Ready` with
    /// the answers intact so the respondent can try again.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<SurveyResponse, FormError>
    where
        T: SurveyTransport + ?Sized,
    {
        if let Err(err) = self.validate() {
            if !matches!(err, FormError::InvalidPhase(_)) {
                self.error = Some(err.to_string());
            }
            return Err(err);
        }
        let payload = self.payload()?;

        self.phase = FormPhase::Submitting;
        self.error = None;
        let result = transport.submit_response(&self.survey_id, &payload).await;
        match result {
            Ok(response) => {
                tracing::info!(
                    "Submitted response {} for survey {}",
                    response.id,
                    self.survey_id
                );
                self.phase = FormPhase::Submitted;
                Ok(response)
            }
            Err(e) => {
                tracing::warn!("Failed to submit survey {}: {}", self.survey_id, e);
                let err = FormError::SubmitFailed(e);
                self.phase = FormPhase::Ready;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
