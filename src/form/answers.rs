// src/form/answers.rs

use std::collections::{BTreeSet, HashMap};

use crate::{
    form::error::FormError,
    models::{
        question::{Question, QuestionType},
        response::{Answer, AnswerValue},
        survey::Survey,
    },
};

/// The in-progress answer to one question.
///
/// The variant is fixed by the question type when the state is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSlot {
    /// Text, long text and single-choice answers.
    Scalar(String),
    /// Multiple-choice selections.
    Set(BTreeSet<String>),
}

impl AnswerSlot {
    /// The empty answer for a question type.
    pub fn empty_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::ShortText | QuestionType::LongText | QuestionType::SingleChoice => {
                AnswerSlot::Scalar(String::new())
            }
            QuestionType::MultipleChoice => AnswerSlot::Set(BTreeSet::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnswerSlot::Scalar(value) => value.is_empty(),
            AnswerSlot::Set(values) => values.is_empty(),
        }
    }

    /// Wire form. Set members follow the question's option order; anything
    /// not among the options goes last, sorted.
    fn to_value(&self, question: &Question) -> AnswerValue {
        match self {
            AnswerSlot::Scalar(value) => AnswerValue::Text(value.clone()),
            AnswerSlot::Set(values) => {
                let mut ordered: Vec<String> = Vec::with_capacity(values.len());
                for option in question.options() {
                    if values.contains(option) && !ordered.contains(option) {
                        ordered.push(option.clone());
                    }
                }
                let unlisted: Vec<String> = values
                    .iter()
                    .filter(|v| !question.options().contains(*v))
                    .cloned()
                    .collect();
                ordered.extend(unlisted);
                AnswerValue::Choices(ordered)
            }
        }
    }
}

/// Answers keyed by question id, one entry per question of the survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerState {
    slots: HashMap<String, AnswerSlot>,
}

impl AnswerState {
    /// Fresh state with an empty answer for every question.
    pub fn for_survey(survey: &Survey) -> Self {
        let slots = survey
            .questions
            .iter()
            .map(|q| (q.id().to_string(), AnswerSlot::empty_for(q.question_type())))
            .collect();
        Self { slots }
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerSlot> {
        self.slots.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Replaces a text or single-choice answer.
    pub fn set_scalar(
        &mut self,
        question_id: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        match self.slot_mut(question_id)? {
            AnswerSlot::Scalar(current) => {
                *current = value.into();
                Ok(())
            }
            AnswerSlot::Set(_) => Err(FormError::ShapeMismatch {
                question_id: question_id.to_string(),
                expected: "multiple-choice",
            }),
        }
    }

    /// Adds or removes one option of a multiple-choice answer.
    pub fn toggle(
        &mut self,
        question_id: &str,
        option: &str,
        included: bool,
    ) -> Result<(), FormError> {
        match self.slot_mut(question_id)? {
            AnswerSlot::Set(selected) => {
                if included {
                    selected.insert(option.to_string());
                } else {
                    selected.remove(option);
                }
                Ok(())
            }
            AnswerSlot::Scalar(_) => Err(FormError::ShapeMismatch {
                question_id: question_id.to_string(),
                expected: "single-value",
            }),
        }
    }

    fn slot_mut(&mut self, question_id: &str) -> Result<&mut AnswerSlot, FormError> {
        self.slots
            .get_mut(question_id)
            .ok_or_else(|| FormError::UnknownQuestion(question_id.to_string()))
    }

    /// The first required text or single-choice question left empty.
    ///
    /// Multiple-choice questions have no minimum selection.
    pub fn first_missing_required<'a>(&self, survey: &'a Survey) -> Option<&'a Question> {
        survey.questions.iter().find(|q| {
            q.required()
                && q.question_type() != QuestionType::MultipleChoice
                && self.get(q.id()).is_none_or(AnswerSlot::is_empty)
        })
    }

    /// Flattens the answers into wire pairs, in the survey's question order.
    pub fn flatten(&self, survey: &Survey) -> Vec<Answer> {
        survey
            .questions
            .iter()
            .map(|q| {
                let answer = match self.get(q.id()) {
                    Some(slot) => slot.to_value(q),
                    None => AnswerSlot::empty_for(q.question_type()).to_value(q),
                };
                Answer {
                    question_id: q.id().to_string(),
                    answer,
                }
            })
            .collect()
    }
}
