// src/form/validation.rs

use crate::{
    form::error::DraftError,
    models::question::Question,
};

/// Checks a draft against the publishing rules, first failure wins:
///
/// 1. the trimmed title is non-empty;
/// 2. every trimmed question text is non-empty;
/// 3. every choice question has options and none of them is blank.
///
/// Shared by the authoring controller and the create-survey handler.
pub fn validate_draft(title: &str, questions: &[Question]) -> Result<(), DraftError> {
    if title.trim().is_empty() {
        return Err(DraftError::TitleRequired);
    }

    if !questions.iter().all(|q| !q.text().trim().is_empty()) {
        return Err(DraftError::QuestionTextRequired);
    }

    let options_ok = questions.iter().all(|q| {
        !q.question_type().is_choice()
            || (!q.options().is_empty() && q.options().iter().all(|opt| !opt.trim().is_empty()))
    });
    if !options_ok {
        return Err(DraftError::OptionTextRequired);
    }

    Ok(())
}
