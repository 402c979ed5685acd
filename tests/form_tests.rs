// tests/form_tests.rs

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use survey::{
    SurveyTransport, TransportError,
    form::{DraftError, FormBuilder, FormError, FormPhase, QuestionEdit, ResponseForm},
    models::{
        question::{Question, QuestionType},
        response::{Answer, AnswerValue, SubmitResponseRequest, SurveyResponse},
        survey::{CreateSurveyRequest, Survey, SurveySummary},
    },
};

/// In-memory stand-in for the survey service.
#[derive(Default)]
struct MemoryTransport {
    surveys: Mutex<HashMap<String, Survey>>,
    created: Mutex<Vec<CreateSurveyRequest>>,
    submitted: Mutex<Vec<(String, SubmitResponseRequest)>>,
    fail_submit: AtomicBool,
}

impl MemoryTransport {
    fn with_survey(survey: Survey) -> Self {
        let transport = Self::default();
        transport
            .surveys
            .lock()
            .unwrap()
            .insert(survey.id.clone(), survey);
        transport
    }

    fn submitted(&self) -> Vec<(String, SubmitResponseRequest)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SurveyTransport for MemoryTransport {
    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError> {
        Ok(self
            .surveys
            .lock()
            .unwrap()
            .values()
            .map(|s| SurveySummary {
                id: s.id.clone(),
                title: s.title.clone(),
                description: s.description.clone(),
                created_at: s.created_at,
                response_count: s.response_count,
                question_count: s.questions.len(),
            })
            .collect())
    }

    async fn get_survey(&self, id: &str) -> Result<Survey, TransportError> {
        self.surveys
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(TransportError::Status(StatusCode::NOT_FOUND))
    }

    async fn create_survey(
        &self,
        payload: &CreateSurveyRequest,
    ) -> Result<Survey, TransportError> {
        self.created.lock().unwrap().push(payload.clone());
        let survey = Survey {
            id: format!("s{}", self.created.lock().unwrap().len()),
            title: payload.title.clone(),
            description: payload.description.clone(),
            questions: payload.questions.clone(),
            created_at: Some(chrono::Utc::now()),
            response_count: 0,
        };
        self.surveys
            .lock()
            .unwrap()
            .insert(survey.id.clone(), survey.clone());
        Ok(survey)
    }

    async fn submit_response(
        &self,
        survey_id: &str,
        payload: &SubmitResponseRequest,
    ) -> Result<SurveyResponse, TransportError> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(TransportError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        self.submitted
            .lock()
            .unwrap()
            .push((survey_id.to_string(), payload.clone()));
        Ok(SurveyResponse {
            id: "r1".to_string(),
            survey_id: survey_id.to_string(),
            answers: payload.answers.clone(),
            created_at: Some(chrono::Utc::now()),
        })
    }
}

/// q1: required short text, q2: multiple choice over A/B.
fn two_question_survey() -> Survey {
    Survey {
        id: "s1".to_string(),
        title: "Two questions".to_string(),
        description: String::new(),
        questions: vec![
            Question::with_id("q1", QuestionType::ShortText, "Say hello", true, vec![]),
            Question::with_id(
                "q2",
                QuestionType::MultipleChoice,
                "Pick some",
                false,
                vec!["A".into(), "B".into()],
            ),
        ],
        created_at: None,
        response_count: 0,
    }
}

async fn ready_form(transport: &MemoryTransport) -> ResponseForm {
    let mut form = ResponseForm::new("s1");
    form.load(transport).await.expect("Load failed");
    form
}

// --- Authoring ---

#[test]
fn builder_starts_with_one_default_question() {
    let builder = FormBuilder::new();

    assert_eq!(builder.questions().len(), 1);
    let question = &builder.questions()[0];
    assert_eq!(question.question_type(), QuestionType::ShortText);
    assert!(!question.required());
    assert!(question.text().is_empty());
    assert!(question.options().is_empty());
}

#[test]
fn last_question_cannot_be_removed() {
    let mut builder = FormBuilder::new();
    assert!(!builder.remove_question(0));

    builder.add_question();
    assert!(builder.remove_question(1));
    assert!(!builder.remove_question(0));
    assert_eq!(builder.questions().len(), 1);
}

#[test]
fn questions_keep_their_ids_when_reordered() {
    let mut builder = FormBuilder::new();
    builder.add_question();
    builder.add_question();
    let ids: Vec<String> = builder.questions().iter().map(|q| q.id().to_string()).collect();

    assert!(builder.move_question(2, 0));
    assert!(!builder.move_question(0, 3));

    let moved: Vec<&str> = builder.questions().iter().map(|q| q.id()).collect();
    assert_eq!(moved, [ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
}

#[test]
fn type_change_applies_option_side_effect() {
    let mut builder = FormBuilder::new();

    builder.update_question(0, QuestionEdit::Type(QuestionType::SingleChoice));
    assert_eq!(builder.questions()[0].options(), &[String::new()]);

    builder.update_option(0, 0, "Cat");
    builder.update_question(0, QuestionEdit::Type(QuestionType::LongText));
    assert!(builder.questions()[0].options().is_empty());

    assert!(!builder.update_question(5, QuestionEdit::Required(true)));
}

#[test]
fn option_operations_respect_floor_and_type() {
    let mut builder = FormBuilder::new();
    assert!(!builder.add_option(0), "text questions have no options");

    builder.update_question(0, QuestionEdit::Type(QuestionType::MultipleChoice));
    assert!(!builder.remove_option(0, 0));
    assert!(builder.add_option(0));
    assert!(builder.update_option(0, 1, "B"));
    assert!(builder.remove_option(0, 0));
    assert_eq!(builder.questions()[0].options(), &["B".to_string()]);
    assert!(!builder.remove_option(0, 0));
    assert!(!builder.update_option(0, 4, "nope"));
}

#[test]
fn validation_reports_title_first() {
    let mut builder = FormBuilder::new();
    builder.update_question(0, QuestionEdit::Text("Favorite pet?".into()));

    let err = builder.validate().unwrap_err();

    assert!(matches!(err, FormError::Draft(DraftError::TitleRequired)));
    assert_eq!(err.to_string(), "Survey title is required");
}

#[test]
fn validation_reports_blank_option_before_prompt_rule() {
    let mut builder = FormBuilder::new();
    builder.set_title("Pet Survey");
    builder.update_question(0, QuestionEdit::Type(QuestionType::SingleChoice));
    builder.update_question(0, QuestionEdit::Text("Favorite pet?".into()));
    builder.add_option(0);
    builder.update_option(0, 1, "Cat");

    let err = builder.validate().unwrap_err();

    assert!(matches!(err, FormError::Draft(DraftError::OptionTextRequired)));
    assert_eq!(err.to_string(), "All options must have text");
}

#[test]
fn validation_requires_question_text() {
    let mut builder = FormBuilder::new();
    builder.set_title("Pet Survey");
    builder.update_question(0, QuestionEdit::Text("   ".into()));

    assert!(matches!(
        builder.validate(),
        Err(FormError::Draft(DraftError::QuestionTextRequired))
    ));
}

#[tokio::test]
async fn invalid_draft_is_never_sent() {
    let transport = MemoryTransport::default();
    let mut builder = FormBuilder::new();

    let result = builder.submit(&transport).await;

    assert!(matches!(result, Err(FormError::Draft(DraftError::TitleRequired))));
    assert_eq!(builder.last_error(), Some("Survey title is required"));
    assert!(transport.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn valid_draft_is_published() {
    let transport = MemoryTransport::default();
    let mut builder = FormBuilder::new();
    builder.set_title("Pet Survey");
    builder.set_description("About pets");
    builder.update_question(0, QuestionEdit::Text("Name?".into()));

    let id = builder.submit(&transport).await.unwrap();

    assert_eq!(id, "s1");
    let created = transport.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0], builder.to_request());
    assert_eq!(created[0].questions[0].text(), "Name?");
}

// --- Responding ---

#[tokio::test]
async fn loading_initializes_every_answer() {
    let transport = MemoryTransport::with_survey(two_question_survey());

    let form = ready_form(&transport).await;

    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.answers().len(), 2);
    let payload = form.payload().unwrap();
    assert_eq!(
        payload.answers,
        vec![
            Answer {
                question_id: "q1".into(),
                answer: AnswerValue::Text(String::new()),
            },
            Answer {
                question_id: "q2".into(),
                answer: AnswerValue::Choices(vec![]),
            },
        ]
    );
}

#[tokio::test]
async fn submission_payload_is_ordered_and_shaped() {
    let transport = MemoryTransport::with_survey(two_question_survey());
    let mut form = ready_form(&transport).await;

    form.set_answer("q1", "hello").unwrap();
    form.toggle_choice("q2", "A", true).unwrap();
    form.submit(&transport).await.unwrap();

    let submitted = transport.submitted();
    assert_eq!(submitted.len(), 1);
    let (survey_id, payload) = &submitted[0];
    assert_eq!(survey_id, "s1");
    assert_eq!(payload.survey_id, "s1");
    assert_eq!(
        serde_json::to_value(&payload.answers).unwrap(),
        serde_json::json!([
            {"question_id": "q1", "answer": "hello"},
            {"question_id": "q2", "answer": ["A"]}
        ])
    );
    assert_eq!(form.phase(), FormPhase::Submitted);
}

#[tokio::test]
async fn toggling_on_and_off_restores_empty_selection() {
    let transport = MemoryTransport::with_survey(two_question_survey());
    let mut form = ready_form(&transport).await;
    let before = form.answers().clone();

    form.toggle_choice("q2", "Cat", true).unwrap();
    form.toggle_choice("q2", "Cat", false).unwrap();

    assert_eq!(form.answers(), &before);
}

#[tokio::test]
async fn wrong_shape_and_unknown_questions_are_rejected() {
    let transport = MemoryTransport::with_survey(two_question_survey());
    let mut form = ready_form(&transport).await;

    assert!(matches!(
        form.set_answer("q2", "A"),
        Err(FormError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        form.toggle_choice("q1", "A", true),
        Err(FormError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        form.set_answer("q9", "x"),
        Err(FormError::UnknownQuestion(_))
    ));
}

#[tokio::test]
async fn choice_answers_must_be_listed_options() {
    let mut survey = two_question_survey();
    survey.questions.push(Question::with_id(
        "q3",
        QuestionType::SingleChoice,
        "Best one?",
        false,
        vec!["A".into(), "B".into()],
    ));
    let transport = MemoryTransport::with_survey(survey);
    let mut form = ready_form(&transport).await;
    let before = form.answers().clone();

    match form.set_answer("q3", "Z") {
        Err(FormError::NotAnOption { question_id, value }) => {
            assert_eq!(question_id, "q3");
            assert_eq!(value, "Z");
        }
        other => panic!("expected NotAnOption, got {other:?}"),
    }
    assert!(matches!(
        form.toggle_choice("q2", "Z", true),
        Err(FormError::NotAnOption { .. })
    ));
    assert_eq!(form.answers(), &before);

    form.set_answer("q3", "B").unwrap();
    form.set_answer("q3", "").unwrap();
    form.toggle_choice("q2", "Z", false).unwrap();
    assert_eq!(form.answers(), &before);
}

#[tokio::test]
async fn required_text_answer_blocks_submission() {
    let transport = MemoryTransport::with_survey(two_question_survey());
    let mut form = ready_form(&transport).await;
    form.toggle_choice("q2", "A", true).unwrap();

    let result = form.submit(&transport).await;

    assert!(matches!(
        result,
        Err(FormError::AnswerRequired { ref question_id }) if question_id == "q1"
    ));
    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.error(), Some("Please answer all required questions"));
    assert!(transport.submitted().is_empty());
}

#[tokio::test]
async fn required_multiple_choice_has_no_minimum() {
    let mut survey = two_question_survey();
    survey.questions[1].set_required(true);
    let transport = MemoryTransport::with_survey(survey);
    let mut form = ready_form(&transport).await;
    form.set_answer("q1", "hello").unwrap();

    form.submit(&transport).await.unwrap();

    let (_, payload) = &transport.submitted()[0];
    assert_eq!(payload.answers[1].answer, AnswerValue::Choices(vec![]));
}

#[tokio::test]
async fn failed_submission_can_be_retried() {
    let transport = MemoryTransport::with_survey(two_question_survey());
    let mut form = ready_form(&transport).await;
    form.set_answer("q1", "hello").unwrap();
    transport.fail_submit.store(true, Ordering::SeqCst);

    let result = form.submit(&transport).await;

    assert!(matches!(result, Err(FormError::SubmitFailed(_))));
    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.error(), Some("Failed to submit survey. Please try again."));
    assert_eq!(
        form.payload().unwrap().answers[0].answer,
        AnswerValue::Text("hello".into())
    );

    transport.fail_submit.store(false, Ordering::SeqCst);
    form.submit(&transport).await.unwrap();
    assert_eq!(form.phase(), FormPhase::Submitted);
    assert!(form.error().is_none());
}

#[tokio::test]
async fn submitted_form_is_frozen() {
    let transport = MemoryTransport::with_survey(two_question_survey());
    let mut form = ready_form(&transport).await;
    form.set_answer("q1", "hello").unwrap();
    form.submit(&transport).await.unwrap();

    assert!(matches!(
        form.set_answer("q1", "again"),
        Err(FormError::InvalidPhase(FormPhase::Submitted))
    ));
    assert!(matches!(
        form.submit(&transport).await,
        Err(FormError::InvalidPhase(FormPhase::Submitted))
    ));
    assert!(matches!(
        form.load(&transport).await,
        Err(FormError::InvalidPhase(FormPhase::Submitted))
    ));
    assert_eq!(transport.submitted().len(), 1);
}

#[tokio::test]
async fn answers_are_rejected_before_load() {
    let mut form = ResponseForm::new("s1");

    assert!(matches!(
        form.set_answer("q1", "hello"),
        Err(FormError::InvalidPhase(FormPhase::Loading))
    ));
}

#[test]
fn survey_for_another_form_is_discarded() {
    let mut form = ResponseForm::new("other");

    let result = form.apply_survey(two_question_survey());

    assert!(matches!(result, Err(FormError::SurveyMismatch { .. })));
    assert_eq!(form.phase(), FormPhase::Loading);
    assert!(form.survey().is_none());
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    let transport = MemoryTransport::default();
    let mut form = ResponseForm::new("s1");

    assert!(form.load(&transport).await.is_err());
    assert_eq!(form.phase(), FormPhase::LoadFailed);

    transport
        .surveys
        .lock()
        .unwrap()
        .insert("s1".into(), two_question_survey());
    form.load(&transport).await.unwrap();
    assert_eq!(form.phase(), FormPhase::Ready);
    assert!(form.error().is_none());
}
