// src/handlers/responses.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use sqlx::{SqlitePool, types::Json as SqlJson};
use uuid::Uuid;

use crate::{
    error::AppError,
    handlers::surveys::fetch_survey,
    models::{
        question::QuestionType,
        response::{Answer, AnswerValue, SubmitResponseRequest, SurveyResponse},
        survey::Survey,
    },
};

/// Row of the `survey_responses` table.
#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: String,
    survey_id: String,
    answers: SqlJson<Vec<Answer>>,
    created_at: DateTime<Utc>,
}

impl From<ResponseRow> for SurveyResponse {
    fn from(row: ResponseRow) -> Self {
        SurveyResponse {
            id: row.id,
            survey_id: row.survey_id,
            answers: row.answers.0,
            created_at: Some(row.created_at),
        }
    }
}

/// Checks that every answer targets a question of the survey, at most once,
/// with the shape that question's type expects. Choice answers must pick
/// listed options; an empty single-choice answer means no selection.
fn check_answers(survey: &Survey, answers: &[Answer]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for answer in answers {
        let question = survey.question(&answer.question_id).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown question: {}", answer.question_id))
        })?;

        if !seen.insert(answer.question_id.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Duplicate answer for question: {}",
                answer.question_id
            )));
        }

        let shape_ok = match (question.question_type(), &answer.answer) {
            (QuestionType::MultipleChoice, AnswerValue::Choices(_)) => true,
            (QuestionType::MultipleChoice, AnswerValue::Text(_)) => false,
            (
                QuestionType::ShortText | QuestionType::LongText | QuestionType::SingleChoice,
                AnswerValue::Text(_),
            ) => true,
            (
                QuestionType::ShortText | QuestionType::LongText | QuestionType::SingleChoice,
                AnswerValue::Choices(_),
            ) => false,
        };
        if !shape_ok {
            return Err(AppError::BadRequest(format!(
                "Answer for question {} does not match its type ({})",
                answer.question_id,
                question.question_type()
            )));
        }

        let listed = |value: &String| question.options().contains(value);
        let options_ok = match (question.question_type(), &answer.answer) {
            (QuestionType::SingleChoice, AnswerValue::Text(value)) => {
                value.is_empty() || listed(value)
            }
            (QuestionType::MultipleChoice, AnswerValue::Choices(values)) => {
                values.iter().all(listed)
            }
            _ => true,
        };
        if !options_ok {
            return Err(AppError::BadRequest(format!(
                "Answer for question {} is not one of its options",
                answer.question_id
            )));
        }
    }
    Ok(())
}

/// Submits a response to a survey.
///
/// * The path id is authoritative; the body's `survey_id` is not trusted.
/// * The response insert and the response-count increment share a transaction.
#[utoipa::path(
    post,
    path = "/surveys/{id}/responses",
    tag = "responses",
    params(("id" = String, Path, description = "Survey id")),
    request_body = SubmitResponseRequest,
    responses(
        (status = 201, description = "Response stored", body = SurveyResponse),
        (status = 400, description = "Answers do not fit the survey"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn submit_response(
    State(pool): State<SqlitePool>,
    Path(survey_id): Path<String>,
    Json(payload): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Submitting response for survey ID: {}", survey_id);

    let survey = fetch_survey(&pool, &survey_id).await?;
    check_answers(&survey, &payload.answers)?;

    let response = SurveyResponse {
        id: Uuid::new_v4().to_string(),
        survey_id,
        answers: payload.answers,
        created_at: Some(Utc::now()),
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO survey_responses (id, survey_id, answers, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&response.id)
    .bind(&response.survey_id)
    .bind(SqlJson(&response.answers))
    .bind(response.created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save response: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    sqlx::query("UPDATE surveys SET responses = responses + 1 WHERE id = ?")
        .bind(&response.survey_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update response count: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tx.commit().await?;

    tracing::info!(
        "Successfully submitted response {} for survey {}",
        response.id,
        response.survey_id
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Lists all responses of a survey, oldest first.
#[utoipa::path(
    get,
    path = "/surveys/{id}/responses",
    tag = "responses",
    params(("id" = String, Path, description = "Survey id")),
    responses(
        (status = 200, description = "Stored responses", body = [SurveyResponse]),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn list_responses(
    State(pool): State<SqlitePool>,
    Path(survey_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    fetch_survey(&pool, &survey_id).await?;

    let rows = sqlx::query_as::<_, ResponseRow>(
        r#"
        SELECT id, survey_id, answers, created_at
        FROM survey_responses
        WHERE survey_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(&survey_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list responses for survey {}: {:?}", survey_id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Found {} responses for survey {}", rows.len(), survey_id);

    let responses: Vec<SurveyResponse> = rows.into_iter().map(SurveyResponse::from).collect();
    Ok(Json(responses))
}
