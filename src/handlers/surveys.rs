// src/handlers/surveys.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use sqlx::{SqlitePool, types::Json as SqlJson};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    form::validate_draft,
    models::{
        question::Question,
        survey::{CreateSurveyRequest, Survey, SurveySummary},
    },
    utils::html::strip_markup,
};

/// Row of the `surveys` table.
#[derive(sqlx::FromRow)]
struct SurveyRow {
    id: String,
    title: String,
    description: String,
    questions: SqlJson<Vec<Question>>,
    created_at: DateTime<Utc>,
    responses: i64,
}

impl From<SurveyRow> for Survey {
    fn from(row: SurveyRow) -> Self {
        Survey {
            id: row.id,
            title: row.title,
            description: row.description,
            questions: row.questions.0,
            created_at: Some(row.created_at),
            response_count: row.responses,
        }
    }
}

impl From<SurveyRow> for SurveySummary {
    fn from(row: SurveyRow) -> Self {
        SurveySummary {
            question_count: row.questions.0.len(),
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: Some(row.created_at),
            response_count: row.responses,
        }
    }
}

/// Loads a survey or fails with 404.
pub(crate) async fn fetch_survey(pool: &SqlitePool, id: &str) -> Result<Survey, AppError> {
    let row = sqlx::query_as::<_, SurveyRow>(
        r#"
        SELECT id, title, description, questions, created_at, responses
        FROM surveys
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch survey {}: {:?}", id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    match row {
        Some(row) => Ok(row.into()),
        None => {
            tracing::warn!("Survey not found with ID: {}", id);
            Err(AppError::NotFound("Survey not found".to_string()))
        }
    }
}

/// Strips markup from every free-text field and re-applies the option rules
/// of each question type.
fn sanitize(payload: CreateSurveyRequest) -> CreateSurveyRequest {
    let questions = payload
        .questions
        .iter()
        .map(|q| {
            Question::with_id(
                q.id(),
                q.question_type(),
                strip_markup(q.text()),
                q.required(),
                q.options().iter().map(|opt| strip_markup(opt)).collect(),
            )
        })
        .collect();

    CreateSurveyRequest {
        title: strip_markup(&payload.title),
        description: strip_markup(&payload.description),
        questions,
    }
}

/// Creates a new survey.
///
/// * Sanitizes free text, then applies the draft rules (first failure wins)
///   and the structural limits.
/// * Assigns a UUID and creation time; the response count starts at 0.
#[utoipa::path(
    post,
    path = "/surveys",
    tag = "surveys",
    request_body = CreateSurveyRequest,
    responses(
        (status = 201, description = "Survey created", body = Survey),
        (status = 400, description = "Invalid survey")
    )
)]
pub async fn create_survey(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateSurveyRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Creating new survey: {}", payload.title);

    let payload = sanitize(payload);
    validate_draft(&payload.title, &payload.questions)?;
    payload.validate()?;

    let survey = Survey {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        questions: payload.questions,
        created_at: Some(Utc::now()),
        response_count: 0,
    };

    sqlx::query(
        r#"
        INSERT INTO surveys (id, title, description, questions, created_at, responses)
        VALUES (?, ?, ?, ?, ?, 0)
        "#,
    )
    .bind(&survey.id)
    .bind(&survey.title)
    .bind(&survey.description)
    .bind(SqlJson(&survey.questions))
    .bind(survey.created_at)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create survey: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Successfully created survey with ID: {}", survey.id);

    Ok((StatusCode::CREATED, Json(survey)))
}

/// Lists all surveys, newest first.
#[utoipa::path(
    get,
    path = "/surveys",
    tag = "surveys",
    responses((status = 200, description = "Survey summaries", body = [SurveySummary]))
)]
pub async fn list_surveys(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, SurveyRow>(
        r#"
        SELECT id, title, description, questions, created_at, responses
        FROM surveys
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list surveys: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Found {} surveys", rows.len());

    let summaries: Vec<SurveySummary> = rows.into_iter().map(SurveySummary::from).collect();
    Ok(Json(summaries))
}

/// Retrieves a single survey with its questions.
#[utoipa::path(
    get,
    path = "/surveys/{id}",
    tag = "surveys",
    params(("id" = String, Path, description = "Survey id")),
    responses(
        (status = 200, description = "The survey", body = Survey),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn get_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let survey = fetch_survey(&pool, &id).await?;
    Ok(Json(survey))
}
