// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{health, responses, surveys},
    models::{
        question::{Question, QuestionType},
        response::{Answer, AnswerValue, SubmitResponseRequest, SurveyResponse},
        survey::{CreateSurveyRequest, Survey, SurveySummary},
    },
    state::AppState,
    utils::request_log::log_requests,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Survey API"),
    paths(
        health::root,
        health::health_check,
        surveys::create_survey,
        surveys::list_surveys,
        surveys::get_survey,
        responses::submit_response,
        responses::list_responses,
    ),
    components(schemas(
        Question,
        QuestionType,
        Survey,
        SurveySummary,
        CreateSurveyRequest,
        Answer,
        AnswerValue,
        SubmitResponseRequest,
        SurveyResponse,
    ))
)]
pub struct ApiDoc;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Survey and response routes plus health endpoints.
/// * OpenAPI document at `/api-docs/openapi.json`, Swagger UI at `/docs`.
/// * Global middleware: request logging, Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route(
            "/surveys",
            get(surveys::list_surveys).post(surveys::create_survey),
        )
        .route("/surveys/{id}", get(surveys::get_survey))
        .route(
            "/surveys/{id}/responses",
            get(responses::list_responses).post(responses::submit_response),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(log_requests)),
        )
        .layer(cors)
        .with_state(state)
}
