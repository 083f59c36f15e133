use axum::{extract::State, Json};

use crate::api::handlers::AppState;
use crate::api::middleware::AppError;
use crate::models::{QueryResponse, QuestionRequest};
use crate::services::query_service::QueryService;

/// Generate SQL from a natural language question and execute it
pub async fn generate_sql(
    State(state): State<AppState>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let response = QueryService::answer(
        state.vanna.as_deref(),
        state.provider.as_ref(),
        payload.question.trim(),
    )
    .await?;

    Ok(Json(response))
}

/// Legacy endpoint kept for backward compatibility; identical behavior
pub async fn generate_sql_legacy(
    state: State<AppState>,
    payload: Json<QuestionRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    generate_sql(state, payload).await
}
