use axum::{extract::State, Json};

use crate::api::handlers::AppState;
use crate::api::middleware::AppError;
use crate::models::{TrainRequest, TrainResponse};
use crate::services::trainer::Trainer;

/// Train the model on a vetted SQL query to improve future generations
pub async fn train_model(
    State(state): State<AppState>,
    Json(payload): Json<TrainRequest>,
) -> Result<Json<TrainResponse>, AppError> {
    tracing::info!("Training on SQL query: {}", payload.sql);

    Trainer::train_on_query(state.vanna.as_deref(), &payload.sql).await?;

    Ok(Json(TrainResponse::success("Model trained on SQL query")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{MockVanna, SpyProvider};
    use crate::services::vanna::VannaClient;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::Arc;

    fn state(vanna: Option<MockVanna>) -> AppState {
        AppState {
            vanna: vanna.map(|v| Arc::new(v) as Arc<dyn VannaClient>),
            provider: Arc::new(SpyProvider::with_rows(vec![])),
            database_connected_at_startup: true,
        }
    }

    #[tokio::test]
    async fn test_train_succeeds_with_initialized_capability() {
        let response = train_model(
            State(state(Some(MockVanna::returning("", "")))),
            Json(TrainRequest {
                sql: "SELECT * FROM vendor;".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.status, "success");
        assert_eq!(response.0.message, "Model trained on SQL query");
    }

    #[tokio::test]
    async fn test_train_without_capability_returns_503() {
        let error = train_model(
            State(state(None)),
            Json(TrainRequest {
                sql: "SELECT * FROM vendor;".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(
            error.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_train_rejection_returns_500() {
        let mut vanna = MockVanna::returning("", "");
        vanna.fail_train = true;

        let error = train_model(
            State(state(Some(vanna))),
            Json(TrainRequest {
                sql: "SELECT * FROM vendor;".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
