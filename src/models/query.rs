use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub sql: String,
}

/// Full outcome of a question: the generated SQL, the materialized rows and
/// the natural-language answer over them.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub sql: String,
    pub results: Vec<serde_json::Value>,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub status: String,
    pub message: String,
}

impl TrainResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
