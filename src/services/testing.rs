//! Scripted fakes for the capability and connection seams, shared by the
//! service and handler tests.

use crate::api::middleware::AppError;
use crate::services::db_service::{ConnectionProvider, DatabaseConnection};
use crate::services::vanna::{TrainingStatement, VannaClient};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Capability fake with fixed replies and call counters.
pub struct MockVanna {
    pub sql: String,
    pub answer: String,
    pub fail_generation: bool,
    pub fail_train: bool,
    pub sql_calls: AtomicUsize,
    pub answer_calls: AtomicUsize,
    pub train_calls: AtomicUsize,
    pub trained: Mutex<Vec<TrainingStatement>>,
}

impl MockVanna {
    pub fn returning(sql: &str, answer: &str) -> Self {
        Self {
            sql: sql.to_string(),
            answer: answer.to_string(),
            fail_generation: false,
            fail_train: false,
            sql_calls: AtomicUsize::new(0),
            answer_calls: AtomicUsize::new(0),
            train_calls: AtomicUsize::new(0),
            trained: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl VannaClient for MockVanna {
    async fn generate_sql(&self, _question: &str) -> Result<String, AppError> {
        self.sql_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_generation {
            return Err(AppError::GenerationFailed("mock generation failure".to_string()));
        }
        Ok(self.sql.clone())
    }

    async fn generate_answer(
        &self,
        _question: &str,
        _sql: &str,
        _rows: &[serde_json::Value],
    ) -> Result<String, AppError> {
        self.answer_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }

    async fn train(&self, statement: TrainingStatement) -> Result<(), AppError> {
        self.train_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_train {
            return Err(AppError::TrainingFailed("mock rejected statement".to_string()));
        }
        self.trained.lock().unwrap().push(statement);
        Ok(())
    }
}

/// Connection provider fake that counts acquires and closes.
pub struct SpyProvider {
    pub rows: Vec<serde_json::Value>,
    pub fail_acquire: bool,
    pub fail_query: bool,
    pub acquires: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl SpyProvider {
    pub fn with_rows(rows: Vec<serde_json::Value>) -> Self {
        Self {
            rows,
            fail_acquire: false,
            fail_query: false,
            acquires: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl ConnectionProvider for SpyProvider {
    async fn acquire(&self) -> Result<Box<dyn DatabaseConnection>, AppError> {
        if self.fail_acquire {
            return Err(AppError::ExecutionFailed(
                "Database connection failed: connection refused".to_string(),
            ));
        }
        self.acquires.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SpyConnection {
            rows: self.rows.clone(),
            fail_query: self.fail_query,
            closes: self.closes.clone(),
        }))
    }
}

struct SpyConnection {
    rows: Vec<serde_json::Value>,
    fail_query: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl DatabaseConnection for SpyConnection {
    async fn query(&self, _sql: &str) -> Result<Vec<serde_json::Value>, AppError> {
        if self.fail_query {
            return Err(AppError::ExecutionFailed(
                "42P01: relation \"dropped_table\" does not exist".to_string(),
            ));
        }
        Ok(self.rows.clone())
    }

    async fn close(self: Box<Self>) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
