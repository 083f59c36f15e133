use crate::api::middleware::AppError;
use crate::services::vanna::{TrainingStatement, VannaClient};

/// Table definitions the model is trained on at startup. The service answers
/// questions against this fixed schema only.
pub const SCHEMA_DDL: [&str; 3] = [
    r#"CREATE TABLE invoice (
    id TEXT PRIMARY KEY,
    invoice_number TEXT,
    invoice_date TIMESTAMP,
    status TEXT,
    created_at TIMESTAMP,
    vendor_id TEXT,
    customer_id TEXT
);"#,
    r#"CREATE TABLE vendor (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);"#,
    r#"CREATE TABLE summary (
    id TEXT PRIMARY KEY,
    invoice_total DOUBLE PRECISION,
    invoice_id TEXT
);"#,
];

pub struct Trainer;

impl Trainer {
    /// Feed the fixed schema to the model, once, at startup.
    ///
    /// A failure on one statement is logged and the loop moves on: partial
    /// schema knowledge is a degraded state, not a startup failure.
    pub async fn bootstrap_schema(vanna: &dyn VannaClient) {
        for ddl in SCHEMA_DDL {
            if let Err(e) = vanna.train(TrainingStatement::Ddl(ddl.to_string())).await {
                tracing::warn!("Schema training warning: {}", e);
            }
        }
    }

    /// Feed a vetted SQL statement to the model on user request.
    ///
    /// Unlike the bootstrap loop this is a single interactive action, so a
    /// rejection is surfaced to the caller rather than swallowed.
    pub async fn train_on_query(
        vanna: Option<&dyn VannaClient>,
        sql: &str,
    ) -> Result<(), AppError> {
        let vanna = vanna.ok_or_else(|| {
            AppError::Unavailable("Vanna AI service not initialized".to_string())
        })?;

        vanna.train(TrainingStatement::Sql(sql.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockVanna;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_bootstrap_trains_every_schema_statement() {
        let vanna = MockVanna::returning("", "");

        tokio_test::block_on(Trainer::bootstrap_schema(&vanna));

        assert_eq!(vanna.train_calls.load(Ordering::SeqCst), SCHEMA_DDL.len());
    }

    #[test]
    fn test_bootstrap_continues_past_failing_statements() {
        let mut vanna = MockVanna::returning("", "");
        vanna.fail_train = true;

        // Every statement is rejected; the loop must still visit all of them.
        tokio_test::block_on(Trainer::bootstrap_schema(&vanna));

        assert_eq!(vanna.train_calls.load(Ordering::SeqCst), SCHEMA_DDL.len());
    }

    #[test]
    fn test_train_on_query_requires_capability() {
        let result = tokio_test::block_on(Trainer::train_on_query(
            None,
            "SELECT * FROM vendor;",
        ));

        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }

    #[test]
    fn test_train_on_query_surfaces_rejection() {
        let mut vanna = MockVanna::returning("", "");
        vanna.fail_train = true;

        let result = tokio_test::block_on(Trainer::train_on_query(
            Some(&vanna),
            "SELECT * FROM vendor;",
        ));

        assert!(matches!(result, Err(AppError::TrainingFailed(_))));
    }

    #[test]
    fn test_train_on_query_records_statement() {
        let vanna = MockVanna::returning("", "");

        tokio_test::block_on(Trainer::train_on_query(Some(&vanna), "SELECT * FROM vendor;"))
            .unwrap();

        let trained = vanna.trained.lock().unwrap();
        assert_eq!(
            trained.as_slice(),
            &[TrainingStatement::Sql("SELECT * FROM vendor;".to_string())]
        );
    }
}
