use crate::api::middleware::AppError;
use crate::models::QueryResponse;
use crate::services::db_service::ConnectionProvider;
use crate::services::vanna::VannaClient;

/// Answer returned verbatim when the generated query matches no rows.
pub const NO_RESULTS_ANSWER: &str = "No results found for your query.";

pub struct QueryService;

impl QueryService {
    /// Answer a plain-language question: generate SQL, execute it on a
    /// freshly acquired connection, and summarize the rows.
    ///
    /// Each step fails fast. SQL is only executed after generation succeeded,
    /// the connection is closed on success and on execution failure alike,
    /// and the answer model is only consulted for non-empty result sets.
    pub async fn answer(
        vanna: Option<&dyn VannaClient>,
        provider: &dyn ConnectionProvider,
        question: &str,
    ) -> Result<QueryResponse, AppError> {
        let vanna = vanna.ok_or_else(|| {
            AppError::Unavailable(
                "Vanna AI service not initialized. Please configure GROQ_API_KEY.".to_string(),
            )
        })?;

        tracing::info!("Processing question: {}", question);

        let sql = vanna.generate_sql(question).await?;
        let sql = sql.trim().to_string();
        if sql.is_empty() {
            return Err(AppError::GenerationFailed(
                "Could not generate SQL from the question".to_string(),
            ));
        }

        tracing::info!("Generated SQL: {}", sql);

        let connection = provider.acquire().await?;
        let outcome = connection.query(&sql).await;
        connection.close().await;
        let results = outcome?;

        let answer = if results.is_empty() {
            NO_RESULTS_ANSWER.to_string()
        } else {
            vanna.generate_answer(question, &sql, &results).await?
        };

        tracing::info!("Query successful: {} results", results.len());

        Ok(QueryResponse {
            sql,
            results,
            answer,
        })
    }
}
