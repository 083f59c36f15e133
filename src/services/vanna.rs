use crate::api::middleware::AppError;
use reqwest::Client as HttpClient;
use serde_json::json;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Upper bound on a single generation call, mapped to the caller's failure
/// condition on expiry.
const GENERATION_TIMEOUT_SECS: u64 = 60;

/// A statement fed to the model to improve future generations.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingStatement {
    /// Table definition consumed during schema bootstrap.
    Ddl(String),
    /// Vetted query submitted after the fact.
    Sql(String),
}

/// Text-to-SQL generation capability.
///
/// Implementations own whatever schema knowledge they accumulate through
/// `train`; callers only see the three operations. The trait seam exists so
/// the orchestrator and handlers can run against a scripted fake.
#[async_trait::async_trait]
pub trait VannaClient: Send + Sync {
    /// Generate a SQL query answering `question`. An empty reply means the
    /// model produced nothing usable; the caller decides how to surface that.
    async fn generate_sql(&self, question: &str) -> Result<String, AppError>;

    /// Summarize an executed query's rows in plain language.
    async fn generate_answer(
        &self,
        question: &str,
        sql: &str,
        rows: &[serde_json::Value],
    ) -> Result<String, AppError>;

    /// Absorb a statement into the model's schema knowledge.
    async fn train(&self, statement: TrainingStatement) -> Result<(), AppError>;
}

#[derive(Default)]
struct Knowledge {
    ddl: Vec<String>,
    sql_examples: Vec<String>,
}

/// Production capability backed by the Groq chat-completions API.
///
/// Training state lives in-process: trained DDL and example queries are folded
/// into the prompt context of every generation call. Concurrent trains only
/// contend on the short lock, never across an await point.
pub struct GroqVanna {
    model: String,
    api_key: String,
    http_client: HttpClient,
    knowledge: RwLock<Knowledge>,
}

impl GroqVanna {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            http_client: HttpClient::new(),
            knowledge: RwLock::new(Knowledge::default()),
        }
    }

    /// Render the accumulated training state as prompt context.
    fn schema_context(&self) -> String {
        let knowledge = self.knowledge.read().unwrap_or_else(PoisonError::into_inner);

        let mut context = String::from("Database Schema:\n\n");
        for ddl in &knowledge.ddl {
            context.push_str(ddl);
            context.push_str("\n\n");
        }

        if !knowledge.sql_examples.is_empty() {
            context.push_str("Known good queries:\n");
            for sql in &knowledge.sql_examples {
                context.push_str(&format!("  {}\n", sql));
            }
        }

        context
    }

    /// Call the chat-completions API and return the assistant reply text.
    async fn chat(&self, prompt: &str) -> Result<String, AppError> {
        let response = self
            .http_client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .json(&json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0.1,
            }))
            .send()
            .await
            .map_err(|e| AppError::GenerationFailed(format!("Failed to call generation API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::GenerationFailed(format!(
                "Generation API returned error {}: {}",
                status, error_text
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::GenerationFailed(format!("Failed to parse generation response: {}", e)))?;

        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AppError::GenerationFailed("Generation response contains no content".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

/// Strip markdown code fences the model sometimes wraps around SQL.
fn strip_code_fences(reply: &str) -> String {
    reply
        .trim()
        .trim_start_matches("```sql")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
        .to_string()
}

#[async_trait::async_trait]
impl VannaClient for GroqVanna {
    async fn generate_sql(&self, question: &str) -> Result<String, AppError> {
        let context = self.schema_context();

        let prompt = format!(
            r#"You are a SQL expert. Given a database schema and a natural language question, generate a valid PostgreSQL SELECT query.

{context}

Question: {question}

Instructions:
1. Generate ONLY a valid PostgreSQL query
2. Do not include any explanations or markdown formatting
3. Use proper table and column names from the schema above
4. Return ONLY the SQL query, nothing else

SQL Query:"#,
            context = context,
            question = question
        );

        let reply = self.chat(&prompt).await?;
        Ok(strip_code_fences(&reply))
    }

    async fn generate_answer(
        &self,
        question: &str,
        sql: &str,
        rows: &[serde_json::Value],
    ) -> Result<String, AppError> {
        let rows_json = serde_json::to_string(rows)
            .map_err(|e| AppError::GenerationFailed(format!("Failed to serialize rows: {}", e)))?;

        let prompt = format!(
            r#"The user asked: {question}

The following SQL query was executed to answer it:
{sql}

The query returned these rows as JSON:
{rows_json}

Answer the user's question in one or two plain-language sentences based on the rows. Do not mention SQL or JSON."#,
            question = question,
            sql = sql,
            rows_json = rows_json
        );

        self.chat(&prompt).await
    }

    async fn train(&self, statement: TrainingStatement) -> Result<(), AppError> {
        let mut knowledge = self.knowledge.write().unwrap_or_else(PoisonError::into_inner);

        match statement {
            TrainingStatement::Ddl(ddl) => {
                if ddl.trim().is_empty() {
                    return Err(AppError::TrainingFailed(
                        "cannot train on an empty DDL statement".to_string(),
                    ));
                }
                knowledge.ddl.push(ddl.trim().to_string());
            }
            TrainingStatement::Sql(sql) => {
                if sql.trim().is_empty() {
                    return Err(AppError::TrainingFailed(
                        "cannot train on an empty SQL statement".to_string(),
                    ));
                }
                knowledge.sql_examples.push(sql.trim().to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```sql\nSELECT COUNT(*) FROM invoice;\n```"),
            "SELECT COUNT(*) FROM invoice;"
        );
        assert_eq!(
            strip_code_fences("```\nSELECT 1\n```"),
            "SELECT 1"
        );
        assert_eq!(
            strip_code_fences("  SELECT * FROM vendor  "),
            "SELECT * FROM vendor"
        );
    }

    #[tokio::test]
    async fn test_trained_statements_feed_schema_context() {
        let vanna = GroqVanna::new("test-model", "test-key");

        vanna
            .train(TrainingStatement::Ddl(
                "CREATE TABLE vendor (id TEXT PRIMARY KEY, name TEXT NOT NULL);".to_string(),
            ))
            .await
            .unwrap();
        vanna
            .train(TrainingStatement::Sql(
                "SELECT name FROM vendor ORDER BY name;".to_string(),
            ))
            .await
            .unwrap();

        let context = vanna.schema_context();
        assert!(context.contains("CREATE TABLE vendor"));
        assert!(context.contains("Known good queries:"));
        assert!(context.contains("SELECT name FROM vendor ORDER BY name;"));
    }

    #[tokio::test]
    async fn test_empty_statement_is_rejected() {
        let vanna = GroqVanna::new("test-model", "test-key");

        let result = vanna.train(TrainingStatement::Sql("   ".to_string())).await;
        assert!(matches!(result, Err(AppError::TrainingFailed(_))));

        let result = vanna.train(TrainingStatement::Ddl(String::new())).await;
        assert!(matches!(result, Err(AppError::TrainingFailed(_))));
    }
}
