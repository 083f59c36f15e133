use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub vanna: VannaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string; takes priority over the discrete settings.
    pub url: Option<String>,
    pub host: String,
    pub name: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VannaConfig {
    /// Generation API credential. Without it the service degrades to the
    /// health and root endpoints only.
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env before reading the environment
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder()
            .set_default("database.host", "localhost")?
            .set_default("database.name", "flowbit_db")?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "postgres123")?
            .set_default("database.port", 5432)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("vanna.model", "llama3-groq-70b-8192-tool-use-preview")?;

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        if let Ok(host) = env::var("DB_HOST") {
            builder = builder.set_override("database.host", host)?;
        }

        if let Ok(name) = env::var("DB_NAME") {
            builder = builder.set_override("database.name", name)?;
        }

        if let Ok(user) = env::var("DB_USER") {
            builder = builder.set_override("database.user", user)?;
        }

        if let Ok(password) = env::var("DB_PASSWORD") {
            builder = builder.set_override("database.password", password)?;
        }

        if let Ok(port) = env::var("DB_PORT") {
            builder = builder.set_override("database.port", port.parse::<u16>().unwrap_or(5432))?;
        }

        if let Ok(host) = env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port.parse::<u16>().unwrap_or(8000))?;
        }

        if let Ok(api_key) = env::var("GROQ_API_KEY") {
            builder = builder.set_override("vanna.api_key", Some(api_key))?;
        }

        if let Ok(model) = env::var("GROQ_MODEL") {
            builder = builder.set_override("vanna.model", model)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
