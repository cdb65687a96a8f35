use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    /// Base URL of the serverless functions host. Empty disables confirmation emails.
    pub functions_url: String,
    pub functions_key: String,
    pub cors_allow_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "staybook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            functions_url: env::var("FUNCTIONS_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            functions_key: env::var("FUNCTIONS_KEY").unwrap_or_default(),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        }
    }
}
