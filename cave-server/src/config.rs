//! Server configuration

use crate::BoxError;

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in days
    pub jwt_expiry_days: i64,
    /// Gemini API key; unset disables generated reasons
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Gemini REST base URL
    pub gemini_api_url: String,
    /// Text generation request timeout
    pub genai_timeout_secs: u64,
    /// Password for the seeded `admin` account
    pub admin_password: Option<String>,
    /// Purchases older than this many months are eligible for cleanup
    pub purchase_retention_months: u32,
    /// Background cleanup interval; 0 disables the sweep
    pub cleanup_interval_hours: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: Self::parse_or("HTTP_PORT", 3000),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_days: Self::parse_or("JWT_EXPIRY_DAYS", 7),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".into()),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.into()),
            genai_timeout_secs: Self::parse_or("GENAI_TIMEOUT_SECS", 15),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            purchase_retention_months: Self::parse_or("PURCHASE_RETENTION_MONTHS", 2),
            cleanup_interval_hours: Self::parse_or("CLEANUP_INTERVAL_HOURS", 24),
        })
    }

    /// Configuration used by tests and local tooling
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            http_port: 0,
            environment: "development".into(),
            jwt_secret: "test-secret-for-the-cave-server-0123456789".into(),
            jwt_expiry_days: 7,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".into(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.into(),
            genai_timeout_secs: 1,
            admin_password: None,
            purchase_retention_months: 2,
            cleanup_interval_hours: 0,
        }
    }
}
