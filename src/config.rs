use std::env;

/// Whether cancelling a RESERVED session refunds the quota unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuotaReleasePolicy {
    /// Cancellation always returns the unit.
    Always,
    /// Returns the unit only when cancelled before the response deadline
    /// (or before the session start when no deadline was set).
    BeforeDeadline,
}

impl QuotaReleasePolicy {
    pub fn from_env_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "before_deadline" => QuotaReleasePolicy::BeforeDeadline,
            _ => QuotaReleasePolicy::Always,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub quota_release_policy: QuotaReleasePolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            quota_release_policy: QuotaReleasePolicy::from_env_value(
                &env::var("QUOTA_RELEASE_POLICY").unwrap_or_else(|_| "always".to_string()),
            ),
        }
    }
}
