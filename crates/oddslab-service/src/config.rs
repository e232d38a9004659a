//! Service configuration.

use oddslab_core::TierLimits;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the SQLite database file (default: "/data/oddslab/oddslab.db").
    pub database_path: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// The tier → daily limit table.
    pub tier_limits: TierLimits,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Tier limits come from the JSON file named by `TIER_LIMITS_PATH` when
    /// set and readable, else the built-in defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "/data/oddslab/oddslab.db".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            tier_limits: load_tier_limits(),
        }
    }
}

/// Load the tier limit table from `TIER_LIMITS_PATH`, falling back to the
/// defaults.
fn load_tier_limits() -> TierLimits {
    let Ok(path) = std::env::var("TIER_LIMITS_PATH") else {
        tracing::debug!("TIER_LIMITS_PATH not set, using default tier limits");
        return TierLimits::default();
    };

    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|contents| serde_json::from_str(&contents).map_err(|e| e.to_string()))
    {
        Ok(limits) => {
            tracing::info!(path = %path, "Loaded tier limits from file");
            limits
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Failed to load tier limits, using defaults");
            TierLimits::default()
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_path: "/data/oddslab/oddslab.db".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            tier_limits: TierLimits::default(),
        }
    }
}
