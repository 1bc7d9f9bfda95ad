use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string of the hosted database. `None` leaves the
    /// server running without a database client; protected routes answer 500.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    /// Upper bound on the span of a public availability query, in days.
    pub max_calendar_days: i64,
    /// Number of bookings returned in the dashboard's recent list.
    pub recent_bookings_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 secret the auth provider signs session tokens with.
    pub jwt_secret: String,
    pub jwt_audience: String,
    /// Cookie consulted when no `Authorization` header is present.
    pub session_cookie: String,
    pub cors_origins: Vec<String>,
    pub token_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    pub google_places_api_key: Option<String>,
    pub google_places_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // API overrides
        if let Some(v) = env::var("STAYDESK_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_MAX_CALENDAR_DAYS") {
            self.api.max_calendar_days = v.parse().unwrap_or(self.api.max_calendar_days);
        }

        // Security overrides
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("SECURITY_SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_EXPIRY_HOURS") {
            self.security.token_expiry_hours = v.parse().unwrap_or(self.security.token_expiry_hours);
        }

        // Integrations
        if let Ok(v) = env::var("GOOGLE_PLACES_API_KEY") {
            self.integrations.google_places_api_key = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("GOOGLE_PLACES_BASE_URL") {
            self.integrations.google_places_base_url = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                max_calendar_days: 366,
                recent_bookings_limit: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                session_cookie: "sb-access-token".to_string(),
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                token_expiry_hours: 24 * 7, // 1 week
            },
            integrations: IntegrationsConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
                max_calendar_days: 366,
                recent_bookings_limit: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                session_cookie: "sb-access-token".to_string(),
                cors_origins: vec!["https://staging.example.com".to_string()],
                token_expiry_hours: 24,
            },
            integrations: IntegrationsConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
                max_calendar_days: 366,
                recent_bookings_limit: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
                session_cookie: "sb-access-token".to_string(),
                cors_origins: vec!["https://app.example.com".to_string()],
                token_expiry_hours: 4,
            },
            integrations: IntegrationsConfig::default(),
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            google_places_api_key: None,
            google_places_base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
