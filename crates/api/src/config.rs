use std::path::PathBuf;

use sitebook_core::documents::DEFAULT_MAX_UPLOAD_BYTES;
use sitebook_core::workload::DEFAULT_HOURS_PER_DAY;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Where uploaded documents are written and how large they may be.
    pub upload: UploadConfig,
    /// Length of a working day used by the work-hours report (default: `8`).
    pub work_hours_per_day: f64,
    /// First administrator to create on an empty database, if configured.
    pub initial_admin: Option<InitialAdmin>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: u64,
}

/// Credentials for the administrator created at startup when no active
/// admin exists yet.
#[derive(Debug, Clone)]
pub struct InitialAdmin {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_DIR`           | `storage/documents`        |
    /// | `UPLOAD_MAX_BYTES`     | `52428800`                 |
    /// | `WORK_HOURS_PER_DAY`   | `8`                        |
    /// | `ADMIN_EMAIL`          | unset                      |
    /// | `ADMIN_PASSWORD`       | unset                      |
    /// | `ADMIN_FULL_NAME`      | `Administrator`            |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload = UploadConfig {
            dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "storage/documents".into())
                .into(),
            max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse()
                .expect("UPLOAD_MAX_BYTES must be a valid u64"),
        };

        let work_hours_per_day: f64 = std::env::var("WORK_HOURS_PER_DAY")
            .unwrap_or_else(|_| DEFAULT_HOURS_PER_DAY.to_string())
            .parse()
            .expect("WORK_HOURS_PER_DAY must be a number");
        assert!(
            work_hours_per_day > 0.0 && work_hours_per_day <= 24.0,
            "WORK_HOURS_PER_DAY must be in (0, 24]"
        );

        let initial_admin = match (
            std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(InitialAdmin {
                email,
                password,
                full_name: std::env::var("ADMIN_FULL_NAME")
                    .unwrap_or_else(|_| "Administrator".into()),
            }),
            _ => None,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            upload,
            work_hours_per_day,
            initial_admin,
        }
    }
}
