//! Access core configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development.

use crate::retry::RetryPolicy;
use chrono::{Duration as ChronoDuration, Utc};
use platform_audit::{AuditRecorder, AuditResult, JsonlAuditRecorder, MemoryAuditRecorder};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default audit query window, in hours.
pub const DEFAULT_AUDIT_WINDOW_HOURS: i64 = 24;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// The initial privileged account provisioned by the seed routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    /// Username of the admin identity.
    pub username: String,

    /// Contact email of the admin identity.
    pub email: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
        }
    }
}

/// Configuration for the access gate, the access service and the seed routine.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Audit query window used when the caller supplies none, in hours.
    pub audit_window_hours: i64,

    /// Location of the JSON-lines audit log, if a durable recorder is used.
    pub audit_log_path: Option<PathBuf>,

    /// Retry policy for transient audit write failures.
    pub audit_retry: RetryPolicy,

    /// Account created by the seed routine.
    pub admin: AdminAccount,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            audit_window_hours: DEFAULT_AUDIT_WINDOW_HOURS,
            audit_log_path: None,
            audit_retry: RetryPolicy::default(),
            admin: AdminAccount::default(),
        }
    }
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RBAC_AUDIT_WINDOW_HOURS`: Default audit query window (default: 24)
    /// - `RBAC_AUDIT_LOG_PATH`: JSON-lines audit log location (default: unset)
    /// - `RBAC_AUDIT_RETRY_ATTEMPTS`: Audit write attempts (default: 3)
    /// - `RBAC_AUDIT_RETRY_DELAY_MS`: Delay before the first retry (default: 50)
    /// - `RBAC_ADMIN_USERNAME`: Seeded admin username (default: admin)
    /// - `RBAC_ADMIN_EMAIL`: Seeded admin email (default: admin@example.com)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            audit_window_hours: std::env::var("RBAC_AUDIT_WINDOW_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.audit_window_hours),
            audit_log_path: std::env::var("RBAC_AUDIT_LOG_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            audit_retry: RetryPolicy {
                max_attempts: std::env::var("RBAC_AUDIT_RETRY_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(default.audit_retry.max_attempts),
                initial_delay: std::env::var("RBAC_AUDIT_RETRY_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_millis)
                    .unwrap_or(default.audit_retry.initial_delay),
                ..default.audit_retry
            },
            admin: AdminAccount {
                username: std::env::var("RBAC_ADMIN_USERNAME").unwrap_or(default.admin.username),
                email: std::env::var("RBAC_ADMIN_EMAIL").unwrap_or(default.admin.email),
            },
        }
    }

    /// The default audit query window.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` when the configured hours are not positive
    /// or reach past the earliest representable time.
    pub fn audit_window(&self) -> Result<ChronoDuration, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: "RBAC_AUDIT_WINDOW_HOURS".to_string(),
            message: message.to_string(),
        };

        if self.audit_window_hours <= 0 {
            return Err(invalid("must be a positive number of hours"));
        }
        let window = ChronoDuration::try_hours(self.audit_window_hours)
            .ok_or_else(|| invalid("out of range"))?;
        if Utc::now().checked_sub_signed(window).is_none() {
            return Err(invalid("reaches past the earliest supported time"));
        }
        Ok(window)
    }

    /// Open the audit recorder this configuration selects.
    ///
    /// A JSON-lines file at `audit_log_path` when set, otherwise an in-memory
    /// recorder.
    pub async fn open_audit_recorder(&self) -> AuditResult<Arc<dyn AuditRecorder>> {
        match &self.audit_log_path {
            Some(path) => Ok(Arc::new(JsonlAuditRecorder::open(path).await?)),
            None => {
                tracing::warn!("RBAC_AUDIT_LOG_PATH not set, audit records are kept in memory only");
                Ok(Arc::new(MemoryAuditRecorder::new()))
            }
        }
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit_window()?;
        if self.audit_retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RBAC_AUDIT_RETRY_ATTEMPTS".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "RBAC_ADMIN_USERNAME".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccessConfig::default();
        assert_eq!(config.audit_window_hours, 24);
        assert_eq!(config.audit_window().unwrap(), ChronoDuration::hours(24));
        assert!(config.audit_log_path.is_none());
        assert_eq!(config.admin.username, "admin");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AccessConfig::default();
        config.audit_window_hours = 0;
        assert!(config.validate().is_err());

        let mut config = AccessConfig::default();
        config.audit_window_hours = i64::MAX;
        assert!(config.validate().is_err());
        assert!(config.audit_window().is_err());

        // Representable as a duration, but earlier than any supported date
        let mut config = AccessConfig::default();
        config.audit_window_hours = 2_500_000_000;
        assert!(config.validate().is_err());

        let mut config = AccessConfig::default();
        config.audit_retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = AccessConfig::default();
        config.admin.username = String::new();
        assert!(config.validate().is_err());
    }
}
