use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::eligibility::{DeadlineEnforcement, EligibilityPolicy};

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub eligibility: EligibilityPolicy,
    /// Default portal snapshot consumed by the command line.
    pub snapshot: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let deadline_enforcement = match env::var("APP_DEADLINE_ENFORCEMENT") {
            Ok(raw) => DeadlineEnforcement::parse(&raw)
                .ok_or(ConfigError::InvalidDeadlineEnforcement { value: raw })?,
            Err(_) => DeadlineEnforcement::default(),
        };

        let enrollment_requires_affiliation = match env::var("APP_ENROLLMENT_REQUIRES_RPI") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                key: "APP_ENROLLMENT_REQUIRES_RPI",
                value: raw,
            })?,
            Err(_) => false,
        };

        let snapshot = env::var("APP_SNAPSHOT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            eligibility: EligibilityPolicy {
                deadline_enforcement,
                enrollment_requires_affiliation,
            },
            snapshot,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDeadlineEnforcement { value: String },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDeadlineEnforcement { value } => write!(
                f,
                "APP_DEADLINE_ENFORCEMENT must be 'always' or 'active-semester' (found '{}')",
                value
            ),
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{} must be a boolean flag (found '{}')", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_DEADLINE_ENFORCEMENT");
        env::remove_var("APP_ENROLLMENT_REQUIRES_RPI");
        env::remove_var("APP_SNAPSHOT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.eligibility, EligibilityPolicy::default());
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn reads_eligibility_policy_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("APP_DEADLINE_ENFORCEMENT", "active-semester");
        env::set_var("APP_ENROLLMENT_REQUIRES_RPI", "yes");
        env::set_var("APP_SNAPSHOT", "fixtures/portal.json");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.eligibility.deadline_enforcement,
            DeadlineEnforcement::ActiveSemesterOnly
        );
        assert!(config.eligibility.enrollment_requires_affiliation);
        assert_eq!(config.snapshot, Some(PathBuf::from("fixtures/portal.json")));
    }

    #[test]
    fn rejects_unknown_deadline_enforcement() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DEADLINE_ENFORCEMENT", "sometimes");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidDeadlineEnforcement { value }) => {
                assert_eq!(value, "sometimes")
            }
            other => panic!("expected invalid deadline enforcement, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_boolean_affiliation_flag() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENROLLMENT_REQUIRES_RPI", "maybe");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidFlag {
                key: "APP_ENROLLMENT_REQUIRES_RPI",
                ..
            })
        ));
    }
}
