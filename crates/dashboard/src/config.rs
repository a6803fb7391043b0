//! Runtime configuration, read from `ROBODEPOT_*` environment variables.

use std::path::PathBuf;

use thiserror::Error;

use robodepot_fleet::RobotStatus;
use robodepot_observability::LogFormat;
use robodepot_store::{ActivityFeed, PageRequest};

pub const SEED_PATH: &str = "ROBODEPOT_SEED_PATH";
pub const PAGE_SIZE: &str = "ROBODEPOT_PAGE_SIZE";
pub const ACTIVITY_CAPACITY: &str = "ROBODEPOT_ACTIVITY_CAPACITY";
pub const ROBOT_STATUS: &str = "ROBODEPOT_ROBOT_STATUS";
pub const SEARCH: &str = "ROBODEPOT_SEARCH";
pub const DEMO: &str = "ROBODEPOT_DEMO";
pub const OUTPUT: &str = "ROBODEPOT_OUTPUT";
pub const LOG_FORMAT: &str = "ROBODEPOT_LOG_FORMAT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositive { var: &'static str, value: String },

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// How the dashboard is printed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Seed file; the bundled mock warehouse when unset.
    pub seed_path: Option<PathBuf>,
    pub page_size: usize,
    pub activity_capacity: usize,
    pub robot_status: Option<RobotStatus>,
    pub search: Option<String>,
    /// Play a short scripted shift against the store before rendering.
    pub demo: bool,
    pub output: OutputMode,
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            page_size: PageRequest::DEFAULT_PER_PAGE,
            activity_capacity: ActivityFeed::DEFAULT_CAPACITY,
            robot_status: None,
            search: None,
            demo: false,
            output: OutputMode::Text,
            log_format: LogFormat::Json,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let page_size = match get(PAGE_SIZE) {
            Some(v) => positive(PAGE_SIZE, &v)?,
            None => defaults.page_size,
        };

        let activity_capacity = match get(ACTIVITY_CAPACITY) {
            Some(v) => positive(ACTIVITY_CAPACITY, &v)?,
            None => defaults.activity_capacity,
        };

        let robot_status = get(ROBOT_STATUS)
            .map(|v| v.parse::<RobotStatus>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                var: ROBOT_STATUS,
                reason: e.to_string(),
            })?;

        let demo = match get(DEMO).as_deref() {
            None => false,
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: DEMO,
                    reason: format!("expected a boolean, got {other:?}"),
                });
            }
        };

        let output = match get(OUTPUT).map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("text") => OutputMode::Text,
            Some("json") => OutputMode::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: OUTPUT,
                    reason: format!("expected `text` or `json`, got {other:?}"),
                });
            }
        };

        let log_format = match get(LOG_FORMAT) {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                var: LOG_FORMAT,
                reason,
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            seed_path: get(SEED_PATH).map(PathBuf::from),
            page_size,
            activity_capacity,
            robot_status,
            search: get(SEARCH),
            demo,
            output,
            log_format,
        })
    }
}

fn positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive {
            var,
            value: value.to_string(),
        }),
    }
}
