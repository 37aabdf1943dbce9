//! Per-connection limits and deadlines.

use std::time::Duration;

use crate::error::{AvaticaError, Result};

pub const DEFAULT_MAX_FRAME_SIZE: u32 = 100;
pub const DEFAULT_MAX_ROW_COUNT: i64 = 9_999_999;

/// Limits applied to every statement run on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Rows requested per page, including the first frame.
    pub max_frame_size: u32,
    /// Upper bound on the total rows a statement may return.
    pub max_row_count: i64,
    /// Deadline for a whole operation, covering every round trip it makes.
    pub timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            max_row_count: DEFAULT_MAX_ROW_COUNT,
            timeout: None,
        }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_frame_size(mut self, rows: u32) -> Self {
        self.max_frame_size = rows;
        self
    }

    pub fn with_max_row_count(mut self, rows: i64) -> Self {
        self.max_row_count = rows;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_frame_size == 0 {
            return Err(AvaticaError::Config(
                "max_frame_size must be positive".to_string(),
            ));
        }
        if self.max_row_count <= 0 {
            return Err(AvaticaError::Config(
                "max_row_count must be positive".to_string(),
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(AvaticaError::Config("timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Reads and parses an optional environment variable.
pub(crate) fn env_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AvaticaError::Config(format!("Invalid {}='{}': {}", key, raw, e))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AvaticaError::Config(format!("Invalid {}: {}", key, e))),
    }
}
