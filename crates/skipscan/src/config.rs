//! Module: config
//! Responsibility: runtime knobs for order verification, leak detection, and metrics.
//! Does not own: iterator semantics; every knob only toggles checks or telemetry.
//! Boundary: thread-local current config read by combinators at fetch time.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use thiserror::Error as ThisError;

thread_local! {
    static CURRENT: Cell<EngineConfig> = Cell::new(EngineConfig::default());
}

///
/// OrderChecks
///
/// When upstream sortedness is verified. A detected violation is an
/// assertion failure, never a recoverable error.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderChecks {
    Off,
    #[default]
    DebugOnly,
    Always,
}

impl OrderChecks {
    #[must_use]
    pub const fn enabled(self) -> bool {
        match self {
            Self::Off => false,
            Self::DebugOnly => cfg!(debug_assertions),
            Self::Always => true,
        }
    }
}

///
/// EngineConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub order_checks: OrderChecks,

    /// Log when a finaliser had to run from `Drop` instead of `recycle`.
    pub leak_detection: bool,

    /// Route iterator events into the `obs` sink.
    pub metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order_checks: OrderChecks::default(),
            leak_detection: cfg!(debug_assertions),
            metrics: true,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Return the config active on this thread.
#[must_use]
pub fn current() -> EngineConfig {
    CURRENT.with(Cell::get)
}

/// Install `config` for this thread and return the previous one.
pub fn install(config: EngineConfig) -> EngineConfig {
    CURRENT.with(|cell| cell.replace(config))
}

/// Run a closure with a temporary config override.
pub fn with_config<R>(config: EngineConfig, f: impl FnOnce() -> R) -> R {
    struct Guard(EngineConfig);

    impl Drop for Guard {
        fn drop(&mut self) {
            install(self.0);
        }
    }

    let _guard = Guard(install(config));

    f()
}

pub(crate) fn order_checks_enabled() -> bool {
    current().order_checks.enabled()
}
