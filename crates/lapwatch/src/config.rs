//! Runtime configuration, read from `LAPWATCH_*` environment variables.

use lapwatch_core::DEFAULT_SAMPLE_INTERVAL;
use std::path::PathBuf;
use std::time::Duration;

/// Output target for the terminal UI.
///
/// By default the UI renders to **stdout**. When stdout is piped (for
/// example to capture the final summary), switch to
/// [`Stderr`](OutputTarget::Stderr) so the UI still reaches the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Errors from parsing configuration values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected a whole number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key}: {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("{key}: expected true/false/1/0, got {value:?}")]
    InvalidFlag { key: &'static str, value: String },
}

/// Configuration for a [`Program`](crate::Program).
///
/// Every field has a default (see the [`Default`] impl); the environment only
/// overrides what it sets.
///
/// | Variable | Field | Range |
/// |---|---|---|
/// | `LAPWATCH_SAMPLE_MS` | `sample_interval` | 1..=1000 |
/// | `LAPWATCH_FPS` | `fps` | 1..=120 |
/// | `LAPWATCH_LOG_FILE` | `log_file` | path |
/// | `LAPWATCH_STDERR` | `output` | flag |
/// | `LAPWATCH_INLINE` | `alt_screen` (inverted) | flag |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How often a running stopwatch re-reads the clock (default: 10ms).
    pub sample_interval: Duration,
    /// Target frames per second (default: 60, max: 120).
    pub fps: u32,
    /// Draw in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Where the UI is written.
    pub output: OutputTarget,
    /// Log file; logging is off when unset.
    pub log_file: Option<PathBuf>,
    /// Quit on SIGINT (default: true).
    pub handle_signals: bool,
    /// Restore the terminal before a panic message prints (default: true).
    pub catch_panics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            fps: 60,
            alt_screen: true,
            output: OutputTarget::default(),
            log_file: None,
            handle_signals: true,
            catch_panics: true,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(value) = lookup("LAPWATCH_SAMPLE_MS") {
            let ms = parse_ranged("LAPWATCH_SAMPLE_MS", &value, 1, 1000)?;
            config.sample_interval = Duration::from_millis(ms);
        }
        if let Some(value) = lookup("LAPWATCH_FPS") {
            config.fps = parse_ranged("LAPWATCH_FPS", &value, 1, 120)? as u32;
        }
        if let Some(value) = lookup("LAPWATCH_LOG_FILE") {
            if !value.is_empty() {
                config.log_file = Some(PathBuf::from(value));
            }
        }
        if let Some(value) = lookup("LAPWATCH_STDERR") {
            if parse_flag("LAPWATCH_STDERR", &value)? {
                config.output = OutputTarget::Stderr;
            }
        }
        if let Some(value) = lookup("LAPWATCH_INLINE") {
            config.alt_screen = !parse_flag("LAPWATCH_INLINE", &value)?;
        }

        Ok(config)
    }
}

fn parse_ranged(key: &'static str, value: &str, min: u64, max: u64) -> Result<u64, ConfigError> {
    let n: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })?;
    if !(min..=max).contains(&n) {
        return Err(ConfigError::OutOfRange {
            key,
            value: n,
            min,
            max,
        });
    }
    Ok(n)
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
