//! File logging.
//!
//! The terminal belongs to the UI while the stopwatch runs, so log records go
//! to a file or nowhere. Levels follow `RUST_LOG` and default to `info`.

use crate::config::Config;
use crate::runtime::ProgramError;
use std::path::Path;

/// Install the global logger if `config` names a log file.
///
/// Returns whether a logger was installed.
pub fn init(config: &Config) -> Result<bool, ProgramError> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };

    let file = log_to_file(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(true)
}

/// Open `path` for appending, creating it if needed.
pub fn log_to_file(path: impl AsRef<Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(!init(&Config::default()).unwrap());
    }

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("lapwatch-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        writeln!(log_to_file(&path).unwrap(), "first").unwrap();
        writeln!(log_to_file(&path).unwrap(), "second").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
        std::fs::remove_file(&path).unwrap();
    }
}
