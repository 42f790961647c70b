//! Logging configuration
//!
//! Describes where and how verbosely the application logs. The subscriber
//! itself is installed by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::level_filters::LevelFilter;

const LOG_FILE_PREFIX: &str = "orchestrair_";
const LOG_FILE_SUFFIX: &str = ".log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level ("trace", "debug", "info", "warn", "error")
    pub level: String,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Number of log files kept on disk
    pub max_files: usize,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a file in `log_directory`
    pub file_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_directory: PathBuf::from("logs"),
            max_files: 10,
            console_output: true,
            file_output: false,
        }
    }
}

impl LogConfig {
    /// Parse the configured level, falling back to INFO
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory if needed
    pub fn ensure_log_directory(&self) -> io::Result<()> {
        fs::create_dir_all(&self.log_directory)
    }

    /// Log file for this process. Stable for the lifetime of the process.
    pub fn current_log_path(&self) -> PathBuf {
        static SESSION: OnceLock<u64> = OnceLock::new();
        let stamp = SESSION.get_or_init(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        });
        self.log_directory
            .join(format!("{}{}{}", LOG_FILE_PREFIX, stamp, LOG_FILE_SUFFIX))
    }

    /// Delete the oldest log files so that, including the file about to be
    /// created, at most `max_files` remain. Returns how many were removed.
    pub fn cleanup_old_logs(&self) -> io::Result<usize> {
        if !self.log_directory.exists() {
            return Ok(0);
        }

        let mut logs = list_log_files(&self.log_directory)?;
        logs.sort();

        let keep = self.max_files.saturating_sub(1);
        let excess = logs.len().saturating_sub(keep);
        for path in logs.iter().take(excess) {
            fs::remove_file(path)?;
        }
        Ok(excess)
    }
}

fn list_log_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(LOG_FILE_PREFIX) && n.ends_with(LOG_FILE_SUFFIX))
            .unwrap_or(false);
        if is_log && path.is_file() {
            logs.push(path);
        }
    }
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let mut config = LogConfig::default();
        assert_eq!(config.parse_level(), LevelFilter::INFO);

        config.level = "debug".to_string();
        assert_eq!(config.parse_level(), LevelFilter::DEBUG);

        config.level = "loud".to_string();
        assert_eq!(config.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_current_log_path_is_stable() {
        let config = LogConfig::default();
        assert_eq!(config.current_log_path(), config.current_log_path());
        assert!(config.current_log_path().starts_with("logs"));
    }

    #[test]
    fn test_cleanup_old_logs() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in 1..=5 {
            fs::write(dir.path().join(format!("orchestrair_{}.log", stamp)), "x").unwrap();
        }
        fs::write(dir.path().join("unrelated.txt"), "x").unwrap();

        let config = LogConfig {
            log_directory: dir.path().to_path_buf(),
            max_files: 3,
            ..Default::default()
        };
        assert_eq!(config.cleanup_old_logs().unwrap(), 3);

        let remaining = list_log_files(dir.path()).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(dir.path().join("orchestrair_5.log").exists());
        assert!(dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn test_cleanup_missing_directory() {
        let config = LogConfig {
            log_directory: PathBuf::from("does/not/exist"),
            ..Default::default()
        };
        assert_eq!(config.cleanup_old_logs().unwrap(), 0);
    }
}
