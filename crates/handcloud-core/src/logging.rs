//! Logging configuration
//!
//! The subscriber itself is installed by the application; this module only
//! describes where logs go and keeps the log directory tidy.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

const LOG_FILE_PREFIX: &str = "handcloud_";
const LOG_FILE_EXTENSION: &str = "log";

/// Where and how verbosely to log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level name: trace, debug, info, warn, error
    pub level: String,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a daily file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Number of log files kept by [`LogConfig::cleanup_old_logs`]
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            max_log_files: 10,
        }
    }
}

impl LogConfig {
    /// Parsed level; unknown names fall back to INFO.
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory if file output is enabled
    pub fn ensure_log_directory(&self) -> std::io::Result<()> {
        if self.file_output {
            fs::create_dir_all(&self.log_directory)?;
        }
        Ok(())
    }

    /// Path of today's log file
    pub fn current_log_path(&self) -> PathBuf {
        let date = chrono::Local::now().format("%Y-%m-%d");
        self.log_directory
            .join(format!("{LOG_FILE_PREFIX}{date}.{LOG_FILE_EXTENSION}"))
    }

    /// Delete the oldest log files beyond `max_log_files`.
    ///
    /// Returns the number of files removed.
    pub fn cleanup_old_logs(&self) -> std::io::Result<usize> {
        if !self.log_directory.is_dir() {
            return Ok(0);
        }

        let mut logs: Vec<PathBuf> = fs::read_dir(&self.log_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_log_file(path))
            .collect();

        if logs.len() <= self.max_log_files {
            return Ok(0);
        }

        // Date-stamped names sort chronologically.
        logs.sort();
        let excess = logs.len() - self.max_log_files;
        for path in &logs[..excess] {
            fs::remove_file(path)?;
        }
        Ok(excess)
    }
}

fn is_log_file(path: &std::path::Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
    let ext_matches = path
        .extension()
        .is_some_and(|ext| ext == LOG_FILE_EXTENSION);
    name_matches && ext_matches
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
        config.level = "chatty".to_string();
        assert_eq!(config.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_current_log_path_in_directory() {
        let config = LogConfig {
            log_directory: PathBuf::from("/tmp/handcloud-logs"),
            ..Default::default()
        };
        let path = config.current_log_path();
        assert!(path.starts_with("/tmp/handcloud-logs"));
        assert!(is_log_file(&path));
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=5 {
            let name = format!("handcloud_2024-01-0{day}.log");
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        let config = LogConfig {
            file_output: true,
            log_directory: dir.path().to_path_buf(),
            max_log_files: 2,
            ..Default::default()
        };
        assert_eq!(config.cleanup_old_logs().unwrap(), 3);
        assert!(dir.path().join("handcloud_2024-01-05.log").exists());
        assert!(dir.path().join("handcloud_2024-01-04.log").exists());
        assert!(!dir.path().join("handcloud_2024-01-01.log").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
