use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "shop-content-mcp.log";

/// Logging setup. Console output always goes to stderr so stdout stays
/// free for JSON-RPC and reports.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace, debug, info, warn, error, or a full filter directive
    pub level: String,
    pub log_dir: PathBuf,
    pub rotation: LogRotation,
    pub file_enabled: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            rotation: LogRotation::Daily,
            file_enabled: false,
            json: false,
        }
    }
}

impl LogConfig {
    pub fn from_server_config(server_config: &crate::config::ServerConfig) -> Self {
        let mut config = Self {
            level: server_config.log_level.clone(),
            file_enabled: server_config.log_to_file,
            json: server_config.log_format.eq_ignore_ascii_case("json"),
            ..Self::default()
        };

        if let Some(dir) = &server_config.log_dir {
            config.log_dir = dir.clone();
        }

        config
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.file_enabled = enabled;
        self
    }

    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Install the global subscriber.
///
/// When file output is enabled the returned guard must be held until exit,
/// otherwise buffered lines are lost.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = config.env_filter();

    if !config.file_enabled {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true);

        let installed = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        installed.map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

        return Ok(None);
    }

    ensure_log_dir(&config.log_dir)?;
    let file_appender = match config.rotation {
        LogRotation::Daily => rolling::daily(&config.log_dir, LOG_FILE_PREFIX),
        LogRotation::Hourly => rolling::hourly(&config.log_dir, LOG_FILE_PREFIX),
        LogRotation::Never => rolling::never(&config.log_dir, LOG_FILE_PREFIX),
    };
    let (file_writer, guard) = non_blocking(file_appender);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr.and(file_writer))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        level = %config.level,
        "File logging enabled"
    );

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn test_from_server_config() {
        let server = ServerConfig {
            log_level: "debug".to_string(),
            log_to_file: true,
            log_dir: Some(PathBuf::from("/tmp/shop-logs")),
            log_format: "json".to_string(),
            ..ServerConfig::default()
        };

        let config = LogConfig::from_server_config(&server);
        assert_eq!(config.level, "debug");
        assert!(config.file_enabled);
        assert!(config.json);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/shop-logs"));
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::default()
            .with_level("warn")
            .with_rotation(LogRotation::Never)
            .with_file(true)
            .with_json(false);
        assert_eq!(config.level, "warn");
        assert_eq!(config.rotation, LogRotation::Never);
        assert!(config.file_enabled);
    }
}
