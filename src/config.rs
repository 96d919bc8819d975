use std::path::{Path, PathBuf};

use crate::error::SnifferError;

const DEFAULT_CONFIG_PATH: &str = "/etc/pktsniff.conf";
const DEFAULT_TCPDUMP: &str = "tcpdump";
const DEFAULT_IP: &str = "ip";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime configuration.
///
/// Layered as defaults, then the config file, then `PKTSNIFF_*`
/// environment variables. Command line flags are applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capture tool binary (name looked up on PATH, or a path).
    pub tcpdump: PathBuf,
    /// Interface listing binary.
    pub ip: PathBuf,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_level: String,
    /// Extra arguments appended to the capture command.
    pub extra_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tcpdump: PathBuf::from(DEFAULT_TCPDUMP),
            ip: PathBuf::from(DEFAULT_IP),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// `explicit_path` wins over `PKTSNIFF_CONFIG`. A missing file at the
    /// default location is fine; a missing explicit file is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, SnifferError> {
        let env_path = std::env::var("PKTSNIFF_CONFIG").ok().map(PathBuf::from);
        let required = explicit_path.is_some() || env_path.is_some();
        let config_path = explicit_path
            .map(Path::to_path_buf)
            .or(env_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let content = if config_path.exists() {
            Some(std::fs::read_to_string(&config_path)?)
        } else if required {
            return Err(SnifferError::Config(format!(
                "config file {} does not exist",
                config_path.display()
            )));
        } else {
            None
        };

        Self::from_sources(content.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build a config from file content and an environment lookup.
    pub fn from_sources<F>(content: Option<&str>, env: F) -> Result<Self, SnifferError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(content) = content {
            config.apply_file(content)?;
        }

        // Allow environment variable overrides
        if let Some(val) = env("PKTSNIFF_TCPDUMP") {
            config.tcpdump = PathBuf::from(val);
        }
        if let Some(val) = env("PKTSNIFF_IP") {
            config.ip = PathBuf::from(val);
        }
        if let Some(val) = env("PKTSNIFF_LOG_LEVEL") {
            config.log_level = val;
        }

        Ok(config)
    }

    fn apply_file(&mut self, content: &str) -> Result<(), SnifferError> {
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(SnifferError::Config(format!(
                    "line {}: expected key = value, got {:?}",
                    lineno + 1,
                    line
                )));
            };
            let value = value.trim();
            match key.trim() {
                "tcpdump" => self.tcpdump = PathBuf::from(value),
                "ip" => self.ip = PathBuf::from(value),
                "log_level" => self.log_level = value.to_string(),
                "extra_args" => {
                    self.extra_args = value.split_whitespace().map(str::to_string).collect();
                }
                other => tracing::debug!("Ignoring unknown config key {:?}", other),
            }
        }
        Ok(())
    }
}

/// Display name of a tool, used in operator messages.
///
/// `/usr/sbin/tcpdump` is reported as `tcpdump`.
pub fn tool_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
