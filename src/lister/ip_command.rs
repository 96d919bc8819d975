//! `ip a` based interface listing.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use super::InterfaceSource;
use crate::config::tool_name;
use crate::error::SnifferError;

/// Lists interfaces by running `ip a`.
#[derive(Debug, Clone)]
pub struct IpCommand {
    path: PathBuf,
}

impl IpCommand {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for IpCommand {
    fn default() -> Self {
        Self::new("ip")
    }
}

impl InterfaceSource for IpCommand {
    fn enumerate(&self) -> Result<String, SnifferError> {
        debug!("Listing interfaces with {}", self.path.display());
        let output = Command::new(&self.path)
            .arg("a")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SnifferError::from_spawn(&tool_name(&self.path), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("{} exited with {}", tool_name(&self.path), output.status)
            } else {
                stderr
            };
            return Err(SnifferError::Enumeration(detail));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let err = IpCommand::new("/nonexistent/ip").enumerate().unwrap_err();
        assert!(err.is_missing_tool());
        assert_eq!(err.to_string(), "'ip' not found");
    }

    #[test]
    fn test_stdout_is_returned() {
        // `echo a` prints the argument the real tool would receive
        let listing = IpCommand::new("echo").enumerate().unwrap();
        assert_eq!(listing, "a\n");
    }

    #[test]
    fn test_non_zero_exit_is_enumeration_failure() {
        let err = IpCommand::new("false").enumerate().unwrap_err();
        match err {
            SnifferError::Enumeration(detail) => assert!(detail.contains("false exited with")),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
