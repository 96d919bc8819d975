//! Error types for pktsniff.

use thiserror::Error;

/// Errors raised while listing interfaces or running a capture.
///
/// Every variant is caught at the boundary where it occurs and turned
/// into an operator-facing message; none of them abort the program.
#[derive(Error, Debug)]
pub enum SnifferError {
    /// A required external binary is not installed.
    #[error("'{tool}' not found")]
    MissingTool { tool: String },

    /// The interface listing command exited unsuccessfully.
    #[error("{0}")]
    Enumeration(String),

    /// The operator did not provide an interface name.
    #[error("no interface selected")]
    NoSelection,

    /// Anything else that went wrong while spawning, streaming or terminating.
    #[error("{0}")]
    Unexpected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl SnifferError {
    /// Map a spawn failure for `tool` onto the error taxonomy.
    ///
    /// `NotFound` means the binary is absent; every other kind is unexpected.
    pub fn from_spawn(tool: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SnifferError::MissingTool {
                tool: tool.to_string(),
            }
        } else {
            SnifferError::Io(err)
        }
    }

    /// Whether this error means an external tool is missing.
    pub fn is_missing_tool(&self) -> bool {
        matches!(self, SnifferError::MissingTool { .. })
    }
}
