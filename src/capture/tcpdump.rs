//! tcpdump-based capture tool.

use std::path::PathBuf;
use std::process::Command;

use super::CaptureTool;
use crate::config::tool_name;
use crate::domain::InterfaceName;

/// Runs `tcpdump -i <iface> -nn -v -l`.
///
/// `-nn` disables host and port name resolution, `-v` prints detailed
/// packet summaries and `-l` line-buffers stdout so packets show up as
/// they arrive even though stdout is a pipe.
#[derive(Debug, Clone)]
pub struct Tcpdump {
    path: PathBuf,
    extra_args: Vec<String>,
}

impl Tcpdump {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            extra_args: Vec::new(),
        }
    }

    /// Append arguments after the fixed ones (e.g. a filter expression).
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Arguments passed to tcpdump for `interface`.
    pub fn args(&self, interface: &InterfaceName) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            interface.to_string(),
            "-nn".to_string(),
            "-v".to_string(),
            "-l".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl Default for Tcpdump {
    fn default() -> Self {
        Self::new("tcpdump")
    }
}

impl CaptureTool for Tcpdump {
    fn name(&self) -> String {
        tool_name(&self.path)
    }

    fn command(&self, interface: &InterfaceName) -> Command {
        let mut command = Command::new(&self.path);
        command.args(self.args(interface));
        command
    }
}
