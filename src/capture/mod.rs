//! Capture process management.
//!
//! This module defines the `CaptureTool` trait and a tcpdump-based
//! implementation, the owned child handle, and the launcher that drives
//! one capture run from spawn to reaping.

mod launcher;
mod lines;
mod process;
mod tcpdump;

pub use launcher::CaptureLauncher;
pub use lines::LineStream;
pub use process::CaptureProcess;
pub use tcpdump::Tcpdump;

use std::io::{self, Read};
use std::process::{ChildStdout, Command};

use crate::domain::InterfaceName;

/// An external program that captures traffic on an interface and prints
/// one human-readable line per packet on stdout.
///
/// The launcher depends on this trait rather than on tcpdump directly, so
/// tests can substitute a scripted stand-in.
pub trait CaptureTool {
    /// Name used in operator messages, e.g. `tcpdump`.
    fn name(&self) -> String;

    /// Build the command capturing on `interface`.
    ///
    /// Stdio and process group are configured by the caller.
    fn command(&self, interface: &InterfaceName) -> Command;

    /// Reader the launcher splits into lines. Defaults to the raw pipe.
    fn output_reader(&self, stdout: ChildStdout) -> Box<dyn Read + Send> {
        Box::new(stdout)
    }
}

/// Something the launcher's wait loop has to react to.
#[derive(Debug)]
pub enum CaptureEvent {
    /// A trimmed line from the tool's stdout.
    Line(String),
    /// A trimmed line from the tool's stderr.
    Diagnostic(String),
    /// The tool closed its stdout.
    Closed,
    /// Reading the tool's stdout failed.
    ReadFailed(io::Error),
    /// The operator pressed Ctrl+C.
    Interrupted,
}
