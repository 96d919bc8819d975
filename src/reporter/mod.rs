//! Operator-facing output.
//!
//! Everything the operator sees goes through the `SessionReporter` trait,
//! so the lister and launcher never write to the console directly and
//! tests can record what would have been printed.

mod console_reporter;

pub use console_reporter::ConsoleReporter;

use std::process::ExitStatus;

use crate::domain::InterfaceName;
use crate::error::SnifferError;

/// Receives every user-visible event of a sniffing session.
pub trait SessionReporter {
    /// Raw output of the interface listing tool.
    fn on_interfaces(&mut self, listing: &str);

    /// Ask the operator for input. Must not append a newline.
    fn on_prompt(&mut self, prompt: &str);

    /// The interface listing could not be produced.
    fn on_listing_error(&mut self, err: &SnifferError);

    /// No usable interface name was chosen.
    fn on_no_selection(&mut self);

    /// The capture tool was spawned.
    fn on_start(&mut self, interface: &InterfaceName, pid: u32);

    /// One line of capture output, already trimmed.
    fn on_line(&mut self, line: &str);

    /// An interrupt arrived and the capture is being torn down.
    fn on_stopping(&mut self);

    /// The capture tool has been terminated and reaped.
    fn on_stopped(&mut self);

    /// The capture tool closed its output on its own.
    fn on_ended(&mut self, status: ExitStatus, diagnostics: &[String]);

    /// The capture could not be started or failed while running.
    fn on_capture_error(&mut self, err: &SnifferError);
}
