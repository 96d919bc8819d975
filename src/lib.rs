//! pktsniff - interactive tcpdump launcher.
//!
//! Lists the host's network interfaces with `ip`, asks the operator to
//! pick one, and streams `tcpdump` output for it until the tool exits or
//! the operator presses Ctrl+C. All packet decoding is left to tcpdump.

pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod lister;
pub mod reporter;
pub mod session;
pub mod signal;

#[cfg(test)]
mod testing;

pub use capture::{CaptureLauncher, CaptureTool, Tcpdump};
pub use config::Config;
pub use domain::{CaptureOutcome, CaptureState, InterfaceName};
pub use error::SnifferError;
pub use lister::{InterfaceLister, InterfaceSource, IpCommand};
pub use reporter::{ConsoleReporter, SessionReporter};
pub use session::{Session, SessionOutcome};
pub use signal::InterruptRouter;
