//! Console-based session reporter.

use std::io::{self, Write};
use std::process::ExitStatus;

use crate::domain::InterfaceName;
use crate::error::SnifferError;
use crate::reporter::SessionReporter;

/// Writes session events as plain text.
///
/// Defaults to stdout; any `Write` can be used instead.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter {
    /// Create a reporter writing to stdout.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

impl<W: Write> SessionReporter for ConsoleReporter<W> {
    fn on_interfaces(&mut self, listing: &str) {
        self.line("Available network interfaces:\n");
        self.line(listing);
    }

    fn on_prompt(&mut self, prompt: &str) {
        let _ = write!(self.out, "{}", prompt);
        let _ = self.out.flush();
    }

    fn on_listing_error(&mut self, err: &SnifferError) {
        let message = match err {
            SnifferError::MissingTool { tool } => format!(
                "Error: '{}' command not found. Please ensure network tools are installed.",
                tool
            ),
            SnifferError::Enumeration(detail) => {
                format!("Error while listing interfaces: {}", detail)
            }
            other => format!("An unexpected error occurred: {}", other),
        };
        self.line(&message);
    }

    fn on_no_selection(&mut self) {
        self.line("No valid interface selected. Exiting...");
    }

    fn on_start(&mut self, interface: &InterfaceName, _pid: u32) {
        self.line(&format!(
            "Packet sniffing started on interface '{}'. Press Ctrl+C to stop.",
            interface
        ));
    }

    fn on_line(&mut self, line: &str) {
        self.line(line);
    }

    fn on_stopping(&mut self) {
        self.line("\nStopping packet sniffing...");
    }

    fn on_stopped(&mut self) {
        self.line("Packet sniffing stopped.");
    }

    fn on_ended(&mut self, status: ExitStatus, diagnostics: &[String]) {
        if status.success() {
            self.line("Packet sniffing ended.");
            return;
        }
        self.line(&format!("Packet sniffing ended unexpectedly ({}).", status));
        for diag in diagnostics {
            self.line(&format!("  {}", diag));
        }
    }

    fn on_capture_error(&mut self, err: &SnifferError) {
        let message = match err {
            SnifferError::MissingTool { tool } => format!(
                "Error: '{}' not found. Please install it to use this tool.",
                tool
            ),
            other => format!("An unexpected error occurred: {}", other),
        };
        self.line(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> String {
        let mut reporter = ConsoleReporter::with_writer(Vec::new());
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    mod listing {
        use super::*;

        #[test]
        fn prints_heading_and_raw_listing() {
            let out = render(|r| r.on_interfaces("1: lo: <LOOPBACK>"));
            assert_eq!(out, "Available network interfaces:\n\n1: lo: <LOOPBACK>\n");
        }

        #[test]
        fn prompt_has_no_newline() {
            let out = render(|r| r.on_prompt("Enter: "));
            assert_eq!(out, "Enter: ");
        }

        #[test]
        fn missing_ip_tool() {
            let err = SnifferError::MissingTool { tool: "ip".into() };
            let out = render(|r| r.on_listing_error(&err));
            assert!(out.starts_with("Error: 'ip' command not found."));
        }

        #[test]
        fn enumeration_failure_includes_detail() {
            let err = SnifferError::Enumeration("exit status: 1".into());
            let out = render(|r| r.on_listing_error(&err));
            assert_eq!(out, "Error while listing interfaces: exit status: 1\n");
        }

        #[test]
        fn no_selection() {
            let out = render(|r| r.on_no_selection());
            assert_eq!(out, "No valid interface selected. Exiting...\n");
        }
    }

    mod capture {
        use super::*;

        #[test]
        fn start_message_names_interface() {
            let iface = InterfaceName::new("eth0").unwrap();
            let out = render(|r| r.on_start(&iface, 42));
            assert_eq!(
                out,
                "Packet sniffing started on interface 'eth0'. Press Ctrl+C to stop.\n"
            );
        }

        #[test]
        fn stop_sequence() {
            let out = render(|r| {
                r.on_line("L1");
                r.on_stopping();
                r.on_stopped();
            });
            assert_eq!(
                out,
                "L1\n\nStopping packet sniffing...\nPacket sniffing stopped.\n"
            );
        }

        #[test]
        fn missing_tcpdump() {
            let err = SnifferError::MissingTool {
                tool: "tcpdump".into(),
            };
            let out = render(|r| r.on_capture_error(&err));
            assert_eq!(
                out,
                "Error: 'tcpdump' not found. Please install it to use this tool.\n"
            );
        }

        #[test]
        fn unexpected_error() {
            let err = SnifferError::Unexpected("boom".into());
            let out = render(|r| r.on_capture_error(&err));
            assert_eq!(out, "An unexpected error occurred: boom\n");
        }
    }
}
