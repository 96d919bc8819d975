//! Interface listing and selection.
//!
//! The `InterfaceSource` trait abstracts the OS enumeration tool; the
//! `InterfaceLister` shows its output and asks the operator to pick one.

mod ip_command;

pub use ip_command::IpCommand;

use std::io::BufRead;

use tracing::{debug, warn};

use crate::domain::{listed_interfaces, InterfaceName};
use crate::error::SnifferError;
use crate::reporter::SessionReporter;

const PROMPT: &str = "Enter the interface name you want to sniff packets on: ";

/// Something that can describe the host's network interfaces as text.
pub trait InterfaceSource {
    /// Human-readable listing of the interfaces.
    fn enumerate(&self) -> Result<String, SnifferError>;
}

/// Shows the available interfaces and reads the operator's choice.
pub struct InterfaceLister<S: InterfaceSource> {
    source: S,
}

impl<S: InterfaceSource> InterfaceLister<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// List interfaces, prompt, and return the chosen name.
    ///
    /// Returns `None` when enumeration fails, when the input is blank, or
    /// when `input` is already at end-of-file. Failures are reported
    /// through `reporter`, never returned.
    pub fn list_and_select(
        &self,
        input: &mut dyn BufRead,
        reporter: &mut dyn SessionReporter,
    ) -> Option<InterfaceName> {
        let listing = match self.source.enumerate() {
            Ok(listing) => listing,
            Err(err) => {
                warn!("Interface enumeration failed: {}", err);
                reporter.on_listing_error(&err);
                return None;
            }
        };
        reporter.on_interfaces(&listing);
        reporter.on_prompt(PROMPT);

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) => {
                debug!("Input closed before an interface was entered");
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                reporter.on_listing_error(&SnifferError::Io(e));
                return None;
            }
        }

        let selected = InterfaceName::new(&answer)?;
        let known = listed_interfaces(&listing);
        if !known.is_empty() && !known.iter().any(|name| name == selected.as_str()) {
            warn!(
                "Interface '{}' is not in the listing ({})",
                selected,
                known.join(", ")
            );
        }
        Some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedSource, Recorded, RecordingReporter};
    use std::io::Cursor;

    const LISTING: &str = "1: lo: <LOOPBACK,UP>\n2: eth0: <BROADCAST,UP>\n";

    fn select(source: FixedSource, input: &str) -> (Option<InterfaceName>, RecordingReporter) {
        let lister = InterfaceLister::new(source);
        let mut reporter = RecordingReporter::new();
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let selected = lister.list_and_select(&mut input, &mut reporter);
        (selected, reporter)
    }

    #[test]
    fn test_shows_listing_then_prompts() {
        let (selected, reporter) = select(FixedSource::listing(LISTING), "eth0\n");
        assert_eq!(selected, InterfaceName::new("eth0"));
        assert_eq!(
            reporter.events(),
            vec![Recorded::Interfaces(LISTING.to_string()), Recorded::Prompt]
        );
    }

    #[test]
    fn test_trims_answer() {
        let (selected, _) = select(FixedSource::listing(LISTING), "   eth0  \n");
        assert_eq!(selected.unwrap().as_str(), "eth0");
    }

    #[test]
    fn test_blank_answer_is_no_selection() {
        for answer in ["\n", "   \n", "\t\n"] {
            let (selected, _) = select(FixedSource::listing(LISTING), answer);
            assert!(selected.is_none());
        }
    }

    #[test]
    fn test_closed_input_is_no_selection() {
        let (selected, _) = select(FixedSource::listing(LISTING), "");
        assert!(selected.is_none());
    }

    #[test]
    fn test_unlisted_interface_is_still_accepted() {
        let (selected, _) = select(FixedSource::listing(LISTING), "wlan7\n");
        assert_eq!(selected.unwrap().as_str(), "wlan7");
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let (selected, reporter) = select(FixedSource::missing("ip"), "eth0\n");
        assert!(selected.is_none());
        assert_eq!(
            reporter.events(),
            vec![Recorded::ListingError("'ip' not found".into())]
        );
    }

    #[test]
    fn test_enumeration_failure_skips_prompt() {
        let (selected, reporter) = select(FixedSource::failing("Cannot open netlink socket"), "eth0\n");
        assert!(selected.is_none());
        assert_eq!(
            reporter.events(),
            vec![Recorded::ListingError("Cannot open netlink socket".into())]
        );
    }
}
