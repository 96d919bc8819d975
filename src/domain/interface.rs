//! Network interface names.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Name of an OS network interface as typed by the operator.
///
/// The only guarantee is that it is non-empty and carries no surrounding
/// whitespace. Whether the interface exists is left to the capture tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceName(String);

impl InterfaceName {
    /// Build an interface name from raw operator input.
    ///
    /// Returns `None` when the input is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn link_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "2: eth0: <...>" or "5: veth1@if4: <...>"
    RE.get_or_init(|| Regex::new(r"^\d+:\s+([^:@\s]+)(?:@[^:\s]+)?:").expect("valid regex"))
}

/// Extract interface names from `ip a` style output.
///
/// Only link header lines are considered; address lines are skipped.
pub fn listed_interfaces(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| link_header().captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
