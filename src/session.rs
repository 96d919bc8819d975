//! Top-level flow: select an interface, then capture on it.

use std::io::BufRead;

use tracing::info;

use crate::capture::{CaptureLauncher, CaptureTool};
use crate::domain::{CaptureOutcome, InterfaceName};
use crate::lister::{InterfaceLister, InterfaceSource};
use crate::reporter::SessionReporter;

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// No interface was chosen; nothing was spawned.
    NoSelection,
    /// A capture was attempted.
    Capture(CaptureOutcome),
}

impl SessionOutcome {
    /// Process exit status for this outcome.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Capture(outcome) if outcome.is_clean() => 0,
            _ => 1,
        }
    }
}

/// One run of the tool from interface selection to capture teardown.
pub struct Session<S: InterfaceSource, T: CaptureTool> {
    lister: InterfaceLister<S>,
    launcher: CaptureLauncher<T>,
    preselected: Option<String>,
}

impl<S: InterfaceSource, T: CaptureTool> Session<S, T> {
    pub fn new(lister: InterfaceLister<S>, launcher: CaptureLauncher<T>) -> Self {
        Self {
            lister,
            launcher,
            preselected: None,
        }
    }

    /// Use `interface` instead of listing and prompting.
    pub fn with_interface(mut self, interface: Option<String>) -> Self {
        self.preselected = interface;
        self
    }

    pub fn launcher(&self) -> &CaptureLauncher<T> {
        &self.launcher
    }

    /// Run the session. The launcher is only invoked with a non-empty name.
    pub fn run(
        &mut self,
        input: &mut dyn BufRead,
        reporter: &mut dyn SessionReporter,
    ) -> SessionOutcome {
        let selection = match &self.preselected {
            Some(raw) => InterfaceName::new(raw),
            None => self.lister.list_and_select(input, reporter),
        };

        let Some(interface) = selection else {
            info!("No interface selected");
            reporter.on_no_selection();
            return SessionOutcome::NoSelection;
        };

        SessionOutcome::Capture(self.launcher.run(interface, reporter))
    }
}
