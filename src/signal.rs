//! Ctrl+C routing.
//!
//! The process installs one interrupt handler. While a capture is running
//! the launcher arms the router with its event channel and the interrupt
//! is delivered there; otherwise the program is still listing or prompting
//! and the interrupt aborts it with no selection.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::capture::CaptureEvent;
use crate::error::SnifferError;

/// Exit status used when an interrupt arrives before any capture started.
pub const INTERRUPTED_EXIT_STATUS: i32 = 130;

/// Shared handle deciding where an interrupt goes.
#[derive(Clone, Default)]
pub struct InterruptRouter {
    target: Arc<Mutex<Option<Sender<CaptureEvent>>>>,
}

impl InterruptRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the process-wide Ctrl+C handler.
    ///
    /// Can only succeed once per process.
    pub fn install(&self) -> Result<(), SnifferError> {
        let router = self.clone();
        ctrlc::set_handler(move || {
            if !router.dispatch() {
                let status = report_unrouted(&mut io::stdout());
                std::process::exit(status);
            }
        })?;
        Ok(())
    }

    /// Route subsequent interrupts to `events`.
    pub fn arm(&self, events: Sender<CaptureEvent>) {
        *self.lock() = Some(events);
    }

    /// Stop routing interrupts to the capture.
    pub fn disarm(&self) {
        self.lock().take();
    }

    pub fn is_armed(&self) -> bool {
        self.lock().is_some()
    }

    /// Deliver an interrupt. Returns `false` when no capture took it.
    pub fn dispatch(&self) -> bool {
        match self.lock().as_ref() {
            Some(events) => events.send(CaptureEvent::Interrupted).is_ok(),
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Sender<CaptureEvent>>> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tell the operator an interrupt arrived before any capture started.
///
/// Returns the status the process should exit with.
pub fn report_unrouted<W: Write>(out: &mut W) -> i32 {
    tracing::info!("Interrupted before capture started");
    let _ = writeln!(out, "\nNo valid interface selected. Exiting...");
    let _ = out.flush();
    INTERRUPTED_EXIT_STATUS
}
