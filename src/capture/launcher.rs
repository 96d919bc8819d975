//! Drives one capture run from spawn to reaping.

use std::collections::VecDeque;
use std::io::{BufReader, Read};
use std::process::ExitStatus;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{CaptureEvent, CaptureProcess, CaptureTool, LineStream};
use crate::domain::{CaptureOutcome, CaptureState, InterfaceName};
use crate::error::SnifferError;
use crate::reporter::SessionReporter;
use crate::signal::InterruptRouter;

/// Number of trailing stderr lines kept for the end-of-capture report.
const MAX_DIAGNOSTICS: usize = 5;

/// How often to check for exit once the child has closed its stdout.
const EXIT_POLL: Duration = Duration::from_millis(50);

/// Spawns the capture tool, relays its output and tears it down.
///
/// Owns at most one `CaptureProcess` at a time: the handle lives only for
/// the duration of `run`, which returns after the child has been reaped.
pub struct CaptureLauncher<T: CaptureTool> {
    tool: T,
    router: InterruptRouter,
    state: CaptureState,
}

/// Why the wait loop stopped.
enum Ending {
    Interrupted,
    Closed,
    Failed(SnifferError),
}

impl<T: CaptureTool> CaptureLauncher<T> {
    pub fn new(tool: T, router: InterruptRouter) -> Self {
        Self {
            tool,
            router,
            state: CaptureState::NotStarted,
        }
    }

    /// State of the most recent run.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Capture on `interface` until the tool exits or the operator interrupts.
    ///
    /// Never panics on tool failures; every failure is reported through
    /// `reporter` and returned as an outcome.
    pub fn run(
        &mut self,
        interface: InterfaceName,
        reporter: &mut dyn SessionReporter,
    ) -> CaptureOutcome {
        self.state = CaptureState::NotStarted;

        // An interrupt must never see a live child and an unarmed router.
        let (tx, rx) = mpsc::channel();
        self.router.arm(tx.clone());

        let mut process = match CaptureProcess::spawn(&self.tool, &interface) {
            Ok(process) => process,
            Err(err) => {
                self.router.disarm();
                warn!("Failed to start {}: {}", self.tool.name(), err);
                reporter.on_capture_error(&err);
                self.transition(CaptureState::FailedToStart);
                return CaptureOutcome::FailedToStart(err);
            }
        };

        self.transition(CaptureState::Running);
        info!("Capturing on {} (pid {})", interface, process.pid());
        reporter.on_start(&interface, process.pid());

        let outcome = self.supervise(&mut process, tx, rx, reporter);
        self.router.disarm();
        self.transition(outcome.state());
        outcome
    }

    fn transition(&mut self, next: CaptureState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal capture transition {} -> {}",
            self.state,
            next
        );
        debug!("Capture state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn supervise(
        &self,
        process: &mut CaptureProcess,
        tx: Sender<CaptureEvent>,
        rx: Receiver<CaptureEvent>,
        reporter: &mut dyn SessionReporter,
    ) -> CaptureOutcome {
        let readers = match spawn_readers(&self.tool, process, &tx) {
            Ok(readers) => readers,
            Err(err) => return abort(process, Vec::new(), err, reporter),
        };
        drop(tx);

        let mut diagnostics = VecDeque::with_capacity(MAX_DIAGNOSTICS);
        let ending = loop {
            match rx.recv() {
                Ok(CaptureEvent::Line(line)) => reporter.on_line(&line),
                Ok(CaptureEvent::Diagnostic(line)) => keep_diagnostic(&mut diagnostics, line),
                Ok(CaptureEvent::Interrupted) => break Ending::Interrupted,
                Ok(CaptureEvent::ReadFailed(e)) => break Ending::Failed(e.into()),
                Ok(CaptureEvent::Closed) | Err(_) => break Ending::Closed,
            }
        };

        match ending {
            Ending::Interrupted => stop(process, readers, reporter),
            Ending::Failed(err) => abort(process, readers, err, reporter),
            Ending::Closed => {
                // stdout is gone but the child may still be running; Ctrl+C
                // must keep working until it exits.
                let status = loop {
                    match process.try_wait() {
                        Ok(Some(status)) => break status,
                        Ok(None) => {}
                        Err(err) => return abort(process, readers, err, reporter),
                    }
                    match rx.recv_timeout(EXIT_POLL) {
                        Ok(CaptureEvent::Interrupted) => return stop(process, readers, reporter),
                        Ok(CaptureEvent::Diagnostic(line)) => {
                            keep_diagnostic(&mut diagnostics, line)
                        }
                        Ok(_) | Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => thread::sleep(EXIT_POLL),
                    }
                };
                join_readers(readers);
                for event in rx.try_iter() {
                    if let CaptureEvent::Diagnostic(line) = event {
                        keep_diagnostic(&mut diagnostics, line);
                    }
                }
                let diagnostics: Vec<String> = diagnostics.into();
                info!("Capture ended: {}", status);
                reporter.on_ended(status, &diagnostics);
                CaptureOutcome::EndedNaturally {
                    status,
                    diagnostics,
                }
            }
        }
    }
}

/// Run the interrupt stop sequence.
fn stop(
    process: &mut CaptureProcess,
    readers: Vec<JoinHandle<()>>,
    reporter: &mut dyn SessionReporter,
) -> CaptureOutcome {
    info!("Interrupted, stopping capture");
    reporter.on_stopping();
    match teardown(process, readers) {
        Ok(status) => {
            debug!("Capture process stopped: {}", status);
            reporter.on_stopped();
            CaptureOutcome::StoppedByInterrupt
        }
        Err(err) => {
            reporter.on_capture_error(&err);
            CaptureOutcome::Aborted(err)
        }
    }
}

/// Report `err`, then terminate and reap the child.
fn abort(
    process: &mut CaptureProcess,
    readers: Vec<JoinHandle<()>>,
    err: SnifferError,
    reporter: &mut dyn SessionReporter,
) -> CaptureOutcome {
    warn!("Capture failed: {}", err);
    reporter.on_capture_error(&err);
    let _ = teardown(process, readers);
    CaptureOutcome::Aborted(err)
}

/// Terminate and reap the child, then join the reader threads.
///
/// Falls back to SIGKILL when SIGTERM fails. Readers block on the child's
/// pipes, so they are joined only once the child is reaped.
fn teardown(
    process: &mut CaptureProcess,
    readers: Vec<JoinHandle<()>>,
) -> Result<ExitStatus, SnifferError> {
    let result = process.shutdown().or_else(|err| {
        warn!("Failed to stop capture process gracefully: {}", err);
        process.kill().map_err(|_| err)
    });
    match &result {
        Ok(_) => join_readers(readers),
        Err(e) => warn!("Capture process could not be reaped: {}", e),
    }
    result
}

fn keep_diagnostic(diagnostics: &mut VecDeque<String>, line: String) {
    debug!("capture stderr: {}", line);
    if diagnostics.len() == MAX_DIAGNOSTICS {
        diagnostics.pop_front();
    }
    diagnostics.push_back(line);
}

fn spawn_readers<T: CaptureTool>(
    tool: &T,
    process: &mut CaptureProcess,
    tx: &Sender<CaptureEvent>,
) -> Result<Vec<JoinHandle<()>>, SnifferError> {
    let stdout = process
        .take_stdout()
        .map(|stdout| tool.output_reader(stdout))
        .ok_or_else(|| SnifferError::Unexpected("capture stdout was not piped".to_string()))?;
    let stderr = process
        .take_stderr()
        .ok_or_else(|| SnifferError::Unexpected("capture stderr was not piped".to_string()))?;

    let stdout_tx = tx.clone();
    let stdout_reader = thread::Builder::new()
        .name("capture-stdout".to_string())
        .spawn(move || forward_stdout(stdout, stdout_tx))?;

    let stderr_tx = tx.clone();
    let stderr_reader = thread::Builder::new()
        .name("capture-stderr".to_string())
        .spawn(move || forward_stderr(stderr, stderr_tx))?;

    Ok(vec![stdout_reader, stderr_reader])
}

fn forward_stdout<R: Read>(stdout: R, tx: Sender<CaptureEvent>) {
    for line in LineStream::new(BufReader::new(stdout)) {
        let event = match line {
            Ok(line) => CaptureEvent::Line(line),
            Err(e) => {
                let _ = tx.send(CaptureEvent::ReadFailed(e));
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
    let _ = tx.send(CaptureEvent::Closed);
}

fn forward_stderr<R: Read>(stderr: R, tx: Sender<CaptureEvent>) {
    for line in LineStream::new(BufReader::new(stderr)) {
        let Ok(line) = line else { return };
        if line.is_empty() {
            continue;
        }
        if tx.send(CaptureEvent::Diagnostic(line)).is_err() {
            return;
        }
    }
}

fn join_readers(readers: Vec<JoinHandle<()>>) {
    for reader in readers {
        if reader.join().is_err() {
            warn!("Capture reader thread panicked");
        }
    }
}
