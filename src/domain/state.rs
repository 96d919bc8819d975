//! Capture lifecycle states.

use std::fmt;
use std::process::ExitStatus;

use crate::error::SnifferError;

/// Lifecycle of a single capture run.
///
/// `NotStarted -> Running -> {StoppedByInterrupt, EndedNaturally, FailedToStart, Aborted}`.
/// Every state other than `Running` and `NotStarted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    NotStarted,
    Running,
    StoppedByInterrupt,
    EndedNaturally,
    FailedToStart,
    Aborted,
}

impl CaptureState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotStarted | Self::Running)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: CaptureState) -> bool {
        match (self, next) {
            (Self::NotStarted, Self::Running | Self::FailedToStart) => true,
            (Self::Running, next) => next.is_terminal() && next != Self::FailedToStart,
            _ => false,
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Running => write!(f, "running"),
            Self::StoppedByInterrupt => write!(f, "stopped by interrupt"),
            Self::EndedNaturally => write!(f, "ended"),
            Self::FailedToStart => write!(f, "failed to start"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// How a capture run finished.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The operator interrupted the capture; the child was terminated and reaped.
    StoppedByInterrupt,
    /// The capture tool closed its output on its own and was reaped.
    EndedNaturally {
        status: ExitStatus,
        /// Last lines the tool wrote to stderr.
        diagnostics: Vec<String>,
    },
    /// The capture tool could not be spawned.
    FailedToStart(SnifferError),
    /// Streaming failed after the tool was running; the child was terminated and reaped.
    Aborted(SnifferError),
}

impl CaptureOutcome {
    /// The terminal state this outcome corresponds to.
    pub fn state(&self) -> CaptureState {
        match self {
            Self::StoppedByInterrupt => CaptureState::StoppedByInterrupt,
            Self::EndedNaturally { .. } => CaptureState::EndedNaturally,
            Self::FailedToStart(_) => CaptureState::FailedToStart,
            Self::Aborted(_) => CaptureState::Aborted,
        }
    }

    /// Whether the run finished the way an operator expects it to.
    pub fn is_clean(&self) -> bool {
        match self {
            Self::StoppedByInterrupt => true,
            Self::EndedNaturally { status, .. } => status.success(),
            Self::FailedToStart(_) | Self::Aborted(_) => false,
        }
    }
}
