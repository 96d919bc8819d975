//! Test doubles shared by the unit tests.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{ChildStdout, Command, ExitStatus};

use crate::capture::CaptureTool;
use crate::config::tool_name;
use crate::domain::InterfaceName;
use crate::error::SnifferError;
use crate::lister::InterfaceSource;
use crate::reporter::SessionReporter;
use crate::signal::InterruptRouter;

/// A capture tool backed by a `/bin/sh -c` script.
pub struct ScriptTool {
    program: PathBuf,
    script: Option<String>,
    broken_stdout: bool,
}

impl ScriptTool {
    pub fn new(script: &str) -> Self {
        Self {
            program: PathBuf::from("/bin/sh"),
            script: Some(script.to_string()),
            broken_stdout: false,
        }
    }

    /// A tool whose binary does not exist.
    pub fn missing(path: &str) -> Self {
        Self {
            program: PathBuf::from(path),
            script: None,
            broken_stdout: false,
        }
    }

    /// Make every read of the tool's stdout fail.
    pub fn with_broken_stdout(mut self) -> Self {
        self.broken_stdout = true;
        self
    }
}

/// A reader whose reads always fail.
struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout went away"))
    }
}

impl CaptureTool for ScriptTool {
    fn name(&self) -> String {
        match self.script {
            Some(_) => "tcpdump".to_string(),
            None => tool_name(&self.program),
        }
    }

    fn command(&self, interface: &InterfaceName) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(script) = &self.script {
            command.arg("-c").arg(script).arg("tcpdump").arg(interface.as_str());
        }
        command
    }

    fn output_reader(&self, stdout: ChildStdout) -> Box<dyn Read + Send> {
        if self.broken_stdout {
            Box::new(BrokenPipe)
        } else {
            Box::new(stdout)
        }
    }
}

/// An interface source returning a canned result.
pub enum FixedSource {
    Listing(String),
    Missing(String),
    Failing(String),
}

impl FixedSource {
    pub fn listing(text: &str) -> Self {
        Self::Listing(text.to_string())
    }

    pub fn missing(tool: &str) -> Self {
        Self::Missing(tool.to_string())
    }

    pub fn failing(detail: &str) -> Self {
        Self::Failing(detail.to_string())
    }
}

impl InterfaceSource for FixedSource {
    fn enumerate(&self) -> Result<String, SnifferError> {
        match self {
            Self::Listing(text) => Ok(text.clone()),
            Self::Missing(tool) => Err(SnifferError::MissingTool { tool: tool.clone() }),
            Self::Failing(detail) => Err(SnifferError::Enumeration(detail.clone())),
        }
    }
}

/// One reporter call, as seen by a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Interfaces(String),
    Prompt,
    ListingError(String),
    NoSelection,
    Start(String),
    Line(String),
    Stopping,
    Stopped,
    Ended {
        code: Option<i32>,
        diagnostics: Vec<String>,
    },
    CaptureError(String),
}

/// Records reporter calls and can fire an interrupt on a given line.
#[derive(Default)]
pub struct RecordingReporter {
    events: Vec<Recorded>,
    pid: Option<u32>,
    interrupt: Option<(String, InterruptRouter)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch an interrupt through `router` once `line` has been relayed.
    pub fn interrupt_after(mut self, line: &str, router: InterruptRouter) -> Self {
        self.interrupt = Some((line.to_string(), router));
        self
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.clone()
    }

    /// Captured lines only.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Line(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Pid reported by the last start.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }
}

impl SessionReporter for RecordingReporter {
    fn on_interfaces(&mut self, listing: &str) {
        self.events.push(Recorded::Interfaces(listing.to_string()));
    }

    fn on_prompt(&mut self, _prompt: &str) {
        self.events.push(Recorded::Prompt);
    }

    fn on_listing_error(&mut self, err: &SnifferError) {
        self.events.push(Recorded::ListingError(err.to_string()));
    }

    fn on_no_selection(&mut self) {
        self.events.push(Recorded::NoSelection);
    }

    fn on_start(&mut self, interface: &InterfaceName, pid: u32) {
        self.pid = Some(pid);
        self.events.push(Recorded::Start(interface.to_string()));
    }

    fn on_line(&mut self, line: &str) {
        self.events.push(Recorded::Line(line.to_string()));
        if let Some((trigger, router)) = &self.interrupt {
            if trigger == line {
                router.dispatch();
            }
        }
    }

    fn on_stopping(&mut self) {
        self.events.push(Recorded::Stopping);
    }

    fn on_stopped(&mut self) {
        self.events.push(Recorded::Stopped);
    }

    fn on_ended(&mut self, status: ExitStatus, diagnostics: &[String]) {
        self.events.push(Recorded::Ended {
            code: status.code(),
            diagnostics: diagnostics.to_vec(),
        });
    }

    fn on_capture_error(&mut self, err: &SnifferError) {
        self.events.push(Recorded::CaptureError(err.to_string()));
    }
}
