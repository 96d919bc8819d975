//! Owned handle to a running capture tool.

use std::io;
use std::process::{Child, ChildStderr, ChildStdout, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::CaptureTool;
use crate::domain::InterfaceName;
use crate::error::SnifferError;

/// How long a dropped handle waits after SIGTERM before killing outright.
const DROP_GRACE: Duration = Duration::from_secs(2);
const DROP_POLL: Duration = Duration::from_millis(20);

/// A spawned capture tool.
///
/// The child runs in its own process group, so a terminal Ctrl+C reaches
/// only this program and termination stays under the launcher's control.
/// A handle that is dropped before being reaped terminates and reaps the
/// child, so no capture process outlives its owner.
pub struct CaptureProcess {
    child: Child,
    exit_status: Option<ExitStatus>,
}

impl CaptureProcess {
    /// Spawn `tool` on `interface` with stdout and stderr piped.
    pub fn spawn<T: CaptureTool + ?Sized>(
        tool: &T,
        interface: &InterfaceName,
    ) -> Result<Self, SnifferError> {
        let mut command = tool.command(interface);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command
            .spawn()
            .map_err(|e| SnifferError::from_spawn(&tool.name(), e))?;
        debug!("Spawned {} (pid {}) on {}", tool.name(), child.id(), interface);

        Ok(Self {
            child,
            exit_status: None,
        })
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Whether the child has been waited on.
    pub fn is_reaped(&self) -> bool {
        self.exit_status.is_some()
    }

    /// Ask the child to exit with SIGTERM. Does not wait.
    ///
    /// A no-op if the child has already exited.
    pub fn terminate(&mut self) -> Result<(), SnifferError> {
        if self.is_reaped() {
            return Ok(());
        }
        if let Some(status) = self.child.try_wait()? {
            self.exit_status = Some(status);
            return Ok(());
        }
        send_sigterm(&mut self.child)?;
        Ok(())
    }

    /// Block until the child exits and reap it.
    pub fn wait(&mut self) -> Result<ExitStatus, SnifferError> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }
        let status = self.child.wait()?;
        debug!("Capture process {} exited: {}", self.child.id(), status);
        self.exit_status = Some(status);
        Ok(status)
    }

    /// Reap the child if it has already exited. Does not block.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, SnifferError> {
        if let Some(status) = self.exit_status {
            return Ok(Some(status));
        }
        let status = self.child.try_wait()?;
        if let Some(status) = status {
            debug!("Capture process {} exited: {}", self.child.id(), status);
            self.exit_status = Some(status);
        }
        Ok(status)
    }

    /// Terminate gracefully and reap.
    pub fn shutdown(&mut self) -> Result<ExitStatus, SnifferError> {
        self.terminate()?;
        self.wait()
    }

    /// Kill the child outright and reap it.
    pub fn kill(&mut self) -> Result<ExitStatus, SnifferError> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }
        self.child.kill()?;
        self.wait()
    }
}

impl Drop for CaptureProcess {
    fn drop(&mut self) {
        if self.is_reaped() {
            return;
        }
        let pid = self.child.id();
        if let Err(e) = self.terminate() {
            warn!("Failed to terminate capture process {}: {}", pid, e);
        }

        let deadline = Instant::now() + DROP_GRACE;
        while Instant::now() < deadline {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(DROP_POLL),
                Err(_) => break,
            }
        }

        warn!("Capture process {} ignored SIGTERM, killing", pid);
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Send SIGTERM to the child's process group.
#[cfg(unix)]
fn send_sigterm(child: &mut Child) -> io::Result<()> {
    let pid = libc::pid_t::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

    // The child leads its own group; signal the group so anything it forked goes too.
    let result = unsafe { libc::kill(-pid, libc::SIGTERM) };
    if result == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        return Ok(());
    }
    Err(err)
}

#[cfg(not(unix))]
fn send_sigterm(child: &mut Child) -> io::Result<()> {
    child.kill()
}
