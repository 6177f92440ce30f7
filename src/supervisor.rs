//! Module keeping exactly one instance of the program running.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::Receiver;

/// A running instance of the program.
pub trait ChildHandle {
    fn kill(&mut self) -> io::Result<()>;
}

impl ChildHandle for std::process::Child {
    /// Kill the process and reap it.
    fn kill(&mut self) -> io::Result<()> {
        std::process::Child::kill(self)?;
        self.wait().map(|_| ())
    }
}

pub trait Launcher {
    type Child: ChildHandle;
    fn launch(&mut self, binary: &Path, args: &[OsString]) -> io::Result<Self::Child>;
}

/// Start the program as a child process writing to our own stdout and stderr.
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    type Child = std::process::Child;

    fn launch(&mut self, binary: &Path, args: &[OsString]) -> io::Result<Self::Child> {
        Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
    }
}

pub struct Supervisor<L: Launcher> {
    launcher: L,
    binary: PathBuf,
    args: Vec<OsString>,
    child: Option<L::Child>,
}

impl<L: Launcher> Supervisor<L> {
    pub fn new(launcher: L, binary: PathBuf, args: Vec<OsString>) -> Supervisor<L> {
        Supervisor {
            launcher,
            binary,
            args,
            child: None,
        }
    }

    /// Restart the program once per notification, in order,
    /// until the sending side goes away.
    pub fn run(mut self, restarts: Receiver<()>) {
        for () in restarts.iter() {
            self.restart();
        }
        if self.is_running() {
            log::info!("stopping {}", self.binary.display());
        }
        self.stop();
    }

    /// Kill the current instance, if any, and start a new one.
    /// Failures are logged and the supervisor carries on:
    /// if the launch failed, the next restart simply tries again.
    pub fn restart(&mut self) {
        self.stop();
        log::info!("{}", self.command_line());
        match self.launcher.launch(&self.binary, &self.args) {
            Ok(child) => self.child = Some(child),
            Err(err) => log::error!("Failed to start {}: {}", self.binary.display(), err),
        }
    }

    /// Kill the current instance, if any.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                log::error!("Failed to stop {}: {}", self.binary.display(), err);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    fn command_line(&self) -> String {
        std::iter::once(self.binary.as_os_str())
            .chain(self.args.iter().map(|arg| arg.as_os_str()))
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<L: Launcher> Drop for Supervisor<L> {
    fn drop(&mut self) {
        self.stop();
    }
}
