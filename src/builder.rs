//! Module polling the toolchain to keep the installed program up to date.

use anyhow::Context;
use std::io::Write;
use std::sync::mpsc::SyncSender;

use crate::target::BuildTarget;
use crate::ticker::Ticker;
use crate::toolchain::{Outcome, Toolchain};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of one install.
pub struct BuildAttempt {
    pub outcome: Outcome,
    /// Compiler diagnostics, empty unless the build failed.
    pub diagnostic: String,
}

pub struct Builder<T, W> {
    toolchain: T,
    target: BuildTarget,
    out: W,
    always_start: bool,
    last_diagnostic: String,
    last_error: Option<String>,
}

impl<T: Toolchain, W: Write> Builder<T, W> {
    /// Compiler diagnostics are printed to `out`.
    pub fn new(toolchain: T, target: BuildTarget, out: W) -> Builder<T, W> {
        Builder {
            toolchain,
            target,
            out,
            always_start: false,
            last_diagnostic: String::new(),
            last_error: None,
        }
    }

    /// Also start the program when the first build had nothing to do.
    pub fn always_start(mut self, always_start: bool) -> Builder<T, W> {
        self.always_start = always_start;
        self
    }

    /// Install the target once.
    /// Diagnostics are printed only if they differ from those of the previous attempt.
    pub fn attempt(&mut self) -> anyhow::Result<BuildAttempt> {
        let captured = self.toolchain.install(&self.target)?;
        let outcome = self.toolchain.classify(&captured);
        let diagnostic = match outcome {
            Outcome::Failure => String::from_utf8_lossy(&captured.stdout).into_owned(),
            Outcome::Success | Outcome::NoChange => String::new(),
        };
        if outcome == Outcome::Failure && diagnostic != self.last_diagnostic {
            self.out
                .write_all(&captured.stdout)
                .and_then(|()| self.out.flush())
                .context("Failed to print the compiler diagnostics")?;
        }
        if outcome == Outcome::Success && !captured.success {
            log::debug!(
                "install of {} exited with an error but printed nothing on stdout",
                self.target.import_path
            );
        }
        self.last_diagnostic = diagnostic.clone();
        Ok(BuildAttempt {
            outcome,
            diagnostic,
        })
    }

    /// Build once right away, then once per tick,
    /// and send a restart notification after every rebuild.
    ///
    /// Never fails: build errors are reported and the next tick tries again.
    /// Returns when the ticker stops or nobody listens to the notifications anymore.
    pub fn watch<K: Ticker>(&mut self, ticker: &mut K, restarts: &SyncSender<()>) {
        let start = match self.poll() {
            Some(Outcome::Success) => true,
            Some(Outcome::NoChange) => self.always_start,
            Some(Outcome::Failure) | None => false,
        };
        if start && restarts.send(()).is_err() {
            log::debug!("Nobody is waiting for restarts anymore");
            return;
        }
        while ticker.tick() {
            if self.poll() == Some(Outcome::Success) && restarts.send(()).is_err() {
                log::debug!("Nobody is waiting for restarts anymore");
                return;
            }
        }
    }

    fn poll(&mut self) -> Option<Outcome> {
        match self.attempt() {
            Ok(attempt) => {
                self.last_error = None;
                log::debug!(
                    "{}: {:?} ({} bytes of diagnostics)",
                    self.target.import_path,
                    attempt.outcome,
                    attempt.diagnostic.len()
                );
                Some(attempt.outcome)
            }
            Err(err) => {
                // Nothing was printed by the toolchain, so the next failure is new
                self.last_diagnostic.clear();
                let message = format!("{:#}", err);
                if self.last_error.as_ref() != Some(&message) {
                    log::error!("{}", message);
                }
                self.last_error = Some(message);
                None
            }
        }
    }
}
