//! Module wiring the builder and the supervisor together.

use anyhow::Context;
use std::ffi::OsString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::mpsc::sync_channel;
use std::time::Duration;

use crate::builder::Builder;
use crate::supervisor::{ProcessLauncher, Supervisor};
use crate::ticker::IntervalTicker;
use crate::toolchain::{GoToolchain, Toolchain};

#[derive(Debug)]
/// Options passed as arguments.
pub struct Options {
    pub compiler: String,
    pub interval: Duration,
    pub always_start: bool,
    pub import_path: String,
    pub args: Vec<OsString>,
}

/// Resolve the target, then rebuild it and restart it until interrupted.
/// Only returns errors for the configuration.
pub fn main(options: Options) -> anyhow::Result<()> {
    log::info!(
        "setting up rerun for {} {:?}",
        options.import_path,
        options.args
    );

    let toolchain = GoToolchain::new(&options.compiler)?;
    let target = toolchain
        .resolve(&options.import_path)
        .context(format!("Invalid build target {}", options.import_path))?;
    log::debug!(
        "package {} ({}) is installed by {} at {}",
        target.package_name,
        target.name(),
        toolchain.path().display(),
        target.binary().display()
    );

    // Stop polling on Ctrl+C or SIGTERM so that the program is killed on the way out
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Failed to set the termination handler")?;

    // Rendezvous channel: a rebuild waits for the previous restart to be picked up.
    let (restarts, notifications) = sync_channel(0);
    let supervisor = Supervisor::new(ProcessLauncher, target.binary().to_path_buf(), options.args);
    let supervisor_thread = std::thread::Builder::new()
        .name("supervisor".to_string())
        .spawn(move || supervisor.run(notifications))
        .context("Failed to start the supervisor thread")?;

    let mut builder =
        Builder::new(toolchain, target, std::io::stdout()).always_start(options.always_start);
    builder.watch(&mut IntervalTicker::new(options.interval, running), &restarts);
    log::info!("shutting down");

    drop(restarts);
    supervisor_thread
        .join()
        .map_err(|_| anyhow::anyhow!("The supervisor thread panicked"))
}
