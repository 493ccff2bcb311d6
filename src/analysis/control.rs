//! Cross-thread lifecycle and option control

use crate::config::SyncOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Shared handle for pausing, stopping and reconfiguring a running process
///
/// All methods take `&self`; wrap in an `Arc` to use from other threads.
/// Flags are checked between cycles, so a cycle in progress always completes.
#[derive(Debug)]
pub struct ProcessControl {
    exit: AtomicBool,
    running: AtomicBool,
    options: Mutex<SyncOptions>,
}

impl ProcessControl {
    /// Create a control block in the running state
    pub fn new(options: SyncOptions) -> Self {
        Self {
            exit: AtomicBool::new(false),
            running: AtomicBool::new(true),
            options: Mutex::new(options.normalized()),
        }
    }

    /// Ask the run loop to return after the current cycle
    pub fn exit(&self) {
        log::debug!("Audio process exit requested");
        self.exit.store(true, Ordering::SeqCst);
    }

    /// Stop processing cycles; the run loop idles until resumed
    pub fn pause(&self) {
        log::debug!("Audio process paused");
        self.running.store(false, Ordering::SeqCst);
    }

    /// Resume processing cycles after [`ProcessControl::pause`]
    pub fn resume(&self) {
        log::debug!("Audio process resumed");
        self.running.store(true, Ordering::SeqCst);
    }

    /// Whether exit was requested
    pub fn should_exit(&self) -> bool {
        self.exit.load(Ordering::SeqCst)
    }

    /// Whether the process is running (not paused)
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Replace the options; takes effect at the start of the next cycle
    pub fn set_options(&self, options: SyncOptions) {
        let options = options.normalized();
        log::debug!("Audio options updated: {:?}", options);
        *self.options.lock().unwrap_or_else(PoisonError::into_inner) = options;
    }

    /// Current options
    pub fn options(&self) -> SyncOptions {
        *self.options.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProcessControl {
    fn default() -> Self {
        Self::new(SyncOptions::default())
    }
}
