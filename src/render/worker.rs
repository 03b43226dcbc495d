// SPDX-License-Identifier: GPL-3.0-only

//! Single-slot render worker thread
//!
//! [`RenderWorker`] owns a dedicated thread and a piece of state that only
//! that thread can touch. The state is produced by an init closure running
//! on the worker itself, so types holding graphics handles never have to be
//! [`Send`]; callers only ship over closures that borrow the state.
//!
//! There is no queue. At most one task can be pending at a time and the
//! admission policy decides what happens when a second one arrives while
//! the worker is busy: [`ThreadPolicy::WaitPending`] blocks the submitter
//! until the slot frees up, [`ThreadPolicy::SkipPending`] drops the task on
//! the floor. Skipping is what keeps a continuous preview from building up
//! latency when frames arrive faster than they can be drawn.

use crate::errors::{EngineError, WorkerError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Admission rule applied when a task arrives while the worker is busy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPolicy {
    /// Block the submitter until the worker is idle, then install the task
    WaitPending,
    /// Reject the task immediately if the worker is busy
    SkipPending,
}

type Job<S> = Box<dyn FnOnce(&mut S) -> Result<(), EngineError> + Send + 'static>;

struct Slot<S: 'static> {
    busy: bool,
    job: Option<Job<S>>,
    shutdown: bool,
}

struct Shared<S: 'static> {
    slot: Mutex<Slot<S>>,
    signal: Condvar,
    last_error: Mutex<Option<EngineError>>,
}

/// Dedicated worker thread with single-slot task admission
///
/// `S` is the thread-confined state. It does not need to be [`Send`]; it is
/// created on the worker thread and destroyed there.
pub struct RenderWorker<S: 'static> {
    shared: Arc<Shared<S>>,
    thread_handle: Option<JoinHandle<()>>,
    name: String,
}

impl<S: 'static> RenderWorker<S> {
    /// Start the worker thread
    ///
    /// `init` runs first on the new thread and builds the confined state.
    /// `finish` runs on the same thread right before it exits and is the
    /// place to release resources held by the state.
    pub fn spawn<I, D>(name: &str, init: I, finish: D) -> Self
    where
        I: FnOnce() -> S + Send + 'static,
        D: FnOnce(&mut S) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot {
                busy: false,
                job: None,
                shutdown: false,
            }),
            signal: Condvar::new(),
            last_error: Mutex::new(None),
        });

        info!(name = %name, "Starting render worker");

        let thread_shared = Arc::clone(&shared);
        let thread_name = name.to_string();
        let thread_handle = thread::spawn(move || {
            debug!(name = %thread_name, "Render worker thread started");
            let mut state = init();

            loop {
                let job = {
                    let mut slot = thread_shared.slot.lock().unwrap();
                    loop {
                        if let Some(job) = slot.job.take() {
                            break Some(job);
                        }
                        if slot.shutdown {
                            break None;
                        }
                        slot = thread_shared.signal.wait(slot).unwrap();
                    }
                };
                let Some(job) = job else { break };

                match panic::catch_unwind(AssertUnwindSafe(|| job(&mut state))) {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => {
                        error!(name = %thread_name, error = %error, "Render task failed");
                        *thread_shared.last_error.lock().unwrap() = Some(error);
                    }
                    Err(payload) => {
                        let message = panic_message(payload);
                        error!(name = %thread_name, message = %message, "Render task panicked");
                        *thread_shared.last_error.lock().unwrap() =
                            Some(EngineError::Worker(WorkerError::TaskPanicked(message)));
                    }
                }

                let mut slot = thread_shared.slot.lock().unwrap();
                slot.busy = false;
                drop(slot);
                thread_shared.signal.notify_all();
            }

            finish(&mut state);
            debug!(name = %thread_name, "Render worker thread exiting");
        });

        Self {
            shared,
            thread_handle: Some(thread_handle),
            name: name.to_string(),
        }
    }

    /// Submit a task for execution on the worker thread
    ///
    /// Returns whether the task was admitted. Submission and execution are
    /// decoupled: a `true` return means the task will run, not that it has.
    /// Errors the task produces later are recorded and surface through
    /// [`RenderWorker::take_error`] or [`RenderWorker::stop`]. After `stop`
    /// every submission returns `false`.
    pub fn submit<T>(&self, task: T, policy: ThreadPolicy) -> bool
    where
        T: FnOnce(&mut S) -> Result<(), EngineError> + Send + 'static,
    {
        let mut slot = self.shared.slot.lock().unwrap();
        match policy {
            ThreadPolicy::SkipPending => {
                if slot.busy || slot.shutdown {
                    debug!(name = %self.name, "Render worker busy, skipping task");
                    return false;
                }
            }
            ThreadPolicy::WaitPending => {
                while slot.busy && !slot.shutdown {
                    slot = self.shared.signal.wait(slot).unwrap();
                }
                if slot.shutdown {
                    debug!(name = %self.name, "Render worker stopped, rejecting task");
                    return false;
                }
            }
        }

        slot.job = Some(Box::new(task));
        slot.busy = true;
        drop(slot);
        self.shared.signal.notify_all();
        true
    }

    /// Whether a task is currently installed or executing
    pub fn is_busy(&self) -> bool {
        self.shared.slot.lock().unwrap().busy
    }

    /// Take the most recently recorded task error, if any
    ///
    /// Task errors cannot be returned from [`RenderWorker::submit`] because
    /// submission returns before execution. They are held until polled here
    /// or reported by [`RenderWorker::stop`].
    pub fn take_error(&self) -> Option<EngineError> {
        self.shared.last_error.lock().unwrap().take()
    }

    /// Stop the worker and join its thread
    ///
    /// Waits for an in-flight task to complete, runs the finish closure on
    /// the worker thread and joins it. Returns the last unreported task
    /// error, so a failure in the final render of a session is not lost.
    /// Idempotent; stopping a stopped worker returns `Ok`.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        let Some(handle) = self.thread_handle.take() else {
            return Ok(());
        };

        debug!(name = %self.name, "Stopping render worker");
        {
            let mut slot = self.shared.slot.lock().unwrap();
            while slot.busy {
                slot = self.shared.signal.wait(slot).unwrap();
            }
            slot.shutdown = true;
        }
        self.shared.signal.notify_all();

        if handle.join().is_err() {
            warn!(name = %self.name, "Render worker thread panicked");
            return Err(EngineError::Worker(WorkerError::ThreadPanicked));
        }
        info!(name = %self.name, "Render worker stopped");

        match self.take_error() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<S: 'static> Drop for RenderWorker<S> {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            warn!(name = %self.name, "Render worker dropped while running, stopping now");
            if let Err(error) = self.stop() {
                warn!(name = %self.name, error = %error, "Render worker error during drop");
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
