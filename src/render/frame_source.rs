// SPDX-License-Identifier: GPL-3.0-only

//! Late-bound camera frame cell
//!
//! The UI thread publishes the newest camera frame handle here and the
//! render worker snapshots it when a render task actually executes, not
//! when it was submitted. A task that waited out a busy worker therefore
//! draws the frame that is current at draw time.

use std::sync::{Arc, Mutex};

/// Shared cell holding the most recent camera frame handle
///
/// Cloning yields another handle to the same cell.
pub struct FrameSource<F> {
    inner: Arc<Mutex<Option<F>>>,
}

impl<F> FrameSource<F> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the current frame handle
    pub fn publish(&self, frame: F) {
        *self.inner.lock().unwrap() = Some(frame);
    }

    /// Drop the current frame handle, e.g. when the preview surface dies
    pub fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_none()
    }
}

impl<F: Clone> FrameSource<F> {
    /// Copy of the frame handle current at this instant
    pub fn snapshot(&self) -> Option<F> {
        self.inner.lock().unwrap().clone()
    }
}

impl<F> Clone for FrameSource<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F> Default for FrameSource<F> {
    fn default() -> Self {
        Self::new()
    }
}
