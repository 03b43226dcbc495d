// SPDX-License-Identifier: GPL-3.0-only

//! Autofocus event routing
//!
//! The capture subsystem reports per-frame results on its own callback
//! thread. This module folds the raw autofocus state into a small event
//! type and fans each event out to the UI-supplied callbacks, requesting a
//! render pass once focus has settled. Rendering only on focus acquisition
//! keeps the preview sharp without redrawing during every scan step.

use std::sync::Arc;
use tracing::trace;

/// Callback invoked when a focus phase is entered
pub type FocusCallback = Arc<dyn Fn() + Send + Sync>;

/// Raw autofocus state attached to a capture result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutofocusState {
    /// Autofocus is off or has not started
    Inactive,
    /// Continuous autofocus is scanning
    PassiveScan,
    /// Continuous autofocus settled on a subject
    PassivelyFocused,
    /// A triggered focus sweep is running
    ActiveScan,
    /// A triggered sweep succeeded and the lens is locked
    FocusedLocked,
    /// A triggered sweep failed and the lens is locked
    NotFocusedLocked,
    /// Continuous autofocus gave up without converging
    PassiveUnfocused,
}

/// Discrete capture-session event driving the focus callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A capture cycle began
    CaptureStarted,
    /// The autofocus is still searching
    Focusing,
    /// The autofocus settled on a subject
    Focused,
}

impl CaptureEvent {
    /// Classify a completed capture result by its autofocus state
    ///
    /// Only a passively focused sensor counts as focused. Locked states are
    /// treated as still searching: a continuous preview never triggers
    /// sweeps, so a lock means the controller is in a transitional state
    /// and the next results will re-enter the passive cycle.
    pub fn from_capture_result(state: AutofocusState) -> Self {
        match state {
            AutofocusState::PassivelyFocused => CaptureEvent::Focused,
            _ => CaptureEvent::Focusing,
        }
    }
}

/// UI reactions to focus phases
///
/// Every callback defaults to a no-op, so callers only wire up the phases
/// they care about.
#[derive(Clone)]
pub struct FocusCallbacks {
    pub on_focus_started: FocusCallback,
    pub on_focusing: FocusCallback,
    pub on_focused: FocusCallback,
    pub on_render_skipped: FocusCallback,
}

impl FocusCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_focus_started(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_focus_started = Arc::new(callback);
        self
    }

    pub fn with_focusing(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_focusing = Arc::new(callback);
        self
    }

    pub fn with_focused(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_focused = Arc::new(callback);
        self
    }

    pub fn with_render_skipped(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_render_skipped = Arc::new(callback);
        self
    }
}

impl Default for FocusCallbacks {
    fn default() -> Self {
        let noop: FocusCallback = Arc::new(|| {});
        Self {
            on_focus_started: Arc::clone(&noop),
            on_focusing: Arc::clone(&noop),
            on_focused: Arc::clone(&noop),
            on_render_skipped: noop,
        }
    }
}

/// Stateless dispatcher from capture events to focus callbacks
///
/// Holds no history: each event is routed on its own, so events may arrive
/// from any thread in any order the capture subsystem produces them.
pub struct FocusRouter {
    callbacks: FocusCallbacks,
}

impl FocusRouter {
    pub fn new(callbacks: FocusCallbacks) -> Self {
        Self { callbacks }
    }

    /// Route one capture event to the matching callback
    ///
    /// `request_render` is invoked only for [`CaptureEvent::Focused`]. A
    /// `false` return means the render was not admitted and the skipped
    /// callback fires instead, which is how the UI learns that the preview
    /// kept its previous frame.
    pub fn dispatch(&self, event: CaptureEvent, request_render: impl FnOnce() -> bool) {
        trace!(event = ?event, "Dispatching capture event");
        match event {
            CaptureEvent::CaptureStarted => (self.callbacks.on_focus_started)(),
            CaptureEvent::Focusing => (self.callbacks.on_focusing)(),
            CaptureEvent::Focused => {
                (self.callbacks.on_focused)();
                if !request_render() {
                    (self.callbacks.on_render_skipped)();
                }
            }
        }
    }
}
