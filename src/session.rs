// SPDX-License-Identifier: GPL-3.0-only

//! Preview session lifecycle
//!
//! [`PreviewSession`] is the object the UI layer talks to. It owns the
//! render worker, keeps the graphics context set confined to that worker,
//! shares the late-bound frame source with the UI, and maps the platform
//! lifecycle onto all of them: resume spins the worker up, pause drains and
//! tears it down, surface changes re-register outputs, capture events run
//! through the focus router and may trigger a render pass.

use crate::config::ContextPreferences;
use crate::errors::{EngineError, GraphicsError, SelectionError};
use crate::focus::{CaptureEvent, FocusCallbacks, FocusRouter};
use crate::graphics::{GraphicsApi, GraphicsContextSet};
use crate::render::{FrameContext, FrameProcessor, FrameSource, RenderWorker, ThreadPolicy};
use crate::selection::{self, Resolution};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Graphics state confined to the render worker thread
///
/// Built by the worker's init closure and destroyed by its finish closure,
/// so neither the API object nor the native handles in the context set ever
/// cross a thread boundary.
struct RenderState<A: GraphicsApi> {
    api: A,
    contexts: GraphicsContextSet<A>,
}

type SharedProcessor<A, F> = Arc<Mutex<dyn FrameProcessor<A, F>>>;

/// Camera preview session binding worker, graphics, frames and focus
///
/// `A` is the native graphics API implementation, `F` the camera frame
/// handle type published by the platform layer.
pub struct PreviewSession<A: GraphicsApi + 'static, F: 'static> {
    api_factory: Arc<dyn Fn() -> A + Send + Sync>,
    processor: SharedProcessor<A, F>,
    frame_source: FrameSource<F>,
    windows: Vec<A::Window>,
    preferences: ContextPreferences,
    router: FocusRouter,
    worker: Option<RenderWorker<RenderState<A>>>,
}

impl<A, F> PreviewSession<A, F>
where
    A: GraphicsApi + 'static,
    A::Window: Send,
    F: Clone + Send + 'static,
{
    /// Create a paused session around an API factory and a frame processor
    ///
    /// The factory runs on the worker thread at resume time; the API object
    /// it builds never leaves that thread.
    pub fn new<G, P>(
        api_factory: G,
        processor: P,
        preferences: ContextPreferences,
        callbacks: FocusCallbacks,
    ) -> Self
    where
        G: Fn() -> A + Send + Sync + 'static,
        P: FrameProcessor<A, F> + 'static,
    {
        Self {
            api_factory: Arc::new(api_factory),
            processor: Arc::new(Mutex::new(processor)),
            frame_source: FrameSource::new(),
            windows: Vec::new(),
            preferences,
            router: FocusRouter::new(callbacks),
            worker: None,
        }
    }

    /// Handle for publishing camera frames into the session
    pub fn frame_source(&self) -> FrameSource<F> {
        self.frame_source.clone()
    }

    /// Whether the render worker is currently running
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Register the output windows and publish the first frame handle
    ///
    /// Graphics resources for the windows are allocated lazily, on the
    /// worker thread, when the first render pass runs.
    pub fn on_surface_available(&mut self, windows: Vec<A::Window>, frame: F) {
        debug!(windows = windows.len(), "Output surfaces available");
        self.windows = windows;
        self.frame_source.publish(frame);
    }

    /// Drop the published frame handle after the preview surface went away
    pub fn on_surface_destroyed(&mut self) {
        debug!("Preview surface destroyed, clearing frame source");
        self.frame_source.clear();
    }

    /// Start the render worker
    ///
    /// The processor's resume hook runs on the worker before anything else.
    /// Resuming a running session is a logged no-op.
    pub fn on_resume(&mut self) {
        if self.worker.is_some() {
            debug!("Session resume requested while already running");
            return;
        }
        info!("Resuming preview session");

        let factory = Arc::clone(&self.api_factory);
        let pause_processor = Arc::clone(&self.processor);
        let worker = RenderWorker::spawn(
            "preview-render",
            move || RenderState {
                api: factory(),
                contexts: GraphicsContextSet::new(),
            },
            move |state| {
                lock_processor(&pause_processor).on_pause();
                state.contexts.teardown(&mut state.api);
            },
        );

        let resume_processor = Arc::clone(&self.processor);
        worker.submit(
            move |_state| {
                lock_processor(&resume_processor).on_resume();
                Ok(())
            },
            ThreadPolicy::WaitPending,
        );
        self.worker = Some(worker);
    }

    /// Stop the worker and release all graphics resources
    ///
    /// Blocks until an in-flight render pass completes, then runs the
    /// processor's pause hook and the graphics teardown on the worker
    /// thread before joining it. Returns the last unreported render error.
    /// Pausing a paused session is a logged no-op.
    pub fn on_pause(&mut self) -> Result<(), EngineError> {
        let Some(mut worker) = self.worker.take() else {
            debug!("Session pause requested while not running");
            return Ok(());
        };
        info!("Pausing preview session");
        worker.stop()
    }

    /// Route a capture-session event through the focus callbacks
    ///
    /// A `Focused` event attempts one render pass with
    /// [`ThreadPolicy::SkipPending`]; if the worker is still drawing the
    /// previous frame the pass is dropped and the skipped callback fires.
    /// Safe to call from the capture subsystem's callback thread.
    pub fn handle_capture_event(&self, event: CaptureEvent) {
        self.router
            .dispatch(event, || self.request_render(ThreadPolicy::SkipPending));
    }

    /// Submit one render pass under the given admission policy
    ///
    /// Returns whether the pass was admitted. The frame drawn is the one
    /// published at execution time, not at submission time. While the
    /// session is paused no pass is admitted.
    pub fn request_render(&self, policy: ThreadPolicy) -> bool {
        let Some(worker) = self.worker.as_ref() else {
            debug!("Render requested while session is paused");
            return false;
        };
        let processor = Arc::clone(&self.processor);
        let frame_source = self.frame_source.clone();
        let windows = self.windows.clone();
        let preferences = self.preferences;
        worker.submit(
            move |state| render_pass(state, &processor, &frame_source, &windows, &preferences),
            policy,
        )
    }

    /// Pick the capture resolution that best fits an output surface
    ///
    /// Runs on the calling thread; resolution selection is independent of
    /// the render loop.
    pub fn select_capture_resolution(
        &self,
        candidates: &[Resolution],
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Resolution, SelectionError> {
        selection::select_closest(candidates, surface_width, surface_height)
    }
}

/// Lock the shared processor, surviving a poisoned mutex
///
/// A panicking processor unwinds out of a render pass with this lock still
/// held and poisons it. The worker records the panic and keeps running, and
/// the pause hook, the graphics teardown and any later passes all need the
/// processor afterwards, so the poison flag is cleared rather than
/// propagated.
fn lock_processor<A, F>(
    processor: &SharedProcessor<A, F>,
) -> MutexGuard<'_, dyn FrameProcessor<A, F> + 'static>
where
    A: GraphicsApi,
{
    processor.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One full render pass on the worker thread
///
/// Allocates graphics resources on first use, lets the processor draw with
/// a fresh frame snapshot, then presents every bound surface. On any
/// graphics failure the resources are torn down before the error is
/// reported, so the next pass retries from a clean slate.
fn render_pass<A, F>(
    state: &mut RenderState<A>,
    processor: &SharedProcessor<A, F>,
    frame_source: &FrameSource<F>,
    windows: &[A::Window],
    preferences: &ContextPreferences,
) -> Result<(), EngineError>
where
    A: GraphicsApi,
    F: Clone,
{
    let mut processor = lock_processor(processor);
    let client_version = processor.required_client_version();

    if let Err(error) = draw_and_present(
        state,
        &mut *processor,
        frame_source,
        windows,
        preferences,
        client_version,
    ) {
        warn!(
            operation = error.operation,
            flags = %error.flags,
            "Render pass failed, tearing down graphics state"
        );
        state.contexts.teardown(&mut state.api);
        return Err(error.into());
    }
    Ok(())
}

fn draw_and_present<A, F>(
    state: &mut RenderState<A>,
    processor: &mut dyn FrameProcessor<A, F>,
    frame_source: &FrameSource<F>,
    windows: &[A::Window],
    preferences: &ContextPreferences,
    client_version: u32,
) -> Result<(), GraphicsError>
where
    A: GraphicsApi,
    F: Clone,
{
    state
        .contexts
        .ensure_ready(&mut state.api, windows, preferences, client_version)?;

    // Snapshot at execution time so the newest published frame wins.
    let frame = frame_source.snapshot();
    let mut ctx = FrameContext::new(&mut state.api, &state.contexts, frame, client_version);
    processor.process(&mut ctx)?;
    drop(ctx);

    state.contexts.present_all(&mut state.api)
}
