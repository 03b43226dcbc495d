// SPDX-License-Identifier: GPL-3.0-only

//! Injected frame-processing seam
//!
//! The engine does not know what gets drawn. Each render pass it hands the
//! injected [`FrameProcessor`] a [`FrameContext`] carrying the latest
//! camera frame and the registered output windows, and presents every
//! bound surface after the processor returns. Presentation is implicit;
//! processors only draw.

use crate::errors::GraphicsError;
use crate::graphics::{GraphicsApi, GraphicsContextSet};

/// Drawing logic injected into the render worker
///
/// All methods run on the worker thread.
pub trait FrameProcessor<A: GraphicsApi, F>: Send {
    /// Minimum client API generation the processor's drawing calls require
    ///
    /// Used when negotiating the graphics configuration and contexts.
    fn required_client_version(&self) -> u32;

    /// Called when a session resumes, before any render pass
    fn on_resume(&mut self) {}

    /// Called on pause, before graphics resources are torn down
    fn on_pause(&mut self) {}

    /// Draw the current frame
    ///
    /// Graphics resources are allocated when this runs. The engine presents
    /// every bound surface after an `Ok` return; an `Err` aborts the pass
    /// and tears the graphics state down for a clean retry.
    fn process(&mut self, ctx: &mut FrameContext<'_, A, F>) -> Result<(), GraphicsError>;
}

/// Everything a processor may touch during one render pass
///
/// Assembled by the engine on the worker thread for each pass. The frame is
/// the one published at execution time, which may be newer than the frame
/// current when the pass was requested.
pub struct FrameContext<'a, A: GraphicsApi, F> {
    api: &'a mut A,
    contexts: &'a GraphicsContextSet<A>,
    frame: Option<F>,
    client_version: u32,
}

impl<'a, A: GraphicsApi, F> FrameContext<'a, A, F> {
    pub fn new(
        api: &'a mut A,
        contexts: &'a GraphicsContextSet<A>,
        frame: Option<F>,
        client_version: u32,
    ) -> Self {
        Self {
            api,
            contexts,
            frame,
            client_version,
        }
    }

    /// Latest published camera frame, if any
    pub fn frame(&self) -> Option<&F> {
        self.frame.as_ref()
    }

    /// Output windows with live graphics resources, in registration order
    pub fn windows(&self) -> Vec<A::Window> {
        self.contexts.windows().cloned().collect()
    }

    /// Make the given window's surface and context current for drawing
    pub fn activate(&mut self, window: &A::Window) -> Result<(), GraphicsError> {
        self.contexts.activate(self.api, window)
    }

    /// Negotiated client API generation of the bound contexts
    pub fn client_version(&self) -> u32 {
        self.client_version
    }
}
