// SPDX-License-Identifier: MPL-2.0

//! Camera preview rendering core
//!
//! Everything a camera preview needs between the capture pipeline and the
//! screen: a render worker whose graphics state never leaves its thread, a
//! native-API-agnostic resource lifecycle, autofocus-synchronized render
//! scheduling and capture resolution selection.
//!
//! # Architecture
//!
//! - [`render`]: the single-slot [`RenderWorker`](render::RenderWorker),
//!   the late-bound [`FrameSource`](render::FrameSource) and the
//!   [`FrameProcessor`](render::FrameProcessor) seam that supplies drawing
//!   code
//! - [`graphics`]: the [`GraphicsApi`](graphics::GraphicsApi) capability
//!   trait and the [`GraphicsContextSet`](graphics::GraphicsContextSet)
//!   resource lifecycle built on it
//! - [`focus`]: capture event classification and callback routing
//! - [`selection`]: two-pass capture resolution selection
//! - [`session`]: [`PreviewSession`](session::PreviewSession), the owner
//!   object tying the above to the platform lifecycle
//! - [`shaders`]: snippet-based GLSL source assembly
//! - [`config`], [`errors`]: pixel format preferences and the error types
//!   shared by all of the above
//!
//! # Threading
//!
//! The render worker thread owns all graphics handles; they are created,
//! used and destroyed there and are never [`Send`]. The UI thread drives
//! the session lifecycle, the capture subsystem delivers focus events from
//! its own callback thread, and both only ever hand closures or plain data
//! across.

pub mod config;
pub mod errors;
pub mod focus;
pub mod graphics;
pub mod render;
pub mod selection;
pub mod session;
pub mod shaders;

pub use config::ContextPreferences;
pub use errors::{
    EngineError, EngineResult, GraphicsError, SelectionError, ShaderError, WorkerError,
};
pub use focus::{AutofocusState, CaptureEvent, FocusCallback, FocusCallbacks, FocusRouter};
pub use graphics::{GraphicsApi, GraphicsContextSet, NativeErrorFlags};
pub use render::{FrameContext, FrameProcessor, FrameSource, RenderWorker, ThreadPolicy};
pub use selection::{
    select_closest, select_resolution, Resolution, ResolutionCriterion, ShapeCriterion,
};
pub use session::PreviewSession;
pub use shaders::{AssembledShader, ShaderSnippet, ShaderVariable, StorageQualifier};
