// SPDX-License-Identifier: GPL-3.0-only

//! Worker-confined rendering
//!
//! The rendering half of the engine: a dedicated worker thread whose state
//! never leaves it, the late-bound frame cell it reads from, and the
//! processor seam that supplies the actual drawing code.

pub mod frame_source;
pub mod processor;
pub mod worker;

pub use frame_source::FrameSource;
pub use processor::{FrameContext, FrameProcessor};
pub use worker::{RenderWorker, ThreadPolicy};
