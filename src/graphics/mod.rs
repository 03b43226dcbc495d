// SPDX-License-Identifier: GPL-3.0-only

//! Native graphics abstraction and resource lifecycle
//!
//! The engine never talks to a concrete graphics library. It is handed an
//! implementation of [`GraphicsApi`] and drives it through
//! [`GraphicsContextSet`], which owns the display/config/context/surface
//! lifecycle for every registered output surface.
//!
//! # Modules
//!
//! - [`api`]: the capability trait implemented by native graphics backends
//! - [`context_set`]: allocation, activation, presentation and teardown

pub mod api;
pub mod context_set;

pub use api::{GraphicsApi, NativeErrorFlags};
pub use context_set::GraphicsContextSet;
