// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format preferences for native graphics setup

use serde::{Deserialize, Serialize};

/// Requested pixel format for rendering contexts and drawable surfaces
///
/// Passed to config negotiation when graphics resources are first allocated.
/// The native API treats channel depths as minimums and sorts candidate
/// configs, so alpha is requested as zero to let opaque configs sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPreferences {
    /// Red channel depth in bits
    pub red_bits: u32,
    /// Green channel depth in bits
    pub green_bits: u32,
    /// Blue channel depth in bits
    pub blue_bits: u32,
    /// Alpha channel depth in bits (zero prefers opaque configs)
    pub alpha_bits: u32,
    /// Depth buffer size in bits
    pub depth_bits: u32,
    /// Stencil buffer size in bits
    pub stencil_bits: u32,
}

impl Default for ContextPreferences {
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 0,   // Opaque preview, no blending against what is behind it
            depth_bits: 16,
            stencil_bits: 0,
        }
    }
}
