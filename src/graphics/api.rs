// SPDX-License-Identifier: GPL-3.0-only

//! Capability trait for the native graphics API

use crate::config::ContextPreferences;
use std::fmt;

/// Error word read back from the native graphics API
///
/// The values follow the EGL error space, which is what every backend we
/// target reports. Unknown words are preserved and displayed in hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeErrorFlags(pub u32);

impl NativeErrorFlags {
    pub const SUCCESS: Self = Self(0x3000);
    pub const NOT_INITIALIZED: Self = Self(0x3001);
    pub const BAD_ACCESS: Self = Self(0x3002);
    pub const BAD_ALLOC: Self = Self(0x3003);
    pub const BAD_ATTRIBUTE: Self = Self(0x3004);
    pub const BAD_CONFIG: Self = Self(0x3005);
    pub const BAD_CONTEXT: Self = Self(0x3006);
    pub const BAD_CURRENT_SURFACE: Self = Self(0x3007);
    pub const BAD_DISPLAY: Self = Self(0x3008);
    pub const BAD_MATCH: Self = Self(0x3009);
    pub const BAD_NATIVE_PIXMAP: Self = Self(0x300A);
    pub const BAD_NATIVE_WINDOW: Self = Self(0x300B);
    pub const BAD_PARAMETER: Self = Self(0x300C);
    pub const BAD_SURFACE: Self = Self(0x300D);
    pub const CONTEXT_LOST: Self = Self(0x300E);

    /// Well-known name for this error word, if any
    pub fn name(&self) -> Option<&'static str> {
        match self.0 {
            0x3000 => Some("SUCCESS"),
            0x3001 => Some("NOT_INITIALIZED"),
            0x3002 => Some("BAD_ACCESS"),
            0x3003 => Some("BAD_ALLOC"),
            0x3004 => Some("BAD_ATTRIBUTE"),
            0x3005 => Some("BAD_CONFIG"),
            0x3006 => Some("BAD_CONTEXT"),
            0x3007 => Some("BAD_CURRENT_SURFACE"),
            0x3008 => Some("BAD_DISPLAY"),
            0x3009 => Some("BAD_MATCH"),
            0x300A => Some("BAD_NATIVE_PIXMAP"),
            0x300B => Some("BAD_NATIVE_WINDOW"),
            0x300C => Some("BAD_PARAMETER"),
            0x300D => Some("BAD_SURFACE"),
            0x300E => Some("CONTEXT_LOST"),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == Self::SUCCESS
    }
}

impl fmt::Display for NativeErrorFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:04X})", name, self.0),
            None => write!(f, "unknown error 0x{:04X}", self.0),
        }
    }
}

/// Native graphics API capability
///
/// Implemented by the platform layer and handed to the engine; the engine
/// only ever calls it from the render worker thread. Handle types are opaque
/// to the engine and only stored, compared and passed back.
///
/// Fallible calls return `Option`/`bool`. After a failure the engine reads
/// [`GraphicsApi::last_error`] once to capture the native error flags, which
/// mirrors how the underlying APIs report errors out of band.
pub trait GraphicsApi {
    // ===== Handle types =====

    /// Connection to the display subsystem
    type Display: Copy + fmt::Debug;
    /// Negotiated pixel format configuration
    type Config: Copy + fmt::Debug;
    /// Rendering context
    type Context: Copy + fmt::Debug;
    /// Drawable surface bound to an output window
    type Surface: Copy + fmt::Debug;
    /// Identity of an output surface supplied by the UI layer
    type Window: Clone + PartialEq + fmt::Debug;

    // ===== Display lifecycle =====

    /// Obtain the default display connection
    fn get_display(&mut self) -> Option<Self::Display>;

    /// Initialize the display connection
    fn initialize_display(&mut self, display: Self::Display) -> bool;

    /// Release the display connection and every resource still owned by it
    fn terminate_display(&mut self, display: Self::Display) -> bool;

    // ===== Configuration =====

    /// Negotiate a pixel format configuration
    ///
    /// Channel depths in `preferences` are minimums; `client_version` is the
    /// rendering API generation the configuration must be able to serve.
    fn choose_config(
        &mut self,
        display: Self::Display,
        preferences: &ContextPreferences,
        client_version: u32,
    ) -> Option<Self::Config>;

    // ===== Contexts and surfaces =====

    /// Create a rendering context for the given client API generation
    fn create_context(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        client_version: u32,
    ) -> Option<Self::Context>;

    /// Create a drawable surface backed by an output window
    fn create_window_surface(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        window: &Self::Window,
    ) -> Option<Self::Surface>;

    /// Bind a surface and context to the calling thread
    ///
    /// Passing `None` for both unbinds whatever is current.
    fn make_current(
        &mut self,
        display: Self::Display,
        surface: Option<Self::Surface>,
        context: Option<Self::Context>,
    ) -> bool;

    /// Publish the back buffer of a drawable surface
    fn swap_buffers(&mut self, display: Self::Display, surface: Self::Surface) -> bool;

    /// Destroy a drawable surface
    fn destroy_surface(&mut self, display: Self::Display, surface: Self::Surface) -> bool;

    /// Destroy a rendering context
    fn destroy_context(&mut self, display: Self::Display, context: Self::Context) -> bool;

    // ===== Error reporting =====

    /// Error flags for the most recent failed call on this thread
    fn last_error(&mut self) -> NativeErrorFlags;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_flags_have_names() {
        assert_eq!(NativeErrorFlags::SUCCESS.name(), Some("SUCCESS"));
        assert_eq!(NativeErrorFlags::BAD_SURFACE.name(), Some("BAD_SURFACE"));
        assert_eq!(NativeErrorFlags::CONTEXT_LOST.name(), Some("CONTEXT_LOST"));
    }

    #[test]
    fn test_unknown_flags_display_as_hex() {
        let flags = NativeErrorFlags(0x9999);
        assert_eq!(flags.name(), None);
        assert_eq!(flags.to_string(), "unknown error 0x9999");
    }

    #[test]
    fn test_display_includes_name_and_value() {
        assert_eq!(
            NativeErrorFlags::BAD_CONFIG.to_string(),
            "BAD_CONFIG (0x3005)"
        );
    }

    #[test]
    fn test_success_predicate() {
        assert!(NativeErrorFlags::SUCCESS.is_success());
        assert!(!NativeErrorFlags::BAD_ALLOC.is_success());
    }
}
