// SPDX-License-Identifier: GPL-3.0-only

//! Per-surface graphics resource lifecycle
//!
//! [`GraphicsContextSet`] owns the native handles behind a rendering
//! session: one display connection, one negotiated configuration, and a
//! (rendering context, drawable surface) pair for every registered output
//! window. Allocation is all-or-nothing: either the whole set is live or
//! none of it is, so a failed setup can always be recovered by calling
//! [`GraphicsContextSet::teardown`].
//!
//! Every method must run on the render worker thread. The engine enforces
//! this by constructing the set inside the worker's init closure; the type
//! itself never crosses a thread boundary.

use crate::config::ContextPreferences;
use crate::errors::GraphicsError;
use crate::graphics::api::{GraphicsApi, NativeErrorFlags};
use tracing::{debug, warn};

/// Native handles bound to one output window
struct SurfaceBinding<A: GraphicsApi> {
    context: A::Context,
    surface: A::Surface,
}

/// Owner of all native graphics handles for a rendering session
pub struct GraphicsContextSet<A: GraphicsApi> {
    display: Option<A::Display>,
    config: Option<A::Config>,
    bindings: Vec<(A::Window, SurfaceBinding<A>)>,
}

impl<A: GraphicsApi> GraphicsContextSet<A> {
    pub fn new() -> Self {
        Self {
            display: None,
            config: None,
            bindings: Vec::new(),
        }
    }

    /// Whether the full set of native resources is currently allocated
    ///
    /// Allocation is all-or-nothing, so the display handle stands in for
    /// the whole set.
    pub fn is_allocated(&self) -> bool {
        self.display.is_some()
    }

    /// Output windows with live resources, in registration order
    pub fn windows(&self) -> impl Iterator<Item = &A::Window> {
        self.bindings.iter().map(|(window, _)| window)
    }

    fn binding_for(&self, window: &A::Window) -> Option<&SurfaceBinding<A>> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == window)
            .map(|(_, binding)| binding)
    }

    fn ensure<T>(result: Option<T>, api: &mut A, operation: &'static str) -> Result<T, GraphicsError> {
        match result {
            Some(value) => Ok(value),
            None => Err(GraphicsError::new(operation, api.last_error())),
        }
    }

    fn ensure_flag(ok: bool, api: &mut A, operation: &'static str) -> Result<(), GraphicsError> {
        if ok {
            Ok(())
        } else {
            Err(GraphicsError::new(operation, api.last_error()))
        }
    }

    /// Allocate the full resource set if it is not allocated yet
    ///
    /// No-op when already allocated. Otherwise acquires and initializes the
    /// display, negotiates a configuration from `preferences` able to serve
    /// `client_version`, and creates a rendering context plus a drawable
    /// surface for every window. Handles are recorded as they are acquired,
    /// so after a mid-sequence failure `teardown` releases exactly what was
    /// created; the caller is expected to run it before propagating the
    /// error.
    pub fn ensure_ready(
        &mut self,
        api: &mut A,
        windows: &[A::Window],
        preferences: &ContextPreferences,
        client_version: u32,
    ) -> Result<(), GraphicsError> {
        if self.is_allocated() {
            return Ok(());
        }

        debug!(
            windows = windows.len(),
            client_version, "Allocating graphics resources"
        );

        let display = Self::ensure(api.get_display(), api, "get_display")?;
        self.display = Some(display);

        Self::ensure_flag(api.initialize_display(display), api, "initialize_display")?;

        let config = Self::ensure(
            api.choose_config(display, preferences, client_version),
            api,
            "choose_config",
        )?;
        self.config = Some(config);

        for window in windows {
            let context = Self::ensure(
                api.create_context(display, config, client_version),
                api,
                "create_context",
            )?;
            match api.create_window_surface(display, config, window) {
                Some(surface) => {
                    self.bindings
                        .push((window.clone(), SurfaceBinding { context, surface }));
                }
                None => {
                    // The context is not bound yet, release it here so the
                    // recovery teardown only sees recorded handles.
                    let error = GraphicsError::new("create_window_surface", api.last_error());
                    if !api.destroy_context(display, context) {
                        warn!(
                            flags = %api.last_error(),
                            "Failed to destroy context after surface creation failed"
                        );
                    }
                    return Err(error);
                }
            }
        }

        debug!(surfaces = self.bindings.len(), "Graphics resources ready");
        Ok(())
    }

    /// Make the given window's surface and context current
    ///
    /// Required before any drawing call aimed at that window.
    pub fn activate(&self, api: &mut A, window: &A::Window) -> Result<(), GraphicsError> {
        let Some(display) = self.display else {
            return Err(GraphicsError::new(
                "activate",
                NativeErrorFlags::NOT_INITIALIZED,
            ));
        };
        let Some(binding) = self.binding_for(window) else {
            return Err(GraphicsError::new("activate", NativeErrorFlags::BAD_SURFACE));
        };
        Self::ensure_flag(
            api.make_current(display, Some(binding.surface), Some(binding.context)),
            api,
            "make_current",
        )
    }

    /// Activate the window and publish its back buffer
    pub fn present(&self, api: &mut A, window: &A::Window) -> Result<(), GraphicsError> {
        self.activate(api, window)?;
        let Some(display) = self.display else {
            return Err(GraphicsError::new(
                "present",
                NativeErrorFlags::NOT_INITIALIZED,
            ));
        };
        let Some(binding) = self.binding_for(window) else {
            return Err(GraphicsError::new("present", NativeErrorFlags::BAD_SURFACE));
        };
        Self::ensure_flag(api.swap_buffers(display, binding.surface), api, "swap_buffers")
    }

    /// Present every bound window, in registration order
    pub fn present_all(&self, api: &mut A) -> Result<(), GraphicsError> {
        let Some(display) = self.display else {
            return Err(GraphicsError::new(
                "present_all",
                NativeErrorFlags::NOT_INITIALIZED,
            ));
        };
        for (_, binding) in &self.bindings {
            Self::ensure_flag(
                api.make_current(display, Some(binding.surface), Some(binding.context)),
                api,
                "make_current",
            )?;
            Self::ensure_flag(api.swap_buffers(display, binding.surface), api, "swap_buffers")?;
        }
        Ok(())
    }

    /// Release every allocated resource
    ///
    /// Idempotent: on an already-clean set this logs and returns. Substep
    /// failures are logged and teardown continues, since this method doubles
    /// as the recovery path for a partially-allocated set and must always
    /// leave the set empty. Order: unbind the current context, destroy every
    /// drawable surface, destroy every rendering context, drop the
    /// configuration, release the display.
    pub fn teardown(&mut self, api: &mut A) {
        if self.display.is_none() && self.config.is_none() && self.bindings.is_empty() {
            debug!("Graphics teardown requested with nothing allocated");
            return;
        }

        let Some(display) = self.display.take() else {
            // Bindings are only recorded after the display is acquired, so
            // there is nothing native left to release here.
            self.config = None;
            self.bindings.clear();
            return;
        };

        if !api.make_current(display, None, None) {
            warn!(flags = %api.last_error(), "Failed to unbind context during teardown");
        }
        for (window, binding) in &self.bindings {
            if !api.destroy_surface(display, binding.surface) {
                warn!(
                    window = ?window,
                    flags = %api.last_error(),
                    "Failed to destroy drawable surface"
                );
            }
        }
        for (window, binding) in &self.bindings {
            if !api.destroy_context(display, binding.context) {
                warn!(
                    window = ?window,
                    flags = %api.last_error(),
                    "Failed to destroy rendering context"
                );
            }
        }
        self.bindings.clear();
        self.config = None;
        if !api.terminate_display(display) {
            warn!(flags = %api.last_error(), "Failed to release display during teardown");
        }
        debug!("Graphics resources released");
    }
}

impl<A: GraphicsApi> Default for GraphicsContextSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Handle(u32);

    /// Scripted in-memory graphics API tracking live handle counts
    #[derive(Default)]
    struct ScriptedApi {
        calls: Vec<String>,
        fail_on: Option<&'static str>,
        next_handle: u32,
        live_surfaces: i32,
        live_contexts: i32,
        display_open: bool,
    }

    impl ScriptedApi {
        fn failing(operation: &'static str) -> Self {
            Self {
                fail_on: Some(operation),
                ..Self::default()
            }
        }

        fn fails(&self, operation: &'static str) -> bool {
            self.fail_on == Some(operation)
        }

        fn fresh(&mut self) -> Handle {
            self.next_handle += 1;
            Handle(self.next_handle)
        }
    }

    impl GraphicsApi for ScriptedApi {
        type Display = Handle;
        type Config = Handle;
        type Context = Handle;
        type Surface = Handle;
        type Window = String;

        fn get_display(&mut self) -> Option<Handle> {
            self.calls.push("get_display".into());
            if self.fails("get_display") {
                return None;
            }
            self.display_open = true;
            Some(Handle(1))
        }

        fn initialize_display(&mut self, _display: Handle) -> bool {
            self.calls.push("initialize_display".into());
            !self.fails("initialize_display")
        }

        fn terminate_display(&mut self, _display: Handle) -> bool {
            self.calls.push("terminate_display".into());
            self.display_open = false;
            true
        }

        fn choose_config(
            &mut self,
            _display: Handle,
            _preferences: &ContextPreferences,
            _client_version: u32,
        ) -> Option<Handle> {
            self.calls.push("choose_config".into());
            if self.fails("choose_config") {
                return None;
            }
            Some(self.fresh())
        }

        fn create_context(
            &mut self,
            _display: Handle,
            _config: Handle,
            _client_version: u32,
        ) -> Option<Handle> {
            self.calls.push("create_context".into());
            if self.fails("create_context") {
                return None;
            }
            self.live_contexts += 1;
            Some(self.fresh())
        }

        fn create_window_surface(
            &mut self,
            _display: Handle,
            _config: Handle,
            window: &String,
        ) -> Option<Handle> {
            self.calls.push(format!("create_window_surface:{window}"));
            if self.fails("create_window_surface") {
                return None;
            }
            self.live_surfaces += 1;
            Some(self.fresh())
        }

        fn make_current(
            &mut self,
            _display: Handle,
            surface: Option<Handle>,
            _context: Option<Handle>,
        ) -> bool {
            self.calls.push(if surface.is_some() {
                "make_current".into()
            } else {
                "make_current:none".into()
            });
            !self.fails("make_current")
        }

        fn swap_buffers(&mut self, _display: Handle, _surface: Handle) -> bool {
            self.calls.push("swap_buffers".into());
            !self.fails("swap_buffers")
        }

        fn destroy_surface(&mut self, _display: Handle, _surface: Handle) -> bool {
            self.calls.push("destroy_surface".into());
            if self.fails("destroy_surface") {
                return false;
            }
            self.live_surfaces -= 1;
            true
        }

        fn destroy_context(&mut self, _display: Handle, _context: Handle) -> bool {
            self.calls.push("destroy_context".into());
            if self.fails("destroy_context") {
                return false;
            }
            self.live_contexts -= 1;
            true
        }

        fn last_error(&mut self) -> NativeErrorFlags {
            NativeErrorFlags::BAD_ALLOC
        }
    }

    fn windows(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_ensure_ready_allocates_every_window() {
        let mut api = ScriptedApi::default();
        let mut set = GraphicsContextSet::new();
        set.ensure_ready(
            &mut api,
            &windows(&["left", "right"]),
            &ContextPreferences::default(),
            3,
        )
        .unwrap();

        assert!(set.is_allocated());
        assert_eq!(api.live_contexts, 2);
        assert_eq!(api.live_surfaces, 2);
        let surface_calls: Vec<&String> = api
            .calls
            .iter()
            .filter(|c| c.starts_with("create_window_surface"))
            .collect();
        assert_eq!(
            surface_calls,
            ["create_window_surface:left", "create_window_surface:right"]
        );
    }

    #[test]
    fn test_ensure_ready_is_idempotent() {
        let mut api = ScriptedApi::default();
        let mut set = GraphicsContextSet::new();
        let prefs = ContextPreferences::default();
        set.ensure_ready(&mut api, &windows(&["main"]), &prefs, 3).unwrap();
        let calls_after_first = api.calls.len();
        set.ensure_ready(&mut api, &windows(&["main"]), &prefs, 3).unwrap();
        assert_eq!(api.calls.len(), calls_after_first);
    }

    #[test]
    fn test_failed_config_reports_operation_and_flags() {
        let mut api = ScriptedApi::failing("choose_config");
        let mut set = GraphicsContextSet::new();
        let error = set
            .ensure_ready(&mut api, &windows(&["main"]), &ContextPreferences::default(), 3)
            .unwrap_err();
        assert_eq!(error.operation, "choose_config");
        assert_eq!(error.flags, NativeErrorFlags::BAD_ALLOC);
    }

    #[test]
    fn test_teardown_after_partial_allocation_releases_everything() {
        let mut failing = ScriptedApi::failing("create_window_surface");
        let mut partial = GraphicsContextSet::new();
        assert!(
            partial
                .ensure_ready(
                    &mut failing,
                    &windows(&["left"]),
                    &ContextPreferences::default(),
                    3
                )
                .is_err()
        );
        // The context created before the surface failure is destroyed inline.
        assert_eq!(failing.live_contexts, 0);

        partial.teardown(&mut failing);
        assert!(!partial.is_allocated());
        assert!(!failing.display_open);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut api = ScriptedApi::default();
        let mut set = GraphicsContextSet::new();
        set.ensure_ready(&mut api, &windows(&["main"]), &ContextPreferences::default(), 3)
            .unwrap();

        set.teardown(&mut api);
        assert_eq!(api.live_surfaces, 0);
        assert_eq!(api.live_contexts, 0);
        assert!(!api.display_open);

        let calls_after_first = api.calls.len();
        set.teardown(&mut api);
        // Second teardown touches no native handle.
        assert_eq!(api.calls.len(), calls_after_first);
    }

    #[test]
    fn test_teardown_continues_past_failing_substep() {
        let mut api = ScriptedApi::default();
        let mut set = GraphicsContextSet::new();
        set.ensure_ready(&mut api, &windows(&["main"]), &ContextPreferences::default(), 3)
            .unwrap();

        api.fail_on = Some("destroy_surface");
        set.teardown(&mut api);
        // The surface destroy failed but contexts and display were released.
        assert_eq!(api.live_contexts, 0);
        assert!(!api.display_open);
        assert!(!set.is_allocated());
    }

    #[test]
    fn test_activate_unknown_window() {
        let mut api = ScriptedApi::default();
        let mut set: GraphicsContextSet<ScriptedApi> = GraphicsContextSet::new();
        set.ensure_ready(&mut api, &windows(&["main"]), &ContextPreferences::default(), 3)
            .unwrap();

        let error = set.activate(&mut api, &"elsewhere".to_string()).unwrap_err();
        assert_eq!(error.operation, "activate");
        assert_eq!(error.flags, NativeErrorFlags::BAD_SURFACE);
    }

    #[test]
    fn test_activate_before_allocation() {
        let mut api = ScriptedApi::default();
        let set: GraphicsContextSet<ScriptedApi> = GraphicsContextSet::new();
        let error = set.activate(&mut api, &"main".to_string()).unwrap_err();
        assert_eq!(error.flags, NativeErrorFlags::NOT_INITIALIZED);
    }

    #[test]
    fn test_present_all_swaps_in_registration_order() {
        let mut api = ScriptedApi::default();
        let mut set = GraphicsContextSet::new();
        set.ensure_ready(
            &mut api,
            &windows(&["left", "right"]),
            &ContextPreferences::default(),
            3,
        )
        .unwrap();

        api.calls.clear();
        set.present_all(&mut api).unwrap();
        assert_eq!(
            api.calls,
            ["make_current", "swap_buffers", "make_current", "swap_buffers"]
        );
    }
}
