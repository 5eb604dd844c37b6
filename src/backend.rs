//! The platform boundary: native window handles, per-window operations
//! and the factory that turns an elevated widget into a window.
//!
//! The toolkit core never talks to a windowing system directly. A
//! [`Backend`] creates [`NativeView`]s; everything platform-specific
//! (realization, reparenting, redraw scheduling, surfaces) hides behind
//! those two traits, so the whole event and paint pipeline is testable
//! with a mock backend.

use bitflags::bitflags;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};

use crate::geometry::Rect;
use crate::graphics::Surface;
use crate::tree::{Tree, WidgetId};
use crate::view::ViewId;

/// An opaque native window reference (an X11 `Window`, a Win32 `HWND`,
/// an NSView pointer, a Wayland surface pointer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub usize);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Extract a handle from anything implementing the windowing
    /// interop trait, e.g. a host-provided parent window.
    pub fn from_window(window: &impl HasWindowHandle) -> Option<NativeHandle> {
        window
            .window_handle()
            .ok()
            .and_then(|h| Self::from_raw(h.as_raw()))
    }

    pub fn from_raw(raw: RawWindowHandle) -> Option<NativeHandle> {
        let value = match raw {
            RawWindowHandle::Xlib(h) => h.window as usize,
            RawWindowHandle::Xcb(h) => h.window.get() as usize,
            RawWindowHandle::Wayland(h) => h.surface.as_ptr() as usize,
            RawWindowHandle::Win32(h) => h.hwnd.get() as usize,
            RawWindowHandle::AppKit(h) => h.ns_view.as_ptr() as usize,
            _ => return None,
        };
        Some(NativeHandle(value))
    }
}

impl Default for NativeHandle {
    fn default() -> Self {
        Self::NULL
    }
}

bitflags! {
    /// Hints applied to a native window when a widget is elevated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewFlags: u32 {
        const RESIZABLE = 1 << 0;
    }
}

/// Operations the toolkit performs on one native window.
#[allow(unused_variables)]
pub trait NativeView {
    fn handle(&self) -> NativeHandle;

    /// Reparent under another native window (embedding).
    fn set_parent(&mut self, parent: NativeHandle);

    fn set_bounds(&mut self, bounds: Rect);
    fn bounds(&self) -> Rect;

    fn set_visible(&mut self, visible: bool);
    fn visible(&self) -> bool;

    /// Create the underlying platform resources. Until a view is
    /// realized it receives no events and cannot paint.
    fn realize(&mut self);

    fn scale_factor(&self) -> f32 {
        1.0
    }

    /// Ask the platform to deliver an expose for `region` (view space).
    fn request_redraw(&mut self, region: Rect);

    /// The drawing surface for the current expose.
    fn surface(&mut self) -> &mut dyn Surface;

    fn apply_flags(&mut self, flags: ViewFlags) {}
}

/// Factory for native views.
///
/// `create_view` receives the tree read-only so a backend can size the
/// window from the widget's bounds; returning `None` reports that the
/// platform refused the window.
pub trait Backend {
    fn name(&self) -> &str;

    fn create_view(
        &mut self,
        tree: &Tree,
        widget: WidgetId,
        view: ViewId,
    ) -> Option<Box<dyn NativeView>>;
}
