//! Hosting foreign native windows inside the widget tree.
//!
//! [`Embed`] is a widget that reserves an area for externally-owned
//! native content (another plugin's editor, a video surface). It keeps a
//! *proxy*: a separate widget elevated into its own native window,
//! reparented under the window hosting the embed. Foreign code attaches
//! its content to [`Embed::host_view`]'s handle; the embed keeps the
//! proxy window glued to its own on-screen rectangle.
//!
//! The embed is inert until it sits inside a realized window, and stays
//! inert (logging why) when the platform refuses the proxy window.

use log::{debug, warn};

use crate::app::Main;
use crate::backend::{NativeHandle, ViewFlags};
use crate::geometry::{Point, Rect, Size};
use crate::graphics::Graphics;
use crate::style::{Color, Style};
use crate::tree::WidgetId;
use crate::widget::Widget;

/// Queries the geometry of foreign content attached under a native
/// handle, e.g. via `XQueryTree` on X11. Optional; used only for
/// logging size mismatches.
pub type GeometryProbe = Box<dyn Fn(NativeHandle) -> Option<Size>>;

/// The window-owning stand-in; foreign content covers it entirely.
struct Proxy;

impl Widget for Proxy {}

pub struct Embed {
    proxy: Option<WidgetId>,
    probe: Option<GeometryProbe>,
}

impl Embed {
    pub fn new() -> Self {
        Self {
            proxy: None,
            probe: None,
        }
    }

    pub fn with_probe(mut self, probe: GeometryProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// The native handle foreign content should attach itself under.
    /// `None` until the embed sits inside a realized window.
    pub fn host_view(&self, main: &Main) -> Option<NativeHandle> {
        let proxy = self.proxy.filter(|&p| main.tree().contains(p))?;
        main.view_handle(proxy)
    }

    /// The proxy mirrors the embed's rectangle, in the host window's
    /// space; a degenerate embed still keeps a minimal window alive.
    fn proxy_bounds(&self, main: &Main, id: WidgetId) -> Rect {
        let origin = main.tree().to_view_space(id, Point::ZERO);
        let bounds = main.tree().bounds(id);
        let (w, h) = if bounds.is_empty() {
            (1.0, 1.0)
        } else {
            (bounds.width, bounds.height)
        };
        Rect::new(origin.x, origin.y, w, h)
    }

    fn ensure_window(&mut self, main: &mut Main, id: WidgetId) {
        let Some(owner) = main.view_handle(id) else {
            // Not inside a realized window; tear the proxy down and wait
            // for the next structure notification.
            if let Some(proxy) = self.proxy.take() {
                main.destroy(proxy);
            }
            debug!("embed {:?} has no host window yet", id);
            return;
        };

        if let Some(proxy) = self.proxy {
            if main.tree().contains(proxy) && main.tree().elevated(proxy) {
                self.sync_geometry(main, id);
                return;
            }
            self.proxy = None;
        }

        let proxy = main.register(Proxy);
        main.set_bounds(proxy, self.proxy_bounds(main, id));
        match main.elevate(proxy, ViewFlags::empty(), owner) {
            Ok(view) => {
                debug!("embed {:?} created proxy view {:?}", id, view);
                self.proxy = Some(proxy);
            }
            Err(err) => {
                warn!("embed {:?} could not create proxy window: {}", id, err);
                main.destroy(proxy);
            }
        }
    }

    fn sync_geometry(&mut self, main: &mut Main, id: WidgetId) {
        let Some(proxy) = self.proxy.filter(|&p| main.tree().contains(p)) else {
            return;
        };
        let target = self.proxy_bounds(main, id);
        main.set_bounds(proxy, target);

        if let Some(probe) = &self.probe {
            if let Some(handle) = main.view_handle(proxy) {
                if let Some(actual) = probe(handle) {
                    if actual != target.size() {
                        debug!(
                            "embed {:?}: foreign content is {:?}, host area is {:?}",
                            id,
                            actual,
                            target.size()
                        );
                    }
                }
            }
        }
    }
}

impl Default for Embed {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Embed {
    fn paint(&mut self, g: &mut Graphics<'_>, _style: &dyn Style, bounds: Rect) {
        // Visible placeholder while no foreign content covers the area.
        g.set_color(Color::from_hex(0x222222));
        g.fill_rect(bounds);
    }

    fn obstructed(&self, _x: f32, _y: f32) -> bool {
        true
    }

    fn parent_structure_changed(&mut self, main: &mut Main, id: WidgetId) {
        self.ensure_window(main, id);
    }

    fn children_changed(&mut self, main: &mut Main, id: WidgetId) {
        self.ensure_window(main, id);
    }

    fn moved(&mut self, main: &mut Main, id: WidgetId) {
        self.sync_geometry(main, id);
    }

    fn resized(&mut self, main: &mut Main, id: WidgetId) {
        self.sync_geometry(main, id);
    }

    fn parent_size_changed(&mut self, main: &mut Main, id: WidgetId) {
        self.sync_geometry(main, id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::app::Mode;
    use crate::backend::mock::{MockBackend, MockLedger};

    struct Pane;
    impl Widget for Pane {}

    fn setup() -> (Main, Rc<RefCell<MockLedger>>, WidgetId) {
        let (backend, ledger) = MockBackend::new();
        let mut main = Main::new(Mode::Module, Box::new(backend));
        let root = main.register(Pane);
        main.set_bounds(root, Rect::new(0.0, 0.0, 400.0, 300.0));
        (main, ledger, root)
    }

    #[test]
    fn test_proxy_created_when_host_realized() {
        let (mut main, ledger, root) = setup();
        let embed = main.register(Embed::new());
        main.set_bounds(embed, Rect::new(20.0, 30.0, 100.0, 80.0));
        main.attach(root, embed);

        // Not elevated yet: embed stays inert.
        assert_eq!(ledger.borrow().created.len(), 0);

        let root_view = main
            .elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();

        // Elevation notified the subtree; the embed created its proxy.
        let ledger_ref = ledger.borrow();
        assert_eq!(ledger_ref.created.len(), 2);
        let (proxy_widget, proxy_view) = ledger_ref.created[1];
        assert_ne!(proxy_view, root_view);

        let root_handle = ledger_ref.views[&root_view].borrow().handle;
        let proxy_state = ledger_ref.views[&proxy_view].borrow();
        assert_eq!(proxy_state.parent, root_handle);
        assert_eq!(proxy_state.bounds, Rect::new(20.0, 30.0, 100.0, 80.0));
        assert!(proxy_state.realized);
        assert!(main.tree().elevated(proxy_widget));
    }

    #[test]
    fn test_proxy_tracks_embed_geometry() {
        let (mut main, ledger, root) = setup();
        let embed = main.register(Embed::new());
        main.set_bounds(embed, Rect::new(20.0, 30.0, 100.0, 80.0));
        main.attach(root, embed);
        main.elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();
        let proxy_view = ledger.borrow().created[1].1;

        main.set_bounds(embed, Rect::new(40.0, 50.0, 120.0, 90.0));
        assert_eq!(
            ledger.borrow().views[&proxy_view].borrow().bounds,
            Rect::new(40.0, 50.0, 120.0, 90.0)
        );
    }

    #[test]
    fn test_degenerate_embed_keeps_minimal_proxy() {
        let (mut main, ledger, root) = setup();
        let embed = main.register(Embed::new());
        main.set_bounds(embed, Rect::new(10.0, 10.0, 50.0, 50.0));
        main.attach(root, embed);
        main.elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();
        let proxy_view = ledger.borrow().created[1].1;

        main.set_bounds(embed, Rect::new(10.0, 10.0, 0.0, 0.0));
        assert_eq!(
            ledger.borrow().views[&proxy_view].borrow().bounds.size(),
            Size::new(1.0, 1.0)
        );
    }

    #[test]
    fn test_detach_tears_proxy_down() {
        let (mut main, ledger, root) = setup();
        let embed = main.register(Embed::new());
        main.set_bounds(embed, Rect::new(20.0, 30.0, 100.0, 80.0));
        main.attach(root, embed);
        main.elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();
        let (proxy_widget, proxy_view) = ledger.borrow().created[1];

        main.detach(embed);
        assert!(!main.tree().contains(proxy_widget));
        assert!(main.view(proxy_view).is_none());
    }

    #[test]
    fn test_refused_proxy_leaves_embed_inert() {
        let (mut main, ledger, root) = setup();
        main.elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();

        // Platform stops granting windows before the embed arrives.
        ledger.borrow_mut().refuse = true;

        let embed = main.register(Embed::new());
        main.set_bounds(embed, Rect::new(20.0, 30.0, 100.0, 80.0));
        main.attach(root, embed);

        // No proxy view, no leaked proxy widget; the embed itself is
        // still attached and paintable.
        assert_eq!(ledger.borrow().created.len(), 1);
        assert_eq!(main.tree().widget_count(), 2);
        assert_eq!(main.tree().parent(embed), Some(root));
    }

    #[test]
    fn test_embed_paints_placeholder() {
        let mut embed = Embed::new();
        let mut surface = crate::graphics::record::RecordingSurface::new();
        let mut g = Graphics::new(&mut surface);
        let style = crate::style::DefaultStyle::new();
        embed.paint(&mut g, &style, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(surface.fills().len(), 1);
    }
}
