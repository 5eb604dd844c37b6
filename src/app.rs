//! The application context: widget lifecycle, elevation, focus and
//! event routing.
//!
//! [`Main`] owns the widget [`Tree`], every open [`View`], the
//! [`Backend`] that creates native windows and the [`Style`] widgets
//! paint with. All structural mutation that must fire widget hooks goes
//! through here; hooks receive `&mut Main` so they can restructure the
//! tree, grab focus or request repaints while they run.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::backend::{Backend, NativeHandle, ViewFlags};
use crate::error::Error;
use crate::event::{ClickCounter, InputEvent, Key, Modifiers, MouseButton, ViewEvent};
use crate::geometry::{Point, Rect, Size};
use crate::platform::EventLoop;
use crate::style::{DefaultStyle, Style};
use crate::tree::{Tree, WidgetId};
use crate::view::{self, View, ViewId};
use crate::widget::Widget;

/// How the toolkit is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Standalone application: owns the process, quits on window close.
    Program,
    /// Embedded module (e.g. a plugin UI): the host owns the lifecycle.
    Module,
}

/// Tunables applied at construction.
#[derive(Debug, Clone)]
pub struct MainConfig {
    pub multi_click_time: Duration,
    pub multi_click_distance: f32,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            multi_click_time: Duration::from_millis(400),
            multi_click_distance: 4.0,
        }
    }
}

impl MainConfig {
    pub fn with_multi_click_time(mut self, time: Duration) -> Self {
        self.multi_click_time = time;
        self
    }

    pub fn with_multi_click_distance(mut self, distance: f32) -> Self {
        self.multi_click_distance = distance;
        self
    }
}

/// The single-threaded application context.
///
/// `Main` is not `Send` or `Sync` and never needs to be: the whole
/// toolkit runs on one UI thread. In a plugin, real-time audio code must
/// communicate with the UI through lock-free channels or atomics, never
/// by touching `Main`.
pub struct Main {
    tree: Tree,
    views: HashMap<ViewId, View>,
    backend: Box<dyn Backend>,
    style: Box<dyn Style>,
    event_loop: Option<Box<dyn EventLoop>>,
    focus: Option<WidgetId>,
    mode: Mode,
    config: MainConfig,
    next_view_id: u64,
    quit: bool,
}

impl Main {
    pub fn new(mode: Mode, backend: Box<dyn Backend>) -> Self {
        Self::with_config(mode, backend, MainConfig::default())
    }

    pub fn with_config(mode: Mode, backend: Box<dyn Backend>, config: MainConfig) -> Self {
        debug!("starting with backend `{}`", backend.name());
        Self {
            tree: Tree::new(),
            views: HashMap::new(),
            backend,
            style: Box::new(DefaultStyle::new()),
            event_loop: None,
            focus: None,
            mode,
            config,
            next_view_id: 1,
            quit: false,
        }
    }

    pub fn with_event_loop(mut self, event_loop: Box<dyn EventLoop>) -> Self {
        self.event_loop = Some(event_loop);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn style(&self) -> &dyn Style {
        &*self.style
    }

    pub fn set_style(&mut self, style: Box<dyn Style>) {
        self.style = style;
    }

    //=== widget lifecycle ===================================================

    /// Store a widget and return its handle. It starts detached; attach
    /// or elevate it to make it part of a window.
    pub fn register(&mut self, widget: impl Widget) -> WidgetId {
        self.tree.register(Box::new(widget))
    }

    pub fn register_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        self.tree.register(widget)
    }

    /// Make `child` the topmost child of `parent`.
    ///
    /// Detaches `child` from any prior parent (and tears down its window
    /// if it was elevated), then fires `children_changed` on the parent
    /// and a structure notification through the attached subtree.
    pub fn attach(&mut self, parent: WidgetId, child: WidgetId) {
        if self.tree.elevated(child) {
            self.unelevate(child);
        }
        if !self.tree.link(parent, child) {
            return;
        }
        self.fire_hook(parent, |w, main| w.children_changed(main, parent));
        self.notify_structure_changed(child);
        self.repaint(parent);
    }

    /// Detach `child` from its parent, firing the same notifications as
    /// [`attach`](Self::attach). A detached widget stays registered.
    pub fn detach(&mut self, child: WidgetId) {
        let Some(parent) = self.tree.unlink(child) else {
            return;
        };
        self.fire_hook(parent, |w, main| w.children_changed(main, parent));
        self.notify_structure_changed(child);
        self.repaint(parent);
    }

    /// Destroy a widget: tears down its window, detaches it and releases
    /// its storage. Children are left registered but detached.
    pub fn destroy(&mut self, id: WidgetId) {
        if self.tree.elevated(id) {
            self.unelevate(id);
        }
        self.detach(id);
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.tree.unregister(id);
    }

    //=== per-widget state ===================================================

    /// Move and/or resize a widget (bounds in parent space; view space
    /// when elevated). Fires `moved`/`resized` on the widget and
    /// `parent_size_changed` on its children, and keeps the native
    /// window in sync when the widget is elevated.
    pub fn set_bounds(&mut self, id: WidgetId, bounds: Rect) {
        if bounds.is_empty() {
            warn!("non-positive bounds {:?} for {:?}", bounds, id);
        }
        self.apply_bounds(id, bounds, true);
    }

    fn apply_bounds(&mut self, id: WidgetId, bounds: Rect, push_native: bool) {
        let (moved, resized) = self.tree.set_bounds_raw(id, bounds);
        if !moved && !resized {
            return;
        }
        if push_native {
            if let Some(vid) = self.tree.view(id) {
                if let Some(view) = self.views.get_mut(&vid) {
                    view.native.set_bounds(bounds);
                }
            }
        }
        if moved {
            self.fire_hook(id, |w, main| w.moved(main, id));
        }
        if resized {
            self.fire_hook(id, |w, main| w.resized(main, id));
            for child in self.tree.children(id) {
                self.fire_hook(child, |w, main| w.parent_size_changed(main, child));
            }
        }
        self.repaint(id);
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        if self.tree.set_visible_raw(id, visible) {
            if let Some(vid) = self.tree.view(id) {
                if let Some(view) = self.views.get_mut(&vid) {
                    view.native.set_visible(visible);
                }
            }
            self.repaint(id);
        }
    }

    pub fn set_opaque(&mut self, id: WidgetId, opaque: bool) {
        self.tree.set_opaque(id, opaque);
    }

    pub fn set_name(&mut self, id: WidgetId, name: impl Into<String>) {
        self.tree.set_name(id, name);
    }

    /// Run a closure against a widget's behavior with full access to the
    /// context, using the same extraction the hook dispatcher uses.
    pub fn with_widget_mut<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Main) -> R,
    ) -> Option<R> {
        let mut widget = self.tree.take_widget(id)?;
        let result = f(widget.as_mut(), self);
        self.tree.put_widget(id, widget);
        Some(result)
    }

    fn fire_hook(&mut self, id: WidgetId, f: impl FnOnce(&mut dyn Widget, &mut Main)) {
        if let Some(mut widget) = self.tree.take_widget(id) {
            f(widget.as_mut(), self);
            self.tree.put_widget(id, widget);
        }
    }

    /// Fire `parent_structure_changed` through `id`'s subtree, `id`
    /// included. The subtree is snapshotted first so hooks may
    /// restructure while the walk runs.
    fn notify_structure_changed(&mut self, id: WidgetId) {
        let mut pending = vec![id];
        let mut order = Vec::new();
        while let Some(cur) = pending.pop() {
            order.push(cur);
            pending.extend(self.tree.children(cur));
        }
        for target in order {
            self.fire_hook(target, |w, main| w.parent_structure_changed(main, target));
        }
    }

    //=== elevation ==========================================================

    /// Give a widget its own native window.
    ///
    /// Idempotent: an already-elevated widget returns its existing view
    /// id. Pass a non-null `parent` to embed the window under a foreign
    /// native window (a plugin host's editor area).
    pub fn elevate(
        &mut self,
        widget: WidgetId,
        flags: ViewFlags,
        parent: NativeHandle,
    ) -> Result<ViewId, Error> {
        if !self.tree.contains(widget) {
            return Err(Error::StaleWidget);
        }
        if let Some(existing) = self.tree.view(widget) {
            return Ok(existing);
        }

        let id = ViewId::from_raw(self.next_view_id);
        let Some(mut native) = self.backend.create_view(&self.tree, widget, id) else {
            return Err(Error::ViewCreation {
                backend: self.backend.name().to_string(),
            });
        };
        self.next_view_id += 1;

        native.apply_flags(flags);
        if !parent.is_null() {
            native.set_parent(parent);
        }
        native.set_bounds(self.tree.bounds(widget));
        native.realize();
        // The window inherits whatever visibility the widget already has.
        native.set_visible(self.tree.visible(widget));

        self.tree.set_view(widget, Some(id));
        let clicks = ClickCounter::new(self.config.multi_click_time, self.config.multi_click_distance);
        self.views.insert(id, View::new(id, widget, native, clicks));
        debug!("elevated {:?} as view {:?}", widget, id);

        self.notify_structure_changed(widget);
        Ok(id)
    }

    /// Tear down a widget's window. The widget and its subtree stay in
    /// the tree.
    pub fn unelevate(&mut self, widget: WidgetId) {
        let Some(vid) = self.tree.view(widget) else {
            return;
        };
        self.tree.set_view(widget, None);
        if self.views.remove(&vid).is_some() {
            debug!("closed view {:?} for {:?}", vid, widget);
        }
        self.notify_structure_changed(widget);
    }

    /// The view owned by the nearest elevated ancestor (or the widget
    /// itself).
    pub fn find_view(&self, widget: WidgetId) -> Option<ViewId> {
        self.tree.find_view(widget)
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    /// The native handle of the window hosting `widget`, if any.
    pub fn view_handle(&self, widget: WidgetId) -> Option<NativeHandle> {
        let vid = self.tree.find_view(widget)?;
        self.views.get(&vid).map(|v| v.native.handle())
    }

    //=== focus ==============================================================

    /// Give keyboard focus to a widget. At most one widget holds focus;
    /// the previous holder gets `focus_out` before the new one gets
    /// `focus_in`.
    pub fn grab_focus(&mut self, id: WidgetId) {
        if self.focus == Some(id) || !self.tree.contains(id) {
            return;
        }
        if let Some(old) = self.focus.take() {
            self.fire_hook(old, |w, main| w.focus_out(main, old));
        }
        self.focus = Some(id);
        self.fire_hook(id, |w, main| w.focus_in(main, id));
    }

    /// Drop focus, but only if `id` currently holds it.
    pub fn release_focus(&mut self, id: WidgetId) {
        if self.focus == Some(id) {
            self.focus = None;
            self.fire_hook(id, |w, main| w.focus_out(main, id));
        }
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus.filter(|&id| self.tree.contains(id))
    }

    //=== painting ===========================================================

    /// Schedule a repaint of the widget's area in its owning window.
    pub fn repaint(&mut self, id: WidgetId) {
        let Some(vid) = self.tree.find_view(id) else {
            return;
        };
        let origin = self.tree.to_view_space(id, Point::ZERO);
        let region = self.tree.bounds(id).at(origin);
        if let Some(view) = self.views.get_mut(&vid) {
            view.native.request_redraw(region);
        }
    }

    fn render_view(&mut self, id: ViewId, region: Rect) {
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        let root = view.root;
        let surface = view.native.surface();
        view::render(&mut self.tree, &*self.style, root, surface, region);
    }

    //=== event dispatch =====================================================

    /// Route one raw platform event into the widget tree.
    pub fn dispatch(&mut self, view_id: ViewId, event: ViewEvent) {
        if !self.views.contains_key(&view_id) {
            warn!("event for unknown view {:?}", view_id);
            return;
        }
        trace!("dispatch {:?} to {:?}", event, view_id);
        match event {
            ViewEvent::Expose { region } => self.render_view(view_id, region),
            ViewEvent::Configure { size } => self.on_configure(view_id, size),
            ViewEvent::PointerMove { pos, modifiers } => {
                self.on_pointer_move(view_id, pos, modifiers)
            }
            ViewEvent::PointerLeave => self.on_pointer_leave(view_id),
            ViewEvent::ButtonPress {
                pos,
                button,
                modifiers,
                time,
            } => self.on_button_press(view_id, pos, button, modifiers, time),
            ViewEvent::ButtonRelease {
                pos,
                button,
                modifiers,
                ..
            } => self.on_button_release(view_id, pos, button, modifiers),
            ViewEvent::KeyDown { key, modifiers } => self.on_key(key, modifiers, true),
            ViewEvent::KeyUp { key, modifiers } => self.on_key(key, modifiers, false),
            ViewEvent::TextEntry { text } => {
                if let Some(focus) = self.focused() {
                    self.fire_hook(focus, |w, main| w.text_entry(main, &text));
                }
            }
            ViewEvent::Close => {
                if self.mode == Mode::Program {
                    self.quit = true;
                }
            }
        }
    }

    fn on_configure(&mut self, view_id: ViewId, size: Size) {
        let Some(view) = self.views.get(&view_id) else {
            return;
        };
        let root = view.root;
        let pos = self.tree.bounds(root).pos();
        // The platform already resized the window; do not echo back.
        self.apply_bounds(root, Rect::new(pos.x, pos.y, size.width, size.height), false);
    }

    fn on_pointer_move(&mut self, view_id: ViewId, pos: Point, modifiers: Modifiers) {
        let Some(view) = self.views.get(&view_id) else {
            return;
        };
        let root = view.root;
        let state = view.pointer.clone();
        let hovered = view.hovered.filter(|&h| self.tree.contains(h));

        let sticky = state.sticky.filter(|&t| self.tree.contains(t));
        let dragging = state.dragging() && sticky.is_some();
        let hit = self.tree.widget_at(root, pos);
        // Events originate on the press target for the whole gesture;
        // outside a gesture, on the widget under the pointer.
        let source = if dragging { sticky } else { hit };

        // Hover crossings keep firing during a drag, so widgets being
        // dragged over hear about it and can tell the gesture origin
        // apart from themselves.
        if hit != hovered {
            if let Some(old) = hovered {
                let mut ev = self.exit_event(old, pos);
                ev.modifiers = modifiers;
                ev.source = if dragging { sticky } else { Some(old) };
                self.fire_hook(old, |w, main| w.exit(main, &ev));
            }
            if let Some(view) = self.views.get_mut(&view_id) {
                view.hovered = hit;
            }
            if let Some(new) = hit {
                let mut ev = InputEvent::at(self.tree.convert(new, None, pos));
                ev.modifiers = modifiers;
                ev.source = source;
                ev.target = Some(new);
                self.fire_hook(new, |w, main| w.enter(main, &ev));
            }
        }

        if dragging {
            if let Some(target) = sticky {
                let ev = InputEvent {
                    pos: self.tree.convert(target, None, pos),
                    down_pos: self.tree.convert(target, None, state.down_pos),
                    modifiers,
                    clicks: state.clicks,
                    button: state.button,
                    source: sticky,
                    target: Some(target),
                };
                self.fire_hook(target, |w, main| w.drag(main, &ev));
            }
        } else if let Some(over) = hit {
            let mut ev = InputEvent::at(self.tree.convert(over, None, pos));
            ev.modifiers = modifiers;
            ev.source = source;
            ev.target = Some(over);
            self.fire_hook(over, |w, main| w.motion(main, &ev));
        }
    }

    fn on_pointer_leave(&mut self, view_id: ViewId) {
        let Some(view) = self.views.get_mut(&view_id) else {
            return;
        };
        let state = view.pointer.clone();
        let Some(old) = view.hovered.take().filter(|&h| self.tree.contains(h)) else {
            return;
        };
        // No meaningful position on leave; report the nearest edge point.
        let mut ev = self.exit_event(old, Point::ZERO);
        ev.source = if state.dragging() {
            state.sticky.filter(|&t| self.tree.contains(t))
        } else {
            Some(old)
        };
        self.fire_hook(old, |w, main| w.exit(main, &ev));
    }

    /// Exit events clamp the position into the widget's local bounds so
    /// hooks always see a coordinate on or inside the widget.
    fn exit_event(&self, id: WidgetId, view_pos: Point) -> InputEvent {
        let local = self.tree.convert(id, None, view_pos);
        let b = self.tree.bounds(id);
        let clamped = Point::new(
            local.x.clamp(0.0, b.width.max(0.0)),
            local.y.clamp(0.0, b.height.max(0.0)),
        );
        let mut ev = InputEvent::at(clamped);
        ev.target = Some(id);
        ev
    }

    fn on_button_press(
        &mut self,
        view_id: ViewId,
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
        time: Duration,
    ) {
        let Some(view) = self.views.get_mut(&view_id) else {
            return;
        };
        let root = view.root;
        let clicks = view.clicks.press(pos, time);

        let target = self.tree.widget_at(root, pos);
        if let Some(view) = self.views.get_mut(&view_id) {
            view.pointer.begin(target, button, pos, clicks);
        }

        if let Some(target) = target {
            let local = self.tree.convert(target, None, pos);
            let ev = InputEvent {
                pos: local,
                down_pos: local,
                modifiers,
                clicks,
                button: Some(button),
                source: Some(target),
                target: Some(target),
            };
            self.fire_hook(target, |w, main| w.pressed(main, &ev));
        }
    }

    fn on_button_release(
        &mut self,
        view_id: ViewId,
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) {
        let Some(view) = self.views.get_mut(&view_id) else {
            return;
        };
        let state = view.pointer.clone();
        view.pointer.end();

        let Some(target) = state.sticky.filter(|&t| self.tree.contains(t)) else {
            return;
        };
        let ev = InputEvent {
            pos: self.tree.convert(target, None, pos),
            down_pos: self.tree.convert(target, None, state.down_pos),
            modifiers,
            clicks: state.clicks,
            button: Some(button),
            source: Some(target),
            target: Some(target),
        };
        self.fire_hook(target, |w, main| w.released(main, &ev));
    }

    fn on_key(&mut self, key: Key, modifiers: Modifiers, down: bool) {
        let Some(focus) = self.focused() else {
            return;
        };
        self.fire_hook(focus, |w, main| {
            let consumed = if down {
                w.key_down(main, key, modifiers)
            } else {
                w.key_up(main, key, modifiers)
            };
            if !consumed {
                trace!("key {:?} not consumed by {:?}", key, focus);
            }
        });
    }

    //=== driving ============================================================

    /// Drain and dispatch pending platform events. Returns false once
    /// quit has been requested.
    pub fn pump(&mut self, timeout: Option<Duration>) -> bool {
        let mut batch = Vec::new();
        if let Some(mut event_loop) = self.event_loop.take() {
            event_loop.poll(timeout, &mut batch);
            self.event_loop = Some(event_loop);
        }
        for (view_id, event) in batch {
            self.dispatch(view_id, event);
        }
        !self.quit
    }

    /// Block-and-dispatch until quit.
    pub fn run(&mut self) {
        while self.pump(None) {}
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    pub fn running(&self) -> bool {
        !self.quit
    }
}
