//! Per-window state and the paint walk.
//!
//! A [`View`] pairs one elevated widget (the view's root) with the native
//! window that hosts it. Each view tracks its own pointer interaction
//! state, so two windows of the same application never share hover or
//! drag targets.

use crate::backend::NativeView;
use crate::event::{ClickCounter, PointerState};
use crate::geometry::Rect;
use crate::graphics::{Graphics, Surface};
use crate::style::Style;
use crate::tree::{Tree, WidgetId};

/// Identifies a view for the lifetime of the application.
///
/// Unlike [`WidgetId`], view ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

pub struct View {
    pub(crate) id: ViewId,
    pub(crate) root: WidgetId,
    pub(crate) native: Box<dyn NativeView>,
    /// Widget currently under the pointer; a stale id reads as no hover.
    pub(crate) hovered: Option<WidgetId>,
    pub(crate) pointer: PointerState,
    pub(crate) clicks: ClickCounter,
}

impl View {
    pub(crate) fn new(id: ViewId, root: WidgetId, native: Box<dyn NativeView>, clicks: ClickCounter) -> Self {
        Self {
            id,
            root,
            native,
            hovered: None,
            pointer: PointerState::default(),
            clicks,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The elevated widget this view hosts.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn native(&self) -> &dyn NativeView {
        &*self.native
    }

    pub fn native_mut(&mut self) -> &mut dyn NativeView {
        &mut *self.native
    }
}

/// Paint a view's widget subtree onto `surface`, restricted to `region`
/// (view space).
///
/// Children paint back-to-front in insertion order, each inside a
/// save/clip/translate frame so no widget can leak translation or clip
/// into its siblings. Subtrees whose clip intersects nothing are skipped
/// without calling their paint hooks, and a widget fully covered by a
/// visible opaque child skips its own painting.
pub(crate) fn render(
    tree: &mut Tree,
    style: &dyn Style,
    root: WidgetId,
    surface: &mut dyn Surface,
    region: Rect,
) {
    let mut g = Graphics::new(surface);
    g.save();
    g.intersect_clip(region);
    render_widget(tree, style, &mut g, root);
    g.restore();
}

fn render_widget(tree: &mut Tree, style: &dyn Style, g: &mut Graphics<'_>, id: WidgetId) {
    if !tree.visible(id) {
        return;
    }
    let bounds = tree.bounds(id);
    if bounds.is_empty() {
        return;
    }

    g.save();
    // An elevated widget's origin is the view origin; everything else is
    // positioned inside its parent.
    if !tree.elevated(id) {
        g.translate(bounds.pos());
    }
    g.intersect_clip(bounds.at_origin());
    if g.last_clip().is_empty() {
        g.restore();
        return;
    }

    let local = bounds.at_origin();
    let covered = tree.children(id).iter().any(|&c| {
        tree.visible(c) && tree.opaque(c) && tree.bounds(c).contains_rect(&local)
    });
    if !covered {
        if let Some(mut widget) = tree.take_widget(id) {
            widget.paint(g, style, local);
            tree.put_widget(id, widget);
        }
    }

    for child in tree.children(id) {
        // Elevated children paint in their own view.
        if !tree.elevated(child) {
            render_widget(tree, style, g, child);
        }
    }

    g.restore();
}
