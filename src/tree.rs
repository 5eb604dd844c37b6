//! Arena-based widget storage and the tree algorithms built on it.
//!
//! Widgets are addressed by [`WidgetId`], a generational index: the id
//! embeds a slot index plus a generation counter that is bumped whenever
//! a slot is reused. A stale id resolves to "absent" everywhere, which
//! makes a plain `WidgetId` double as the weak-reference primitive the
//! toolkit needs for hover and focus tracking — reading a dead reference
//! yields `None`, never a dangling widget.
//!
//! The tree stores *structure* (parent/children, bounds, flags) and the
//! boxed behavior of each widget. Structural mutation that must fire
//! widget hooks goes through [`Main`](crate::app::Main); the raw
//! operations here keep the tree consistent without dispatching anything.

use crate::geometry::{Point, Rect};
use crate::view::ViewId;
use crate::widget::{Detached, Widget};

/// Stable handle to a widget in the tree.
///
/// Holds an index plus a generation so a handle kept across a
/// destroy/reuse cycle can never alias a different widget.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WidgetId {
    index: u32,
    generation: u32,
}

impl WidgetId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Pack into a u64 for external keys (generation in the high bits).
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}

struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

struct Node {
    widget: Box<dyn Widget>,
    name: Option<String>,
    parent: Option<WidgetId>,
    /// Insertion order: back-to-front for painting, reversed for hit-testing.
    children: Vec<WidgetId>,
    /// In the parent's space; in view space for an elevated widget.
    bounds: Rect,
    visible: bool,
    opaque: bool,
    view: Option<ViewId>,
    sparse_index: u32,
}

/// Central widget storage using a sparse-set arena.
///
/// Dense storage for cache-friendly walks, a sparse map for O(1) lookup
/// by id, swap-remove on destruction.
pub struct Tree {
    dense: Vec<Node>,
    sparse: Vec<Option<SparseEntry>>,
    free_indices: Vec<u32>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    /// Store a widget and return its handle. The widget starts detached,
    /// hidden-independent (visible), non-opaque and with empty bounds.
    pub fn register(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let (sparse_index, generation) = if let Some(idx) = self.free_indices.pop() {
            let old_gen = self.sparse[idx as usize]
                .as_ref()
                .map(|e| e.generation)
                .unwrap_or(0);
            (idx, old_gen.wrapping_add(1))
        } else {
            let idx = self.sparse.len() as u32;
            self.sparse.push(None);
            (idx, 0)
        };

        let dense_index = self.dense.len();
        let id = WidgetId::new(sparse_index, generation);

        self.dense.push(Node {
            widget,
            name: None,
            parent: None,
            children: Vec::new(),
            bounds: Rect::default(),
            visible: true,
            opaque: false,
            view: None,
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });
        id
    }

    /// Drop a widget's storage. Detaches it from its parent and orphans
    /// its children (their parent pointers are cleared; the children stay
    /// registered — the caller owns their lifetime).
    pub(crate) fn unregister(&mut self, id: WidgetId) {
        let Some(dense_index) = self.dense_index(id) else {
            return;
        };

        if let Some(parent_id) = self.dense[dense_index].parent {
            if let Some(parent_dense) = self.dense_index(parent_id) {
                self.dense[parent_dense].children.retain(|&c| c != id);
            }
        }
        let children = std::mem::take(&mut self.dense[dense_index].children);
        for child in children {
            if let Some(ci) = self.dense_index(child) {
                self.dense[ci].parent = None;
            }
        }

        let last = self.dense.len() - 1;
        let removed = self.dense.swap_remove(dense_index);
        if dense_index != last && !self.dense.is_empty() {
            let moved_sparse = self.dense[dense_index].sparse_index;
            if let Some(entry) = self.sparse[moved_sparse as usize].as_mut() {
                entry.dense_index = dense_index;
            }
        }
        self.sparse[id.index as usize] = None;
        self.free_indices.push(id.index);
        drop(removed);
    }

    fn dense_index(&self, id: WidgetId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation)
            .map(|e| e.dense_index)
    }

    fn node(&self, id: WidgetId) -> Option<&Node> {
        self.dense_index(id).map(|i| &self.dense[i])
    }

    fn node_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.dense_index(id).map(move |i| &mut self.dense[i])
    }

    /// True if the handle still refers to a live widget.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.dense_index(id).is_some()
    }

    pub fn widget_count(&self) -> usize {
        self.dense.len()
    }

    //=== structure ==========================================================

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.node(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    /// Append `child` to `parent`'s child list, detaching it from any
    /// prior parent first. Structural only; notifications are the
    /// caller's concern.
    pub(crate) fn link(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.parent(child) == Some(parent) {
            return false;
        }
        self.unlink(child);
        if let Some(n) = self.node_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(n) = self.node_mut(parent) {
            n.children.push(child);
        }
        true
    }

    /// Clear `child`'s parent pointer and remove it from the parent's
    /// child list. Returns the old parent.
    pub(crate) fn unlink(&mut self, child: WidgetId) -> Option<WidgetId> {
        let old = self.node_mut(child)?.parent.take()?;
        if let Some(n) = self.node_mut(old) {
            n.children.retain(|&c| c != child);
        }
        Some(old)
    }

    /// Shallow: `other` is a direct child of `parent`. Deep: `other` is
    /// anywhere in `parent`'s subtree.
    pub fn contains_widget(&self, parent: WidgetId, other: WidgetId, deep: bool) -> bool {
        if !deep {
            return self.parent(other) == Some(parent);
        }
        let mut cur = self.parent(other);
        while let Some(c) = cur {
            if c == parent {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    pub fn find_root(&self, id: WidgetId) -> WidgetId {
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            cur = p;
        }
        cur
    }

    /// The view owned by the nearest elevated ancestor (or `id` itself).
    pub fn find_view(&self, id: WidgetId) -> Option<ViewId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if let Some(v) = self.view(c) {
                return Some(v);
            }
            cur = self.parent(c);
        }
        None
    }

    //=== per-widget state ===================================================

    pub fn bounds(&self, id: WidgetId) -> Rect {
        self.node(id).map(|n| n.bounds).unwrap_or_default()
    }

    /// Update bounds without notifications. Returns `(moved, resized)`.
    pub(crate) fn set_bounds_raw(&mut self, id: WidgetId, bounds: Rect) -> (bool, bool) {
        let Some(n) = self.node_mut(id) else {
            return (false, false);
        };
        let moved = n.bounds.x != bounds.x || n.bounds.y != bounds.y;
        let resized = n.bounds.width != bounds.width || n.bounds.height != bounds.height;
        n.bounds = bounds;
        (moved, resized)
    }

    pub fn visible(&self, id: WidgetId) -> bool {
        self.node(id).map(|n| n.visible).unwrap_or(false)
    }

    pub(crate) fn set_visible_raw(&mut self, id: WidgetId, visible: bool) -> bool {
        match self.node_mut(id) {
            Some(n) if n.visible != visible => {
                n.visible = visible;
                true
            }
            _ => false,
        }
    }

    pub fn opaque(&self, id: WidgetId) -> bool {
        self.node(id).map(|n| n.opaque).unwrap_or(false)
    }

    pub fn set_opaque(&mut self, id: WidgetId, opaque: bool) {
        if let Some(n) = self.node_mut(id) {
            n.opaque = opaque;
        }
    }

    pub fn name(&self, id: WidgetId) -> Option<&str> {
        self.node(id).and_then(|n| n.name.as_deref())
    }

    pub fn set_name(&mut self, id: WidgetId, name: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.name = Some(name.into());
        }
    }

    pub fn view(&self, id: WidgetId) -> Option<ViewId> {
        self.node(id).and_then(|n| n.view)
    }

    /// A widget is elevated exactly when it owns a view.
    pub fn elevated(&self, id: WidgetId) -> bool {
        self.view(id).is_some()
    }

    pub(crate) fn set_view(&mut self, id: WidgetId, view: Option<ViewId>) {
        if let Some(n) = self.node_mut(id) {
            n.view = view;
        }
    }

    //=== behavior access ====================================================

    pub fn with_widget<R>(&self, id: WidgetId, f: impl FnOnce(&dyn Widget) -> R) -> Option<R> {
        self.dense_index(id).map(|i| f(&*self.dense[i].widget))
    }

    /// Temporarily extract a widget's behavior so a hook can run with
    /// full access to the rest of the toolkit. The slot is backed by a
    /// no-op placeholder while extracted; if the widget is destroyed
    /// during the hook the behavior is simply dropped on return.
    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let i = self.dense_index(id)?;
        Some(std::mem::replace(&mut self.dense[i].widget, Box::new(Detached)))
    }

    pub(crate) fn put_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        if let Some(i) = self.dense_index(id) {
            self.dense[i].widget = widget;
        }
    }

    /// The widget's own claim on a local coordinate (the `obstructed`
    /// hook). Stale ids claim nothing.
    pub fn obstructed(&self, id: WidgetId, pt: Point) -> bool {
        self.with_widget(id, |w| w.obstructed(pt.x, pt.y))
            .unwrap_or(false)
    }

    //=== coordinate conversion ==============================================
    //
    // A non-elevated widget's rectangle is relative to its parent; an
    // elevated widget's rectangle is in its own view's space, so crossing
    // an elevation boundary contributes no offset in either direction.

    /// Convert a point from `id`'s local space to its parent's space.
    pub fn to_parent_space(&self, id: WidgetId, pt: Point) -> Point {
        if self.elevated(id) {
            return pt;
        }
        pt + self.bounds(id).pos()
    }

    /// Convert a point from `id`'s parent's space to `id`'s local space.
    pub fn from_parent_space(&self, id: WidgetId, pt: Point) -> Point {
        if self.elevated(id) {
            return pt;
        }
        pt - self.bounds(id).pos()
    }

    fn is_ancestor_of(&self, maybe_ancestor: WidgetId, id: WidgetId) -> bool {
        self.contains_widget(maybe_ancestor, id, true)
    }

    /// Walk down from `ancestor` to `target`, converting `pt` (in
    /// `ancestor` space) into `target` space.
    fn convert_down(&self, ancestor: WidgetId, target: WidgetId, pt: Point) -> Point {
        if target == ancestor {
            return pt;
        }
        match self.parent(target) {
            Some(p) if p != ancestor => {
                let pt = self.convert_down(ancestor, p, pt);
                self.from_parent_space(target, pt)
            }
            _ => self.from_parent_space(target, pt),
        }
    }

    /// Convert `pt` from `source`'s local space to `target`'s local
    /// space. With no `source` the point is taken to be in the view
    /// space of `target`'s nearest elevated ancestor (or root).
    ///
    /// The upward walk stops as soon as it reaches `target` or an
    /// ancestor of `target`, then descends by subtraction.
    pub fn convert(&self, target: WidgetId, source: Option<WidgetId>, pt: Point) -> Point {
        let mut pt = pt;
        let mut src = source;
        while let Some(s) = src {
            if s == target {
                return pt;
            }
            if self.is_ancestor_of(s, target) {
                return self.convert_down(s, target, pt);
            }
            pt = self.to_parent_space(s, pt);
            src = self.parent(s);
        }

        let root = self.find_root(target);
        pt = self.from_parent_space(root, pt);
        if root == target {
            return pt;
        }
        self.convert_down(root, target, pt)
    }

    /// Convert a local point to the space of the owning view (the space
    /// of the nearest elevated ancestor).
    pub fn to_view_space(&self, id: WidgetId, pt: Point) -> Point {
        let mut pt = pt;
        let mut cur = id;
        loop {
            if self.elevated(cur) {
                return pt;
            }
            pt = self.to_parent_space(cur, pt);
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return pt,
            }
        }
    }

    //=== hit testing ========================================================

    /// The deepest widget under `pt` (local to `id`), honoring
    /// obstruction opt-in.
    ///
    /// Children are tested front-to-back (reverse insertion order). The
    /// walk descends into any visible child whose bounds contain the
    /// point; a widget is itself the result only if its `obstructed`
    /// hook claims the coordinate. Widgets elevated into their own view
    /// are skipped — they receive input through that view instead.
    pub fn widget_at(&self, id: WidgetId, pt: Point) -> Option<WidgetId> {
        if !self.visible(id) || !self.bounds(id).at_origin().contains(pt) {
            return None;
        }
        for &child in self.children(id).iter().rev() {
            if !self.visible(child) || self.elevated(child) {
                continue;
            }
            let local = self.from_parent_space(child, pt);
            if let Some(hit) = self.widget_at(child, local) {
                return Some(hit);
            }
        }
        if self.obstructed(id, pt) {
            Some(id)
        } else {
            None
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
