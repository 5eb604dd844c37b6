//! The widget behavior contract.
//!
//! A widget's structure (bounds, parent, children, visibility) lives in
//! the [`Tree`](crate::tree::Tree); its *behavior* is a boxed [`Widget`]
//! stored alongside. Every hook has a safe no-op default, so a widget
//! type implements only the hooks it cares about; there is no required
//! method at all — `struct Panel;` with an empty impl is a valid widget.

use crate::app::Main;
use crate::event::{InputEvent, Key, Modifiers};
use crate::geometry::Rect;
use crate::graphics::Graphics;
use crate::style::Style;
use crate::tree::WidgetId;

#[allow(unused_variables)]
pub trait Widget: 'static {
    /// Draw this widget. The graphics origin is at the widget's top-left
    /// corner and the clip already excludes everything outside `bounds`
    /// (given here at the origin).
    fn paint(&mut self, g: &mut Graphics<'_>, style: &dyn Style, bounds: Rect) {}

    /// True if this widget claims input at the given local coordinate.
    ///
    /// Widgets are transparent to hit-testing by default; interactive
    /// controls opt in. A non-obstructive widget never intercepts a hit
    /// meant for a sibling or descendant.
    fn obstructed(&self, x: f32, y: f32) -> bool {
        false
    }

    /// Pointer entered this widget (hover began).
    fn enter(&mut self, main: &mut Main, event: &InputEvent) {}

    /// Pointer left this widget (hover ended).
    fn exit(&mut self, main: &mut Main, event: &InputEvent) {}

    /// Pointer moved over this widget with no button held.
    fn motion(&mut self, main: &mut Main, event: &InputEvent) {}

    /// A button was pressed on this widget. This widget becomes the
    /// sticky target for the rest of the gesture.
    fn pressed(&mut self, main: &mut Main, event: &InputEvent) {}

    /// Pointer moved while this widget is the sticky press target. The
    /// position may be outside the widget's bounds.
    fn drag(&mut self, main: &mut Main, event: &InputEvent) {}

    /// The button was released while this widget was the sticky target.
    /// `event.pos` falling inside the widget's bounds marks a completed
    /// interaction (a click).
    fn released(&mut self, main: &mut Main, event: &InputEvent) {}

    /// Key press, delivered only while this widget holds focus.
    /// Return true when the key was consumed.
    fn key_down(&mut self, main: &mut Main, key: Key, modifiers: Modifiers) -> bool {
        false
    }

    /// Key release, delivered only while this widget holds focus.
    fn key_up(&mut self, main: &mut Main, key: Key, modifiers: Modifiers) -> bool {
        false
    }

    /// Composed text input, delivered only while this widget holds focus.
    fn text_entry(&mut self, main: &mut Main, text: &str) {}

    fn focus_in(&mut self, main: &mut Main, id: WidgetId) {}

    fn focus_out(&mut self, main: &mut Main, id: WidgetId) {}

    /// The widget's position changed within its parent.
    fn moved(&mut self, main: &mut Main, id: WidgetId) {}

    /// The widget's size changed.
    fn resized(&mut self, main: &mut Main, id: WidgetId) {}

    /// The parent's size changed.
    fn parent_size_changed(&mut self, main: &mut Main, id: WidgetId) {}

    /// A child was added to or removed from this widget.
    fn children_changed(&mut self, main: &mut Main, id: WidgetId) {}

    /// Something above this widget changed: it was re-parented, or an
    /// ancestor was attached, detached or elevated.
    fn parent_structure_changed(&mut self, main: &mut Main, id: WidgetId) {}
}

/// Placeholder behavior occupying a tree slot while the real widget is
/// temporarily extracted for a hook call. All hooks are inherited no-ops.
pub(crate) struct Detached;

impl Widget for Detached {}
