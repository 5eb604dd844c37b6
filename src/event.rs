//! Input event types and the per-pointer interaction state.
//!
//! Events enter the toolkit at a [`View`](crate::view::View) boundary as
//! [`ViewEvent`] values in view-space coordinates. Routing converts them
//! into [`InputEvent`] values local to the widget that receives the hook.

use std::time::Duration;

use bitflags::bitflags;

use crate::geometry::{Point, Rect, Size};
use crate::tree::WidgetId;

bitflags! {
    /// Keyboard modifier state carried on every input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const LOGO  = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Named keys plus printable characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Char(char),
}

/// A pointer event as delivered to a widget hook.
///
/// `pos` and `down_pos` are in the local space of `target`. `source` is
/// the widget the interaction originated on: the sticky press target
/// for the whole gesture, otherwise the hovered widget. `target` is the
/// widget receiving the hook; the two differ when a gesture crosses
/// into another widget.
#[derive(Debug, Clone, Copy)]
pub struct InputEvent {
    pub pos: Point,
    /// Position of the initiating button press, in `target` space.
    pub down_pos: Point,
    pub modifiers: Modifiers,
    /// Consecutive click count of the current press (1 = single click).
    pub clicks: u32,
    pub button: Option<MouseButton>,
    pub source: Option<WidgetId>,
    pub target: Option<WidgetId>,
}

impl InputEvent {
    pub(crate) fn at(pos: Point) -> Self {
        Self {
            pos,
            down_pos: pos,
            modifiers: Modifiers::empty(),
            clicks: 0,
            button: None,
            source: None,
            target: None,
        }
    }
}

/// A raw event arriving from the platform at a view boundary.
///
/// Pointer positions are in view space. Button events carry a monotonic
/// timestamp from the platform so multi-click detection stays
/// deterministic.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// A region of the view must be repainted.
    Expose { region: Rect },
    /// The native window was resized.
    Configure { size: Size },
    PointerMove {
        pos: Point,
        modifiers: Modifiers,
    },
    PointerLeave,
    ButtonPress {
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
        time: Duration,
    },
    ButtonRelease {
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
        time: Duration,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        modifiers: Modifiers,
    },
    /// Composed text input, delivered to the focus widget.
    TextEntry { text: String },
    /// The user asked to close the native window.
    Close,
}

/// Counts consecutive clicks using a time and distance threshold.
///
/// The count resets to one when either threshold is exceeded.
#[derive(Debug, Clone)]
pub struct ClickCounter {
    time_threshold: Duration,
    distance_threshold: f32,
    count: u32,
    last_time: Option<Duration>,
    last_pos: Point,
}

impl ClickCounter {
    pub fn new(time_threshold: Duration, distance_threshold: f32) -> Self {
        Self {
            time_threshold,
            distance_threshold,
            count: 0,
            last_time: None,
            last_pos: Point::ZERO,
        }
    }

    /// Register a button press and return the updated click count.
    pub fn press(&mut self, pos: Point, time: Duration) -> u32 {
        let near = {
            let d = pos - self.last_pos;
            d.x.abs() <= self.distance_threshold && d.y.abs() <= self.distance_threshold
        };
        let quick = match self.last_time {
            Some(last) => time.saturating_sub(last) <= self.time_threshold,
            None => false,
        };

        self.count = if near && quick { self.count + 1 } else { 1 };
        self.last_time = Some(time);
        self.last_pos = pos;
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Per-view pointer interaction state.
///
/// While a button is held the press target stays *sticky*: drag and
/// release go to it regardless of the current hit-test result.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointerState {
    pub sticky: Option<WidgetId>,
    pub button: Option<MouseButton>,
    /// Down position in view space.
    pub down_pos: Point,
    pub clicks: u32,
}

impl PointerState {
    pub fn begin(&mut self, target: Option<WidgetId>, button: MouseButton, pos: Point, clicks: u32) {
        self.sticky = target;
        self.button = Some(button);
        self.down_pos = pos;
        self.clicks = clicks;
    }

    pub fn end(&mut self) {
        self.sticky = None;
        self.button = None;
        self.clicks = 0;
    }

    pub fn dragging(&self) -> bool {
        self.button.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_click_counter_single() {
        let mut c = ClickCounter::new(ms(400), 4.0);
        assert_eq!(c.press(Point::new(10.0, 10.0), ms(1000)), 1);
    }

    #[test]
    fn test_click_counter_double_and_triple() {
        let mut c = ClickCounter::new(ms(400), 4.0);
        assert_eq!(c.press(Point::new(10.0, 10.0), ms(1000)), 1);
        assert_eq!(c.press(Point::new(11.0, 10.0), ms(1200)), 2);
        assert_eq!(c.press(Point::new(10.0, 11.0), ms(1400)), 3);
    }

    #[test]
    fn test_click_counter_resets_on_slow_press() {
        let mut c = ClickCounter::new(ms(400), 4.0);
        c.press(Point::new(10.0, 10.0), ms(1000));
        assert_eq!(c.press(Point::new(10.0, 10.0), ms(2000)), 1);
    }

    #[test]
    fn test_click_counter_resets_on_distance() {
        let mut c = ClickCounter::new(ms(400), 4.0);
        c.press(Point::new(10.0, 10.0), ms(1000));
        assert_eq!(c.press(Point::new(50.0, 10.0), ms(1100)), 1);
    }

    #[test]
    fn test_pointer_state_sticky() {
        let mut p = PointerState::default();
        assert!(!p.dragging());
        p.begin(None, MouseButton::Left, Point::new(3.0, 3.0), 1);
        assert!(p.dragging());
        assert_eq!(p.down_pos, Point::new(3.0, 3.0));
        p.end();
        assert!(!p.dragging());
        assert!(p.sticky.is_none());
    }

    #[test]
    fn test_modifiers_flags() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.contains(Modifiers::CTRL));
        assert!(!m.contains(Modifiers::ALT));
    }
}
