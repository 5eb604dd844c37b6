use crate::app::Main;
use crate::event::InputEvent;
use crate::geometry::Rect;
use crate::graphics::Graphics;
use crate::style::{ButtonVisual, Style};
use crate::widget::Widget;

/// A push or toggle button.
///
/// Follows the press-then-release contract: the click callback fires
/// only when the button release lands inside the button's bounds, so a
/// press dragged away and released elsewhere cancels the interaction.
pub struct Button {
    text: String,
    toggled: bool,
    toggle_on_click: bool,
    down: bool,
    over: bool,
    on_click: Option<Box<dyn FnMut(&mut Main, bool)>>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            toggled: false,
            toggle_on_click: false,
            down: false,
            over: false,
            on_click: None,
        }
    }

    /// Make this a toggle button; each completed click flips its state.
    pub fn toggle(mut self) -> Self {
        self.toggle_on_click = true;
        self
    }

    pub fn toggled(mut self, toggled: bool) -> Self {
        self.toggled = toggled;
        self
    }

    /// Called on every completed click with the (possibly flipped)
    /// toggle state.
    pub fn on_click(mut self, f: impl FnMut(&mut Main, bool) + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    fn repaint(&self, main: &mut Main, event: &InputEvent) {
        if let Some(id) = event.target {
            main.repaint(id);
        }
    }
}

impl Widget for Button {
    fn paint(&mut self, g: &mut Graphics<'_>, style: &dyn Style, bounds: Rect) {
        let visual = ButtonVisual {
            highlighted: self.over,
            down: self.down,
            toggled: self.toggled,
        };
        style.draw_button_shape(g, visual, bounds);
        style.draw_button_text(g, visual, &self.text, bounds);
    }

    fn obstructed(&self, _x: f32, _y: f32) -> bool {
        true
    }

    fn enter(&mut self, main: &mut Main, event: &InputEvent) {
        // A drag that started on another widget is not this button's
        // interaction; don't light up under it.
        if event.source != event.target {
            return;
        }
        self.over = true;
        self.repaint(main, event);
    }

    fn exit(&mut self, main: &mut Main, event: &InputEvent) {
        self.over = false;
        self.repaint(main, event);
    }

    fn pressed(&mut self, main: &mut Main, event: &InputEvent) {
        self.down = true;
        self.repaint(main, event);
    }

    fn released(&mut self, main: &mut Main, event: &InputEvent) {
        self.down = false;
        self.repaint(main, event);

        let Some(id) = event.target else {
            return;
        };
        let inside = main.tree().bounds(id).at_origin().contains(event.pos);
        if !inside {
            return;
        }
        if self.toggle_on_click {
            self.toggled = !self.toggled;
        }
        if let Some(mut f) = self.on_click.take() {
            f(main, self.toggled);
            self.on_click = Some(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::app::{Main, Mode};
    use crate::backend::mock::MockBackend;
    use crate::backend::{NativeHandle, ViewFlags};
    use crate::event::{Modifiers, MouseButton, ViewEvent};
    use crate::geometry::Point;
    use crate::view::ViewId;
    use crate::widgets::Panel;

    fn press(pos: Point, ms: u64) -> ViewEvent {
        ViewEvent::ButtonPress {
            pos,
            button: MouseButton::Left,
            modifiers: Modifiers::empty(),
            time: Duration::from_millis(ms),
        }
    }

    fn release(pos: Point, ms: u64) -> ViewEvent {
        ViewEvent::ButtonRelease {
            pos,
            button: MouseButton::Left,
            modifiers: Modifiers::empty(),
            time: Duration::from_millis(ms),
        }
    }

    fn button_window(button: Button) -> (Main, ViewId) {
        let (backend, _) = MockBackend::new();
        let mut main = Main::new(Mode::Module, Box::new(backend));
        let root = main.register(Panel::new());
        main.set_bounds(root, Rect::new(0.0, 0.0, 200.0, 200.0));
        let b = main.register(button);
        main.set_bounds(b, Rect::new(50.0, 50.0, 60.0, 24.0));
        main.attach(root, b);
        let vid = main
            .elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();
        (main, vid)
    }

    #[test]
    fn test_click_fires_on_release_inside() {
        let clicks = Rc::new(RefCell::new(0));
        let seen = clicks.clone();
        let (mut main, vid) =
            button_window(Button::new("ok").on_click(move |_, _| *seen.borrow_mut() += 1));

        main.dispatch(vid, press(Point::new(60.0, 60.0), 100));
        main.dispatch(vid, release(Point::new(62.0, 60.0), 150));
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn test_release_outside_cancels_click() {
        let clicks = Rc::new(RefCell::new(0));
        let seen = clicks.clone();
        let (mut main, vid) =
            button_window(Button::new("ok").on_click(move |_, _| *seen.borrow_mut() += 1));

        main.dispatch(vid, press(Point::new(60.0, 60.0), 100));
        main.dispatch(vid, release(Point::new(5.0, 5.0), 150));
        assert_eq!(*clicks.borrow(), 0);
    }

    #[test]
    fn test_toggle_flips_each_click() {
        let states = Rc::new(RefCell::new(Vec::new()));
        let seen = states.clone();
        let (mut main, vid) = button_window(
            Button::new("mute")
                .toggle()
                .on_click(move |_, toggled| seen.borrow_mut().push(toggled)),
        );

        main.dispatch(vid, press(Point::new(60.0, 60.0), 100));
        main.dispatch(vid, release(Point::new(60.0, 60.0), 150));
        main.dispatch(vid, press(Point::new(60.0, 60.0), 1000));
        main.dispatch(vid, release(Point::new(60.0, 60.0), 1050));
        assert_eq!(*states.borrow(), vec![true, false]);
    }

    #[test]
    fn test_callback_may_use_context() {
        // The click callback receives the full context; restructuring
        // from inside it must not deadlock or corrupt the tree.
        let (backend, _) = MockBackend::new();
        let mut main = Main::new(Mode::Module, Box::new(backend));
        let root = main.register(Panel::new());
        main.set_bounds(root, Rect::new(0.0, 0.0, 200.0, 200.0));

        let b = main.register(Button::new("spawn").on_click(move |main, _| {
            let extra = main.register(Panel::new());
            main.set_bounds(extra, Rect::new(0.0, 0.0, 10.0, 10.0));
        }));
        main.set_bounds(b, Rect::new(50.0, 50.0, 60.0, 24.0));
        main.attach(root, b);
        let vid = main
            .elevate(root, ViewFlags::empty(), NativeHandle::NULL)
            .unwrap();

        let before = main.tree().widget_count();
        main.dispatch(vid, press(Point::new(60.0, 60.0), 100));
        main.dispatch(vid, release(Point::new(60.0, 60.0), 150));
        assert_eq!(main.tree().widget_count(), before + 1);
    }
}
