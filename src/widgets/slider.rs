use crate::app::Main;
use crate::event::InputEvent;
use crate::geometry::Rect;
use crate::graphics::Graphics;
use crate::style::{SliderKind, Style};
use crate::widget::Widget;

/// A bar slider mapping a pointer position to a value in `min..=max`.
///
/// The value tracks the pointer from the initial press through the whole
/// drag, even when the pointer leaves the widget. Vertical sliders put
/// `min` at the bottom edge.
pub struct Slider {
    kind: SliderKind,
    min: f64,
    max: f64,
    value: f64,
    on_change: Option<Box<dyn FnMut(&mut Main, f64)>>,
}

impl Slider {
    pub fn horizontal() -> Self {
        Self::new(SliderKind::HorizontalBar)
    }

    pub fn vertical() -> Self {
        Self::new(SliderKind::VerticalBar)
    }

    pub fn new(kind: SliderKind) -> Self {
        Self {
            kind,
            min: 0.0,
            max: 1.0,
            value: 0.0,
            on_change: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self.value = self.value.clamp(min, max);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value.clamp(self.min, self.max);
        self
    }

    pub fn on_change(mut self, f: impl FnMut(&mut Main, f64) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    fn fraction(&self) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        (self.value - self.min) / (self.max - self.min)
    }

    fn value_at(&self, bounds: Rect, ev: &InputEvent) -> f64 {
        let frac = match self.kind {
            SliderKind::HorizontalBar if bounds.width > 0.0 => {
                (ev.pos.x / bounds.width).clamp(0.0, 1.0) as f64
            }
            SliderKind::VerticalBar if bounds.height > 0.0 => {
                1.0 - (ev.pos.y / bounds.height).clamp(0.0, 1.0) as f64
            }
            _ => 0.0,
        };
        self.min + frac * (self.max - self.min)
    }

    fn track_pointer(&mut self, main: &mut Main, ev: &InputEvent) {
        let Some(id) = ev.target else {
            return;
        };
        let next = self.value_at(main.tree().bounds(id), ev);
        if next == self.value {
            return;
        }
        self.value = next;
        main.repaint(id);
        if let Some(mut f) = self.on_change.take() {
            f(main, self.value);
            self.on_change = Some(f);
        }
    }
}

impl Widget for Slider {
    fn paint(&mut self, g: &mut Graphics<'_>, style: &dyn Style, bounds: Rect) {
        let extent = match self.kind {
            SliderKind::HorizontalBar => bounds.width,
            SliderKind::VerticalBar => bounds.height,
        };
        let pos = (self.fraction() * extent as f64) as f32;
        style.draw_slider(g, self.kind, bounds, pos);
    }

    fn obstructed(&self, _x: f32, _y: f32) -> bool {
        true
    }

    fn pressed(&mut self, main: &mut Main, event: &InputEvent) {
        self.track_pointer(main, event);
    }

    fn drag(&mut self, main: &mut Main, event: &InputEvent) {
        self.track_pointer(main, event);
    }
}
