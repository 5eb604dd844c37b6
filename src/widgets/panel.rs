use crate::geometry::Rect;
use crate::graphics::Graphics;
use crate::style::{Color, Style};
use crate::widget::Widget;

/// A plain grouping container, optionally filled with a solid color.
///
/// Panels never obstruct hit-testing: input passes through to whatever
/// interactive widget lies underneath.
#[derive(Default)]
pub struct Panel {
    fill: Option<Color>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

impl Widget for Panel {
    fn paint(&mut self, g: &mut Graphics<'_>, _style: &dyn Style, bounds: Rect) {
        if let Some(color) = self.fill {
            g.set_color(color);
            g.fill_rect(bounds);
        }
    }
}
