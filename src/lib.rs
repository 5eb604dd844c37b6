pub mod app;
pub mod embed;
pub mod error;
pub mod event;
pub mod geometry;
pub mod graphics;
pub mod style;
pub mod tree;
pub mod view;
pub mod widget;
pub mod widgets;

// These modules are public for custom backends and event sources
pub mod backend;
pub mod platform;

pub use app::{Main, MainConfig, Mode};
pub use error::Error;
pub use tree::WidgetId;
pub use widget::Widget;

pub mod prelude {
    pub use crate::app::{Main, MainConfig, Mode};
    pub use crate::backend::{Backend, NativeHandle, NativeView, ViewFlags};
    pub use crate::embed::Embed;
    pub use crate::error::Error;
    pub use crate::event::{InputEvent, Key, Modifiers, MouseButton, ViewEvent};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::graphics::{Align, Graphics, Surface};
    pub use crate::platform::EventLoop;
    pub use crate::style::{Color, ColorId, DefaultStyle, Style};
    pub use crate::tree::{Tree, WidgetId};
    pub use crate::view::{View, ViewId};
    pub use crate::widget::Widget;
    pub use crate::widgets::{Button, Panel, Slider};
}
