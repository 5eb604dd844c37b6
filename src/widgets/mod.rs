//! Stock widgets built entirely on the public widget contract.

mod button;
mod panel;
mod slider;

pub use button::Button;
pub use panel::Panel;
pub use slider::Slider;
