//! Text overlay drawn onto captured frames.

pub mod font;
mod label;
mod raster;

pub use label::{Label, GREEN};
pub use raster::{draw_filled_circle, draw_line};
