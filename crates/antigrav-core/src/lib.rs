//! Core types shared by the antigrav crates.
//!
//! Everything here is plain data: colors, the particle palette, surface
//! geometry and the tunable constants that drive the particle field.

mod color;
mod geometry;
mod settings;

pub use color::{ColorError, Palette, Rgb};
pub use geometry::{POINTER_SENTINEL, Point, SurfaceSize};
pub use settings::FieldSettings;
