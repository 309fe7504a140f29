//! Particle field simulation for the antigrav background.
//!
//! A [`ParticleField`] owns a fixed number of triangle particles that drift,
//! pulse, jitter and are pushed away from the pointer. An [`AnimationHost`]
//! drives the field from frames and input delivered by an [`Environment`],
//! drawing through the [`Canvas`] primitive. [`render`] turns the recorded
//! [`DrawList`] into terminal cells.

mod canvas;
mod field;
mod host;
mod particle;
mod render;

pub use canvas::{Canvas, DrawList, DrawTriangle, Transform, triangle_vertices};
pub use field::ParticleField;
pub use host::{AnimationHost, Environment, FrameToken, HostEvent, HostState, Listener};
pub use particle::{FrameContext, Particle, repulsion};
pub use render::{CellScale, Raster, render};
