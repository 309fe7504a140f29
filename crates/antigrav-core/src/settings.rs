//! Tunable constants for the particle field.

use serde::{Deserialize, Serialize};

use crate::color::Palette;

/// Parameters of the particle field. Defaults reproduce the stock effect.
///
/// Distances are in virtual pixels, rates are per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Number of particles created on every rebuild.
    pub particle_count: usize,
    /// Colors a particle picks from at spawn.
    pub palette: Palette,
    /// Pointer distance below which particles are pushed away.
    pub repulsion_radius: f32,
    /// Impulse applied at the pointer center, falling off linearly to zero.
    pub repulsion_strength: f32,
    /// Per-frame velocity multiplier.
    pub friction: f32,
    /// Smallest triangle size (inclusive).
    pub size_min: f32,
    /// Largest triangle size (exclusive).
    pub size_max: f32,
    /// Rotation speeds are drawn from `[-rotation_speed_max, rotation_speed_max)`.
    pub rotation_speed_max: f32,
    /// Angular rate of the global breathing pulse.
    pub pulse_rate: f32,
    /// Peak value of the breathing pulse.
    pub pulse_amplitude: f32,
    /// Angular rate of per-particle jitter.
    pub jitter_rate: f32,
    /// Jitter displacement per frame.
    pub jitter_amplitude: f32,
    /// Scale of the pulse-driven radial drift.
    pub drift_scale: f32,
    /// Inner spawn radius as a fraction of the shorter surface side.
    pub inner_ring: f32,
    /// Outer spawn radius as a fraction of the longer surface side.
    pub outer_ring: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            particle_count: 400,
            palette: Palette::default(),
            repulsion_radius: 150.0,
            repulsion_strength: 2.0,
            friction: 0.95,
            size_min: 4.0,
            size_max: 12.0,
            rotation_speed_max: 0.025,
            pulse_rate: 0.02,
            pulse_amplitude: 0.5,
            jitter_rate: 0.1,
            jitter_amplitude: 0.2,
            drift_scale: 0.001,
            inner_ring: 0.15,
            outer_ring: 0.6,
        }
    }
}
