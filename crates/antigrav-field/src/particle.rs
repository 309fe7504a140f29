//! A single triangle particle and its per-frame state transition.

use std::f32::consts::TAU;

use antigrav_core::{FieldSettings, POINTER_SENTINEL, Point, Rgb, SurfaceSize};
use rand::Rng;

use crate::canvas::{Canvas, Transform};

/// Per-instance inputs shared by every particle during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Pointer in surface coordinates, or [`POINTER_SENTINEL`].
    pub pointer: Point,
    /// Number of frames executed so far.
    pub frame: u64,
    /// Current surface dimensions.
    pub surface: SurfaceSize,
}

impl FrameContext {
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            pointer: POINTER_SENTINEL,
            frame: 0,
            surface,
        }
    }
}

/// State for a single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Point,
    /// Spawn position.
    pub origin: Point,
    /// Accumulated repulsion impulse.
    pub velocity: Point,
    /// Triangle size.
    pub size: f32,
    /// Fill color.
    pub color: Rgb,
    /// Current angle in radians.
    pub rotation: f32,
    /// Angle added every frame.
    pub rotation_speed: f32,
    /// Offset that desynchronizes jitter between particles.
    pub jitter_phase: f32,
}

impl Particle {
    /// Create a particle somewhere on the spawn ring around the surface center.
    ///
    /// The ring spans `inner_ring * min(w, h)` to `outer_ring * max(w, h)`,
    /// leaving the middle of the surface empty.
    pub fn spawn<R: Rng>(rng: &mut R, surface: SurfaceSize, settings: &FieldSettings) -> Self {
        let angle = sample(rng, 0.0, TAU);
        let min_radius = surface.min_side() * settings.inner_ring;
        let max_radius = surface.max_side() * settings.outer_ring;
        let radius = sample(rng, min_radius, max_radius);

        let center = surface.center();
        let position = Point::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        );

        let speed = settings.rotation_speed_max;

        Self {
            position,
            origin: position,
            velocity: Point::default(),
            size: sample(rng, settings.size_min, settings.size_max),
            color: settings
                .palette
                .get(rng.random_range(0..settings.palette.len())),
            rotation: sample(rng, 0.0, TAU),
            rotation_speed: sample(rng, -speed, speed),
            jitter_phase: sample(rng, 0.0, TAU),
        }
    }

    /// Advance this particle by one frame.
    pub fn update(&mut self, ctx: &FrameContext, settings: &FieldSettings) {
        // Phases stay in f64 so consecutive frames differ on long runs
        let frame = ctx.frame as f64;

        // Idle motion: global breathing pulse plus per-particle jitter
        let pulse = (frame * f64::from(settings.pulse_rate)).sin() as f32 * settings.pulse_amplitude;
        let (jitter_sin, jitter_cos) =
            (frame * f64::from(settings.jitter_rate) + f64::from(self.jitter_phase)).sin_cos();
        let jitter = Point::new(
            jitter_sin as f32 * settings.jitter_amplitude,
            jitter_cos as f32 * settings.jitter_amplitude,
        );

        if let Some(impulse) = repulsion(self.position - ctx.pointer, settings) {
            self.velocity = self.velocity + impulse;
        }

        self.velocity.x *= settings.friction;
        self.velocity.y *= settings.friction;

        self.position = self.position + self.velocity;

        // Drift is applied to position directly, not to velocity
        let center = ctx.surface.center();
        let drift = pulse * settings.drift_scale;
        self.position.x += jitter.x + (self.position.x - center.x) * drift;
        self.position.y += jitter.y + (self.position.y - center.y) * drift;

        self.rotation += self.rotation_speed;
    }

    /// Draw this particle as a rotated triangle.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.fill_triangle(
            Transform::new(self.position, self.rotation),
            self.size,
            self.color,
        );
    }
}

/// Impulse the pointer applies to a particle at `offset` from it.
///
/// Force falls off linearly from `repulsion_strength` at the pointer to zero at
/// `repulsion_radius`. A particle exactly under the pointer has no direction
/// to be pushed in and receives nothing.
pub fn repulsion(offset: Point, settings: &FieldSettings) -> Option<Point> {
    let distance = offset.length();
    let radius = settings.repulsion_radius;

    if !(distance > 0.0 && distance < radius) {
        return None;
    }

    let force = (radius - distance) / radius;
    let scale = force * settings.repulsion_strength / distance;
    Some(Point::new(offset.x * scale, offset.y * scale))
}

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty.
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let t: f32 = rng.random();
    if lo < hi {
        // lo + (hi - lo) * t can round up to hi in f32
        (lo + (hi - lo) * t).min(hi.next_down())
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use super::*;

    fn spawn_one(seed: u64) -> Particle {
        let mut rng = StdRng::seed_from_u64(seed);
        Particle::spawn(
            &mut rng,
            SurfaceSize::new(1000.0, 800.0),
            &FieldSettings::default(),
        )
    }

    #[test]
    fn test_spawn_ranges() {
        let settings = FieldSettings::default();
        let surface = SurfaceSize::new(1000.0, 800.0);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..2000 {
            let p = Particle::spawn(&mut rng, surface, &settings);
            let distance = (p.position - surface.center()).length();
            assert!(distance >= 0.15 * 800.0 - 1e-3, "too close: {distance}");
            assert!(distance <= 0.6 * 1000.0 + 1e-3, "too far: {distance}");
            assert!(p.size >= 4.0 && p.size < 12.0);
            assert!(p.rotation_speed >= -0.025 && p.rotation_speed < 0.025);
            assert!(p.jitter_phase >= 0.0 && p.jitter_phase < TAU);
            assert!(settings.palette.colors().contains(&p.color));
            assert_eq!(p.velocity, Point::default());
            assert_eq!(p.origin, p.position);
        }
    }

    /// Always yields the largest value, so every unit sample is `1 - 2^-24`.
    struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }

    #[test]
    fn test_spawn_upper_bounds_are_exclusive() {
        let settings = FieldSettings::default();
        let p = Particle::spawn(&mut MaxRng, SurfaceSize::new(1000.0, 800.0), &settings);

        assert!(p.size < settings.size_max, "size {}", p.size);
        assert!(p.size >= settings.size_min);
        assert!(p.rotation_speed < settings.rotation_speed_max);
        assert!(p.rotation < TAU);
        assert!(p.jitter_phase < TAU);
    }

    #[test]
    fn test_spawn_with_equal_size_bounds() {
        let settings = FieldSettings {
            size_min: 6.0,
            size_max: 6.0,
            ..FieldSettings::default()
        };
        let p = Particle::spawn(&mut MaxRng, SurfaceSize::new(1000.0, 800.0), &settings);
        assert_eq!(p.size, 6.0);
    }

    #[test]
    fn test_spawn_on_empty_surface_collapses() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::spawn(&mut rng, SurfaceSize::default(), &FieldSettings::default());
        assert_eq!(p.position, Point::default());
    }

    #[test]
    fn test_sentinel_pointer_only_decays_velocity() {
        let settings = FieldSettings::default();
        let ctx = FrameContext::new(SurfaceSize::new(1000.0, 800.0));
        let mut p = spawn_one(3);
        p.velocity = Point::new(3.0, -4.0);
        let initial = p.velocity.length();

        let mut previous = initial;
        for k in 1..=60 {
            let ctx = FrameContext { frame: k, ..ctx };
            p.update(&ctx, &settings);
            let speed = p.velocity.length();
            assert!(speed <= previous);
            assert!(speed <= initial * 0.95f32.powi(k as i32) + 1e-5);
            previous = speed;
        }
        assert!(previous < 0.25);
    }

    #[test]
    fn test_idle_motion_advances_on_long_runs() {
        let settings = FieldSettings::default();
        let surface = SurfaceSize::new(1000.0, 800.0);
        let start = spawn_one(13);

        let step = |frame: u64| {
            let mut p = start.clone();
            let ctx = FrameContext {
                frame,
                ..FrameContext::new(surface)
            };
            p.update(&ctx, &settings);
            p.position - start.position
        };

        // Past 2^24 an f32 frame counter can no longer tell these apart
        let first = step((1 << 25) + 1);
        let second = step((1 << 25) + 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_repulsion_grows_as_pointer_approaches() {
        let settings = FieldSettings::default();
        let magnitudes: Vec<f32> = [149.0, 120.0, 75.0, 30.0, 1.0]
            .iter()
            .map(|&d| {
                repulsion(Point::new(d, 0.0), &settings)
                    .expect("inside radius")
                    .length()
            })
            .collect();

        for pair in magnitudes.windows(2) {
            assert!(pair[1] > pair[0], "{magnitudes:?}");
        }
        assert!(magnitudes[4] <= settings.repulsion_strength);
    }

    #[test]
    fn test_repulsion_points_away_from_pointer() {
        let settings = FieldSettings::default();
        let impulse = repulsion(Point::new(-30.0, 40.0), &settings).unwrap();
        // force = (150 - 50) / 150, times strength 2, along (-0.6, 0.8)
        let expected = 2.0 * 100.0 / 150.0;
        assert!((impulse.length() - expected).abs() < 1e-5);
        assert!(impulse.x < 0.0 && impulse.y > 0.0);
    }

    #[test]
    fn test_repulsion_outside_radius() {
        let settings = FieldSettings::default();
        assert_eq!(repulsion(Point::new(150.0, 0.0), &settings), None);
        assert_eq!(repulsion(Point::new(400.0, 300.0), &settings), None);
    }

    #[test]
    fn test_pointer_on_particle_keeps_velocity_finite() {
        let settings = FieldSettings::default();
        let mut p = spawn_one(11);
        let ctx = FrameContext {
            pointer: p.position,
            frame: 5,
            surface: SurfaceSize::new(1000.0, 800.0),
        };

        p.update(&ctx, &settings);

        assert!(p.velocity.x.is_finite() && p.velocity.y.is_finite());
        assert_eq!(p.velocity, Point::default());
        assert!(p.position.x.is_finite() && p.position.y.is_finite());
    }

    #[test]
    fn test_nearby_pointer_pushes_particle_away() {
        let settings = FieldSettings::default();
        let mut p = spawn_one(5);
        let start = p.position;
        let ctx = FrameContext {
            pointer: Point::new(start.x - 10.0, start.y),
            frame: 0,
            surface: SurfaceSize::new(1000.0, 800.0),
        };

        p.update(&ctx, &settings);

        assert!(p.velocity.x > 1.0);
        assert!(p.position.x > start.x + 1.0);
    }

    #[test]
    fn test_update_advances_rotation() {
        let settings = FieldSettings::default();
        let mut p = spawn_one(9);
        let before = p.rotation;
        p.update(&FrameContext::new(SurfaceSize::new(1000.0, 800.0)), &settings);
        assert!((p.rotation - (before + p.rotation_speed)).abs() < 1e-6);
    }
}
