//! The particle collection and its per-frame step.

use antigrav_core::{FieldSettings, SurfaceSize};
use rand::Rng;

use crate::canvas::Canvas;
use crate::particle::{FrameContext, Particle};

/// A fixed-size field of independent particles.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    settings: FieldSettings,
    /// Incremented on every rebuild; particles never survive one.
    generation: u64,
}

impl ParticleField {
    /// Create an empty field. Call [`ParticleField::rebuild`] to populate it.
    pub fn new(settings: FieldSettings) -> Self {
        Self {
            particles: Vec::new(),
            settings,
            generation: 0,
        }
    }

    /// Discard every particle and spawn a fresh set for `surface`.
    pub fn rebuild<R: Rng>(&mut self, rng: &mut R, surface: SurfaceSize) {
        self.particles = (0..self.settings.particle_count)
            .map(|_| Particle::spawn(rng, surface, &self.settings))
            .collect();
        self.generation += 1;

        log::debug!(
            "rebuilt particle field: {} particles on {}x{} (generation {})",
            self.particles.len(),
            surface.width,
            surface.height,
            self.generation
        );
    }

    /// Update then draw every particle.
    pub fn step<C: Canvas + ?Sized>(&mut self, ctx: &FrameContext, canvas: &mut C) {
        for particle in &mut self.particles {
            particle.update(ctx, &self.settings);
            particle.draw(canvas);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::canvas::DrawList;

    #[test]
    fn test_rebuild_replaces_collection() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = ParticleField::new(FieldSettings::default());
        assert!(field.is_empty());

        field.rebuild(&mut rng, SurfaceSize::new(1000.0, 800.0));
        assert_eq!(field.len(), 400);
        assert_eq!(field.generation(), 1);
        let first = field.particles().to_vec();

        field.rebuild(&mut rng, SurfaceSize::new(300.0, 200.0));
        assert_eq!(field.len(), 400);
        assert_eq!(field.generation(), 2);
        assert_ne!(field.particles(), first.as_slice());

        // Every particle sits on the new, smaller ring.
        let center = SurfaceSize::new(300.0, 200.0).center();
        for p in field.particles() {
            let distance = (p.position - center).length();
            assert!(distance >= 30.0 - 1e-3 && distance <= 180.0 + 1e-3);
        }
    }

    #[test]
    fn test_rebuild_honors_particle_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = FieldSettings {
            particle_count: 12,
            ..FieldSettings::default()
        };
        let mut field = ParticleField::new(settings);
        field.rebuild(&mut rng, SurfaceSize::new(100.0, 100.0));
        assert_eq!(field.len(), 12);
    }

    #[test]
    fn test_step_draws_each_particle_once() {
        let mut rng = StdRng::seed_from_u64(2);
        let surface = SurfaceSize::new(640.0, 480.0);
        let mut field = ParticleField::new(FieldSettings::default());
        field.rebuild(&mut rng, surface);

        let mut canvas = DrawList::new();
        field.step(&FrameContext::new(surface), &mut canvas);

        assert_eq!(canvas.triangles().len(), field.len());
        for (triangle, particle) in canvas.triangles().iter().zip(field.particles()) {
            assert_eq!(triangle.transform.translation, particle.position);
            assert_eq!(triangle.transform.rotation, particle.rotation);
            assert_eq!(triangle.color, particle.color);
        }
    }
}
