use liftoff_core::{Position, Velocity};

/// Opacity fade shared by every particle: full at birth, zero at retirement.
///
/// Computed as `1 - age / lifespan` clamped into `0.0..=1.0`.
#[must_use]
pub fn fade(age: f32, lifespan: f32) -> f32 {
    if lifespan <= 0.0 {
        return 0.0;
    }
    (1.0 - age / lifespan).clamp(0.0, 1.0)
}

/// Single live particle owned by a [`crate::ParticleSystem`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    position: Position,
    velocity: Velocity,
    age: f32,
    lifespan: f32,
    peak_opacity: f32,
}

impl Particle {
    pub(crate) fn spawn(
        position: Position,
        velocity: Velocity,
        lifespan: f32,
        peak_opacity: f32,
    ) -> Self {
        Self {
            position,
            velocity,
            age: 0.0,
            lifespan,
            peak_opacity,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Seconds elapsed since spawn.
    #[must_use]
    pub const fn age(&self) -> f32 {
        self.age
    }

    /// Total seconds the particle lives, fixed at spawn.
    #[must_use]
    pub const fn lifespan(&self) -> f32 {
        self.lifespan
    }

    /// Opacity drawn at spawn before fading.
    #[must_use]
    pub const fn peak_opacity(&self) -> f32 {
        self.peak_opacity
    }

    /// Fraction of the lifespan already used, clamped into `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        1.0 - fade(self.age, self.lifespan)
    }

    /// Opacity derived from the particle's age.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        (self.peak_opacity * fade(self.age, self.lifespan)).clamp(0.0, 1.0)
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.age.is_nan() || self.age >= self.lifespan
    }

    /// Integrates one step: move, perturb velocity, age.
    pub(crate) fn step<F>(&mut self, dt: f32, perturbation: &mut F)
    where
        F: FnMut(&Particle, f32) -> Velocity,
    {
        self.position += self.velocity * dt;
        let delta = perturbation(self, dt);
        if delta.is_finite() {
            self.velocity += delta;
        }
        self.age += dt;
    }
}
