//! Fixed-size particle collections and the samplers that populate them.

use std::f64::consts::TAU;

use log::warn;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::{BackgroundConfig, Drift, REFERENCE_FPS};
use super::particles::{BoundaryPolicy, Bounds, Edge, Particle, inside};
use super::theme::Palette;

/// Produces particles for a field.
///
/// Samplers always receive the surface's current bounds, so particles born
/// after a resize land inside the new area.
pub trait Sampler {
	/// A brand new particle somewhere inside `bounds`.
	fn sample(&mut self, bounds: Bounds) -> Particle;

	/// Puts a particle that left through `exit` back on the opposite edge.
	fn respawn(&mut self, particle: &mut Particle, bounds: Bounds, exit: Edge);
}

/// Random sampler driven by a [`BackgroundConfig`].
pub struct ConfigSampler {
	config: BackgroundConfig,
	palette: Palette,
	rng: SmallRng,
}

impl ConfigSampler {
	pub fn new(config: &BackgroundConfig, seed: u64) -> Self {
		let config = config.sanitized();
		Self {
			palette: Palette::from(config.color_palette.clone()),
			config,
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	fn between(&mut self, (lo, hi): (f64, f64)) -> f64 {
		self.rng.random_range(lo..=hi)
	}
}

impl Sampler for ConfigSampler {
	fn sample(&mut self, bounds: Bounds) -> Particle {
		let speed = self.between(self.config.speed_range) * REFERENCE_FPS;
		let (vx, vy) = match self.config.drift {
			Drift::Scatter => {
				let angle = self.rng.random::<f64>() * TAU;
				(angle.cos() * speed, angle.sin() * speed)
			}
			Drift::Fall => (0.0, speed),
			Drift::Rise => (0.0, -speed),
		};
		let opacity = self.between(self.config.opacity_range);
		let color = self.palette.get(self.rng.random_range(0..self.palette.colors.len()));

		Particle {
			x: self.rng.random::<f64>() * bounds.width,
			y: self.rng.random::<f64>() * bounds.height,
			vx,
			vy,
			size: self.between(self.config.size_range),
			base_opacity: opacity,
			opacity,
			opacity_mode: self.config.opacity_mode,
			color,
			phase: self.rng.random::<f64>() * TAU,
			twinkle: self.rng.random::<f64>() * TAU,
			phase_speed: self.between(self.config.phase_speed_range) * REFERENCE_FPS,
			fade_rate: self.config.fade_rate,
		}
	}

	fn respawn(&mut self, particle: &mut Particle, bounds: Bounds, exit: Edge) {
		let along_x = self.rng.random::<f64>() * bounds.width;
		let along_y = self.rng.random::<f64>() * bounds.height;
		(particle.x, particle.y) = match exit {
			Edge::Bottom => (along_x, 0.0),
			Edge::Top => (along_x, inside(bounds.height)),
			Edge::Right => (0.0, along_y),
			Edge::Left => (inside(bounds.width), along_y),
		};
		particle.opacity = particle.base_opacity;
	}
}

/// Owns a fixed number of particles and evolves them one step at a time.
pub struct ParticleField {
	particles: Vec<Particle>,
	policy: BoundaryPolicy,
	sampler: Option<Box<dyn Sampler>>,
}

impl ParticleField {
	pub fn new(policy: BoundaryPolicy) -> Self {
		Self {
			particles: Vec::new(),
			policy,
			sampler: None,
		}
	}

	/// Populates the field. Must be called exactly once.
	pub fn initialize(&mut self, count: usize, sampler: impl Sampler + 'static, bounds: Bounds) {
		debug_assert!(self.sampler.is_none(), "particle field initialized twice");
		if self.sampler.is_some() {
			warn!("ambient: ignoring repeated field initialization");
			return;
		}

		let mut sampler: Box<dyn Sampler> = Box::new(sampler);
		self.particles = (0..count).map(|_| sampler.sample(bounds)).collect();
		self.sampler = Some(sampler);
	}

	/// Advances every particle by `dt` seconds within `bounds`.
	pub fn step(&mut self, dt: f64, bounds: Bounds) {
		let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
		let Some(sampler) = self.sampler.as_mut() else {
			return;
		};

		for p in &mut self.particles {
			if let Some(edge) = p.advance(dt, bounds, self.policy) {
				sampler.respawn(p, bounds, edge);
			}
			if p.is_spent() {
				*p = sampler.sample(bounds);
			}
		}
	}

	/// Visits particles in draw order.
	pub fn for_each(&self, mut visitor: impl FnMut(&Particle)) {
		for p in &self.particles {
			visitor(p);
		}
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn policy(&self) -> BoundaryPolicy {
		self.policy
	}
}
