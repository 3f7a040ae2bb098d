//! Everything one background animates: its particles, its wave lines and the
//! rare flourishes on top.

use super::config::BackgroundConfig;
use super::field::{ConfigSampler, ParticleField};
use super::flourish::Flourishes;
use super::particles::Bounds;
use super::surface::Surface;
use super::theme::Palette;
use super::waves::WaveLayer;

/// Keeps the flourish dice independent of particle sampling.
const FLOURISH_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct Scene {
	field: ParticleField,
	waves: WaveLayer,
	flourishes: Flourishes,
}

impl Scene {
	/// Populates the scene within `bounds`.
	pub fn new(config: &BackgroundConfig, bounds: Bounds, seed: u64) -> Self {
		let config = config.sanitized();
		let mut field = ParticleField::new(config.boundary_policy);
		field.initialize(
			config.particle_count,
			ConfigSampler::new(&config, seed),
			bounds,
		);

		Self {
			field,
			waves: WaveLayer::new(&config.waves, &Palette::from(config.color_palette.clone())),
			flourishes: Flourishes::new(
				config.streak_chance,
				config.wisp_chance,
				seed ^ FLOURISH_SEED_SALT,
			),
		}
	}

	pub fn step(&mut self, dt: f64, bounds: Bounds) {
		self.field.step(dt, bounds);
		self.waves.step(dt);
		self.flourishes.roll(dt, &self.field, bounds);
	}

	/// Draws waves first, then particles, then this frame's flourishes.
	pub fn draw(&self, surface: &mut impl Surface) {
		for wave in self.waves.iter() {
			surface.draw_wave(wave);
		}
		self.field.for_each(|p| surface.draw_particle(p));
		for streak in self.flourishes.streaks() {
			surface.draw_streak(streak);
		}
		if let Some(wisp) = self.flourishes.wisp() {
			surface.draw_wisp(&wisp);
		}
	}

	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	pub fn waves(&self) -> &WaveLayer {
		&self.waves
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ambient::testing::RecordingSurface;

	#[test]
	fn draws_every_layer_of_the_config() {
		let config = BackgroundConfig {
			particle_count: 6,
			streak_chance: 1.0,
			wisp_chance: 1.0,
			..BackgroundConfig::waves()
		};
		let mut surface = RecordingSurface::new(400.0, 300.0);
		let mut scene = Scene::new(&config, surface.current_bounds(), 1);
		scene.step(0.016, surface.current_bounds());
		scene.draw(&mut surface);

		assert_eq!(surface.waves(), 3);
		assert_eq!(surface.draws(), 6);
		assert_eq!(surface.streaks(), 6);
		assert_eq!(surface.wisps(), 1);
	}

	#[test]
	fn wave_only_scene_has_no_particles() {
		let bounds = Bounds::new(400.0, 300.0);
		let mut scene = Scene::new(&BackgroundConfig::waves(), bounds, 1);
		assert!(scene.field().is_empty());
		scene.step(0.5, bounds);
		assert!(scene.waves().iter().all(|w| w.phase > 0.0));
	}

	#[test]
	fn plain_particles_draw_no_extras() {
		let mut surface = RecordingSurface::new(400.0, 300.0);
		let mut scene = Scene::new(&BackgroundConfig::dust(), surface.current_bounds(), 1);
		for _ in 0..50 {
			scene.step(0.016, surface.current_bounds());
		}
		scene.draw(&mut surface);
		assert_eq!(surface.waves(), 0);
		assert_eq!(surface.streaks(), 0);
		assert_eq!(surface.wisps(), 0);
	}
}
