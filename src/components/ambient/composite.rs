//! One self-contained ambient background: a surface, a scene and the driver
//! that animates them.

use log::debug;

use super::config::BackgroundConfig;
use super::driver::{AnimationDriver, FrameScheduler, TickOutcome};
use super::field::ParticleField;
use super::scene::Scene;
use super::surface::Surface;

/// Wires a [`Scene`], a [`Surface`] and an [`AnimationDriver`] together. Nothing here is shared with other backgrounds on the page.
pub struct AmbientBackground<S: Surface, F: FrameScheduler> {
	surface: S,
	scene: Scene,
	driver: AnimationDriver<F>,
	unmounted: bool,
}

impl<S: Surface, F: FrameScheduler> AmbientBackground<S, F> {
	/// Builds the background and populates its scene within the surface's
	/// current bounds. Does not start animating.
	pub fn new(surface: S, scheduler: F, config: &BackgroundConfig, seed: u64) -> Self {
		let scene = Scene::new(config, surface.current_bounds(), seed);
		debug!(
			"ambient: {} particles, {} waves, {:?} policy",
			scene.field().len(),
			scene.waves().len(),
			scene.field().policy()
		);

		Self {
			surface,
			scene,
			driver: AnimationDriver::new(scheduler),
			unmounted: false,
		}
	}

	/// [`AmbientBackground::new`] followed by [`AmbientBackground::start`].
	pub fn mount(surface: S, scheduler: F, config: &BackgroundConfig, seed: u64) -> Self {
		let mut background = Self::new(surface, scheduler, config, seed);
		background.start();
		background
	}

	pub fn start(&mut self) {
		if !self.unmounted {
			self.driver.start();
		}
	}

	/// Runs one frame. Called from the scheduled frame callback.
	pub fn tick(&mut self, dt: f64) -> TickOutcome {
		self.driver.tick(dt, &mut self.scene, &mut self.surface)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.surface.resize(width, height);
	}

	/// Stops animating for good. Safe to call more than once.
	pub fn unmount(&mut self) {
		if self.unmounted {
			return;
		}
		self.unmounted = true;
		self.driver.stop();
	}

	pub fn is_running(&self) -> bool {
		self.driver.is_running()
	}

	pub fn particle_count(&self) -> usize {
		self.scene.field().len()
	}

	pub fn field(&self) -> &ParticleField {
		self.scene.field()
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}
}
