//! The repeating update/draw cycle.
//!
//! [`AnimationDriver`] is a small state machine, `Idle -> Running -> Stopped`,
//! that owns at most one pending frame request at a time. Frames are requested
//! through a [`FrameScheduler`]; in the browser that is [`RafScheduler`], which
//! maps onto `requestAnimationFrame` / `cancelAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::scene::Scene;
use super::surface::Surface;

/// Longest step a single frame may take, in seconds. Keeps particles from
/// jumping after the tab was in the background.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Step used for the very first frame.
pub const FIRST_FRAME_DELTA: f64 = 1.0 / 60.0;

/// Requests and cancels frame callbacks.
pub trait FrameScheduler {
	type Token;

	/// Requests one callback on the next display refresh. `None` if the
	/// request could not be made.
	fn schedule(&mut self) -> Option<Self::Token>;

	/// Cancels a request made by [`FrameScheduler::schedule`].
	fn cancel(&mut self, token: Self::Token);
}

/// Lifecycle of an [`AnimationDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	Idle,
	Running,
	/// Terminal. A stopped driver is never restarted.
	Stopped,
}

/// What a call to [`AnimationDriver::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// Stepped, drew and requested the next frame.
	Drawn,
	/// The driver was not running; nothing happened.
	Skipped,
	/// The surface is gone; the driver stopped itself.
	Detached,
}

/// Drives a scene and a surface once per display frame.
pub struct AnimationDriver<F: FrameScheduler> {
	state: DriverState,
	scheduler: F,
	pending: Option<F::Token>,
}

impl<F: FrameScheduler> AnimationDriver<F> {
	pub fn new(scheduler: F) -> Self {
		Self {
			state: DriverState::Idle,
			scheduler,
			pending: None,
		}
	}

	pub fn state(&self) -> DriverState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == DriverState::Running
	}

	/// Starts ticking. No-op unless the driver is idle.
	pub fn start(&mut self) {
		if self.state != DriverState::Idle {
			return;
		}
		self.state = DriverState::Running;
		self.request_frame();
	}

	/// Stops ticking and cancels the pending frame. No-op unless running.
	pub fn stop(&mut self) {
		if self.state != DriverState::Running {
			return;
		}
		self.state = DriverState::Stopped;
		if let Some(token) = self.pending.take() {
			self.scheduler.cancel(token);
		}
	}

	/// Runs one frame: step the scene within the current bounds, clear, draw
	/// it, then request the next frame.
	///
	/// Call this from the scheduled callback; the pending request is
	/// considered consumed.
	pub fn tick(
		&mut self,
		dt: f64,
		scene: &mut Scene,
		surface: &mut impl Surface,
	) -> TickOutcome {
		if self.state != DriverState::Running {
			return TickOutcome::Skipped;
		}
		self.pending = None;

		if !surface.is_attached() {
			info!("ambient: surface detached, stopping animation");
			self.stop();
			return TickOutcome::Detached;
		}

		let bounds = surface.current_bounds();
		scene.step(dt, bounds);
		surface.clear();
		scene.draw(surface);

		self.request_frame();
		TickOutcome::Drawn
	}

	fn request_frame(&mut self) {
		match self.scheduler.schedule() {
			Some(token) => self.pending = Some(token),
			None => {
				warn!("ambient: could not request an animation frame, stopping");
				self.state = DriverState::Stopped;
			}
		}
	}
}

/// Seconds between two refresh-signal timestamps given in milliseconds.
pub fn frame_delta(previous_ms: Option<f64>, now_ms: f64) -> f64 {
	match previous_ms {
		None => FIRST_FRAME_DELTA,
		Some(prev) => {
			let dt = (now_ms - prev) / 1000.0;
			if dt.is_finite() {
				dt.clamp(0.0, MAX_FRAME_DELTA)
			} else {
				FIRST_FRAME_DELTA
			}
		}
	}
}

/// Shared slot holding the frame callback handed to `requestAnimationFrame`.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`FrameScheduler`] over `window.requestAnimationFrame`.
///
/// The callback lives in a shared slot so it can be installed after the
/// driver is built; scheduling fails while the slot is empty.
pub struct RafScheduler {
	window: Window,
	callback: FrameCallback,
}

impl RafScheduler {
	pub fn new(window: Window, callback: FrameCallback) -> Self {
		Self { window, callback }
	}
}

impl FrameScheduler for RafScheduler {
	type Token = i32;

	fn schedule(&mut self) -> Option<i32> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map_err(|e| warn!("ambient: requestAnimationFrame failed: {e:?}"))
			.ok()
	}

	fn cancel(&mut self, token: i32) {
		if let Err(e) = self.window.cancel_animation_frame(token) {
			warn!("ambient: cancelAnimationFrame failed: {e:?}");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ambient::config::BackgroundConfig;
	use crate::components::ambient::particles::Bounds;
	use crate::components::ambient::testing::{ManualScheduler, RecordingSurface};

	fn scene(bounds: Bounds) -> Scene {
		let config = BackgroundConfig {
			particle_count: 12,
			..BackgroundConfig::dust()
		};
		Scene::new(&config, bounds, 1)
	}

	#[test]
	fn start_twice_schedules_once() {
		let scheduler = ManualScheduler::default();
		let mut driver = AnimationDriver::new(scheduler.clone());
		driver.start();
		driver.start();
		assert!(driver.is_running());
		assert_eq!(scheduler.requested(), 1);
		assert_eq!(scheduler.pending(), 1);
	}

	#[test]
	fn stop_twice_leaves_nothing_pending() {
		let scheduler = ManualScheduler::default();
		let mut driver = AnimationDriver::new(scheduler.clone());
		driver.start();
		driver.stop();
		driver.stop();
		assert_eq!(driver.state(), DriverState::Stopped);
		assert_eq!(scheduler.pending(), 0);
		assert_eq!(scheduler.cancelled(), 1);
	}

	#[test]
	fn stop_is_ignored_while_idle_and_stopped_is_terminal() {
		let scheduler = ManualScheduler::default();
		let mut driver = AnimationDriver::new(scheduler.clone());
		driver.stop();
		assert_eq!(driver.state(), DriverState::Idle);

		driver.start();
		driver.stop();
		driver.start();
		assert_eq!(driver.state(), DriverState::Stopped);
		assert_eq!(scheduler.requested(), 1);
		assert_eq!(scheduler.pending(), 0);
	}

	#[test]
	fn tick_steps_before_drawing_and_reschedules() {
		let scheduler = ManualScheduler::default();
		let mut driver = AnimationDriver::new(scheduler.clone());
		let mut surface = RecordingSurface::new(400.0, 300.0);
		let mut scene = scene(surface.current_bounds());

		assert_eq!(
			driver.tick(0.016, &mut scene, &mut surface),
			TickOutcome::Skipped
		);
		assert_eq!(surface.clears(), 0);

		driver.start();
		assert!(scheduler.fire());
		assert_eq!(
			driver.tick(0.016, &mut scene, &mut surface),
			TickOutcome::Drawn
		);
		assert_eq!(surface.clears(), 1);
		assert_eq!(surface.draws(), 12);
		assert_eq!(scheduler.pending(), 1);
		assert_eq!(scheduler.requested(), 2);
	}

	#[test]
	fn detached_surface_stops_the_driver() {
		let scheduler = ManualScheduler::default();
		let mut driver = AnimationDriver::new(scheduler.clone());
		let mut surface = RecordingSurface::new(400.0, 300.0);
		let mut scene = scene(surface.current_bounds());

		driver.start();
		surface.detach();
		assert!(scheduler.fire());
		assert_eq!(
			driver.tick(0.016, &mut scene, &mut surface),
			TickOutcome::Detached
		);
		assert_eq!(driver.state(), DriverState::Stopped);
		assert_eq!(scheduler.pending(), 0);
		assert_eq!(surface.draws(), 0);
	}

	#[test]
	fn failing_scheduler_stops_instead_of_spinning() {
		let scheduler = ManualScheduler::default();
		scheduler.refuse();
		let mut driver = AnimationDriver::new(scheduler.clone());
		driver.start();
		assert_eq!(driver.state(), DriverState::Stopped);
		assert_eq!(scheduler.pending(), 0);
	}

	#[test]
	fn frame_delta_is_clamped() {
		assert_eq!(frame_delta(None, 1234.0), FIRST_FRAME_DELTA);
		assert!((frame_delta(Some(1000.0), 1016.0) - 0.016).abs() < 1e-12);
		assert_eq!(frame_delta(Some(1000.0), 9000.0), MAX_FRAME_DELTA);
		assert_eq!(frame_delta(Some(1000.0), 990.0), 0.0);
		assert_eq!(frame_delta(Some(f64::NAN), 990.0), FIRST_FRAME_DELTA);
	}
}
