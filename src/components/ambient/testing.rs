//! Host-side doubles for the browser pieces: a scheduler that only fires when
//! told to and a surface that counts what it was asked to draw.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::driver::FrameScheduler;
use super::flourish::{Streak, Wisp};
use super::particles::{Bounds, OpacityMode, Particle};
use super::theme::Color;
use super::waves::Wave;
use super::surface::Surface;

impl Particle {
	/// A steady, phase-less particle at rest.
	pub fn at(x: f64, y: f64, size: f64, color: Color) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size,
			base_opacity: 1.0,
			opacity: 1.0,
			opacity_mode: OpacityMode::Steady,
			color,
			phase: 0.0,
			twinkle: 0.0,
			phase_speed: 0.0,
			fade_rate: 0.0,
		}
	}

	pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
		self.vx = vx;
		self.vy = vy;
		self
	}
}

#[derive(Default)]
struct SchedulerLog {
	next: u32,
	pending: BTreeSet<u32>,
	requested: usize,
	cancelled: usize,
	refuse: bool,
}

/// Frame scheduler whose callbacks run only through [`ManualScheduler::fire`].
/// Clones share the same log.
#[derive(Clone, Default)]
pub struct ManualScheduler {
	log: Rc<RefCell<SchedulerLog>>,
}

impl ManualScheduler {
	/// Consumes the oldest pending request, as the browser would when the frame
	/// arrives. Returns false if nothing was pending.
	pub fn fire(&self) -> bool {
		let mut log = self.log.borrow_mut();
		log.pending.pop_first().is_some()
	}

	/// Makes every following `schedule` fail.
	pub fn refuse(&self) {
		self.log.borrow_mut().refuse = true;
	}

	pub fn pending(&self) -> usize {
		self.log.borrow().pending.len()
	}

	pub fn requested(&self) -> usize {
		self.log.borrow().requested
	}

	pub fn cancelled(&self) -> usize {
		self.log.borrow().cancelled
	}
}

impl FrameScheduler for ManualScheduler {
	type Token = u32;

	fn schedule(&mut self) -> Option<u32> {
		let mut log = self.log.borrow_mut();
		if log.refuse {
			return None;
		}
		log.next += 1;
		let token = log.next;
		log.pending.insert(token);
		log.requested += 1;
		Some(token)
	}

	fn cancel(&mut self, token: u32) {
		let mut log = self.log.borrow_mut();
		if log.pending.remove(&token) {
			log.cancelled += 1;
		}
	}
}

/// Surface that records draw calls instead of rendering.
pub struct RecordingSurface {
	bounds: Bounds,
	attached: bool,
	clears: usize,
	draws: usize,
	waves: usize,
	streaks: usize,
	wisps: usize,
	last_frame: Vec<(f64, f64)>,
}

impl RecordingSurface {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			bounds: Bounds::new(width, height),
			attached: true,
			clears: 0,
			draws: 0,
			waves: 0,
			streaks: 0,
			wisps: 0,
			last_frame: Vec::new(),
		}
	}

	pub fn detach(&mut self) {
		self.attached = false;
	}

	pub fn clears(&self) -> usize {
		self.clears
	}

	pub fn draws(&self) -> usize {
		self.draws
	}

	pub fn waves(&self) -> usize {
		self.waves
	}

	pub fn streaks(&self) -> usize {
		self.streaks
	}

	pub fn wisps(&self) -> usize {
		self.wisps
	}

	/// Particle positions drawn since the last clear.
	pub fn last_frame(&self) -> &[(f64, f64)] {
		&self.last_frame
	}
}

impl Surface for RecordingSurface {
	fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width, height);
	}

	fn clear(&mut self) {
		self.clears += 1;
		self.last_frame.clear();
	}

	fn draw_particle(&mut self, particle: &Particle) {
		self.draws += 1;
		self.last_frame.push((particle.x, particle.y));
	}

	fn draw_wave(&mut self, _wave: &Wave) {
		self.waves += 1;
	}

	fn draw_streak(&mut self, _streak: &Streak) {
		self.streaks += 1;
	}

	fn draw_wisp(&mut self, _wisp: &Wisp) {
		self.wisps += 1;
	}

	fn current_bounds(&self) -> Bounds {
		self.bounds
	}

	fn is_attached(&self) -> bool {
		self.attached
	}
}
