//! Rare one-frame effects layered over a starfield: shooting-star streaks
//! trailing from individual particles and faint nebula wisps washing over the
//! whole surface.
//!
//! Chances are configured per frame at [`REFERENCE_FPS`] and rescaled to the
//! real frame time, so a slow display does not see fewer of them per second.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::REFERENCE_FPS;
use super::field::ParticleField;
use super::particles::Bounds;
use super::theme::Color;

/// Length of a streak along each axis, in pixels.
pub const STREAK_LENGTH: f64 = 80.0;

/// A shooting-star line from a particle up and to the left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Streak {
	pub x: f64,
	pub y: f64,
	pub color: Color,
}

impl Streak {
	pub fn tail(&self) -> (f64, f64) {
		(self.x - STREAK_LENGTH, self.y - STREAK_LENGTH)
	}
}

/// A diagonal gradient wash from `top_x` on the top edge to `bottom_x` on the
/// bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wisp {
	pub top_x: f64,
	pub bottom_x: f64,
}

/// Probability of at least one hit during `dt` seconds for an event with
/// `per_frame` probability at [`REFERENCE_FPS`].
pub fn chance_over(dt: f64, per_frame: f64) -> f64 {
	if !dt.is_finite() || dt <= 0.0 || per_frame.is_nan() || per_frame <= 0.0 {
		return 0.0;
	}
	if per_frame >= 1.0 {
		return 1.0;
	}
	1.0 - (1.0 - per_frame).powf(dt * REFERENCE_FPS)
}

/// One Bernoulli trial.
pub fn roll(rng: &mut impl Rng, chance: f64) -> bool {
	chance > 0.0 && rng.random::<f64>() < chance
}

/// Rolls and holds this frame's streaks and wisp.
pub struct Flourishes<R: Rng = SmallRng> {
	streak_chance: f64,
	wisp_chance: f64,
	rng: R,
	streaks: Vec<Streak>,
	wisp: Option<Wisp>,
}

impl Flourishes<SmallRng> {
	pub fn new(streak_chance: f64, wisp_chance: f64, seed: u64) -> Self {
		Self::with_rng(streak_chance, wisp_chance, SmallRng::seed_from_u64(seed))
	}
}

impl<R: Rng> Flourishes<R> {
	pub fn with_rng(streak_chance: f64, wisp_chance: f64, rng: R) -> Self {
		Self {
			streak_chance,
			wisp_chance,
			rng,
			streaks: Vec::new(),
			wisp: None,
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.streak_chance > 0.0 || self.wisp_chance > 0.0
	}

	/// Replaces the previous frame's effects with a fresh roll.
	pub fn roll(&mut self, dt: f64, field: &ParticleField, bounds: Bounds) {
		self.streaks.clear();
		self.wisp = None;
		if !self.is_enabled() {
			return;
		}

		let streak = chance_over(dt, self.streak_chance);
		if streak > 0.0 {
			let (rng, streaks) = (&mut self.rng, &mut self.streaks);
			field.for_each(|p| {
				if roll(&mut *rng, streak) {
					streaks.push(Streak {
						x: p.x,
						y: p.y,
						color: p.color,
					});
				}
			});
		}

		if roll(&mut self.rng, chance_over(dt, self.wisp_chance)) {
			self.wisp = Some(Wisp {
				top_x: self.rng.random::<f64>() * bounds.width,
				bottom_x: self.rng.random::<f64>() * bounds.width,
			});
		}
	}

	pub fn streaks(&self) -> &[Streak] {
		&self.streaks
	}

	pub fn wisp(&self) -> Option<Wisp> {
		self.wisp
	}
}
