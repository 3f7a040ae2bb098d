//! Ambient particle model: a single drifting, fading point and its step rule.

use std::f64::consts::TAU;

use serde::Deserialize;

use super::theme::Color;

/// Speed of [`Particle::twinkle`] relative to [`Particle::phase`].
pub const TWINKLE_RATE: f64 = 1.5;

/// Drawable area the particles live in, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	/// Bounds with both extents clamped to at least one pixel.
	pub fn new(width: f64, height: f64) -> Self {
		let extent = |v: f64| if v.is_finite() { v.max(1.0) } else { 1.0 };
		Self {
			width: extent(width),
			height: extent(height),
		}
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		(0.0..self.width).contains(&x) && (0.0..self.height).contains(&y)
	}
}

/// What happens when a particle crosses the edge of the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
	/// Re-enter on the opposite side (toroidal).
	#[default]
	Wrap,
	/// Bounce: the crossed velocity component flips sign.
	Reflect,
	/// Respawn on the opposite edge at a fresh coordinate.
	Recycle,
}

/// The edge a recycled particle left through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
	Left,
	Right,
	Top,
	Bottom,
}

/// How a particle's opacity evolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpacityMode {
	#[default]
	Steady,
	/// Starlight: sinusoidal breathing of opacity and size, with a faster
	/// twinkle on top.
	Pulse,
	/// Gentle shimmer between 60% and 100% of the base opacity.
	Twinkle,
	/// Monotonic decay; a fully faded particle is replaced by the field.
	Fade,
}

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	/// Horizontal velocity in pixels per second.
	pub vx: f64,
	/// Vertical velocity in pixels per second.
	pub vy: f64,
	/// Radius in pixels.
	pub size: f64,
	pub base_opacity: f64,
	pub opacity: f64,
	pub opacity_mode: OpacityMode,
	pub color: Color,
	pub phase: f64,
	/// Second, faster phase used by [`OpacityMode::Pulse`].
	pub twinkle: f64,
	/// Phase advance in radians per second.
	pub phase_speed: f64,
	/// Opacity lost per second in [`OpacityMode::Fade`].
	pub fade_rate: f64,
}

impl Particle {
	/// Moves the particle by one step and applies `policy`.
	///
	/// Returns the edge the particle left through when `policy` is
	/// [`BoundaryPolicy::Recycle`] and it is no longer on the surface; the
	/// caller is expected to respawn it.
	pub fn advance(&mut self, dt: f64, bounds: Bounds, policy: BoundaryPolicy) -> Option<Edge> {
		self.x += self.vx * dt;
		self.y += self.vy * dt;
		self.phase = (self.phase + self.phase_speed * dt) % TAU;
		self.twinkle = (self.twinkle + self.phase_speed * TWINKLE_RATE * dt) % TAU;

		if self.opacity_mode == OpacityMode::Fade {
			self.opacity = (self.opacity - self.fade_rate * dt).max(0.0);
		}

		match policy {
			BoundaryPolicy::Wrap => {
				self.x = wrap_axis(self.x, bounds.width);
				self.y = wrap_axis(self.y, bounds.height);
				None
			}
			BoundaryPolicy::Reflect => {
				(self.x, self.vx) = reflect_axis(self.x, self.vx, bounds.width);
				(self.y, self.vy) = reflect_axis(self.y, self.vy, bounds.height);
				None
			}
			BoundaryPolicy::Recycle => self.exit_edge(bounds),
		}
	}

	fn exit_edge(&self, bounds: Bounds) -> Option<Edge> {
		if self.y >= bounds.height {
			Some(Edge::Bottom)
		} else if self.y < 0.0 {
			Some(Edge::Top)
		} else if self.x >= bounds.width {
			Some(Edge::Right)
		} else if self.x < 0.0 {
			Some(Edge::Left)
		} else {
			None
		}
	}

	/// Opacity to draw with, including pulse/twinkle modulation.
	pub fn current_opacity(&self) -> f64 {
		let alpha = match self.opacity_mode {
			OpacityMode::Steady | OpacityMode::Fade => self.opacity,
			OpacityMode::Pulse => {
				let pulse = 0.6 + 0.4 * self.phase.sin();
				let twinkle = 0.8 + 0.2 * (self.twinkle * 3.0).sin();
				self.base_opacity * pulse * twinkle
			}
			OpacityMode::Twinkle => {
				let twinkle = (self.phase.sin() * 0.5 + 0.5) * 0.4 + 0.6;
				self.base_opacity * twinkle
			}
		};
		alpha.clamp(0.0, 1.0)
	}

	/// Radius to draw with. Pulsing stars swell and shrink by up to 20%.
	pub fn current_size(&self) -> f64 {
		match self.opacity_mode {
			OpacityMode::Pulse => self.size * (0.8 + 0.2 * (self.phase * 2.0).sin()),
			_ => self.size,
		}
	}

	/// A fading particle that has nothing left to show.
	pub fn is_spent(&self) -> bool {
		self.opacity_mode == OpacityMode::Fade && self.opacity <= 0.0
	}
}

/// Largest coordinate strictly inside `[0, extent)`.
pub(crate) fn inside(extent: f64) -> f64 {
	extent - f64::EPSILON * extent.max(1.0)
}

fn wrap_axis(pos: f64, extent: f64) -> f64 {
	let wrapped = pos.rem_euclid(extent);
	// rem_euclid rounds tiny negatives up to `extent`
	if wrapped >= extent || !wrapped.is_finite() {
		0.0
	} else {
		wrapped
	}
}

fn reflect_axis(pos: f64, vel: f64, extent: f64) -> (f64, f64) {
	let (pos, vel) = if pos < 0.0 {
		(-pos, vel.abs())
	} else if pos >= extent {
		(2.0 * extent - pos, -vel.abs())
	} else {
		(pos, vel)
	};
	// Overshooting by more than a full extent (e.g. right after a shrink)
	if pos.is_finite() {
		(pos.clamp(0.0, inside(extent)), vel)
	} else {
		(0.0, vel)
	}
}
