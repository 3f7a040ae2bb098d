//! Render surfaces the animation draws into.
//!
//! [`Surface`] is what the driver talks to each tick; [`CanvasSurface`] is the
//! browser implementation backed by a 2d canvas context. Drawing never feeds
//! back into particle state except through [`Surface::current_bounds`].

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::config::{Backdrop, Glow};
use super::error::AmbientError;
use super::flourish::{Streak, Wisp};
use super::particles::{Bounds, Particle};
use super::theme::Color;
use super::waves::Wave;

/// A drawable area sized to its container.
pub trait Surface {
	/// Updates the drawable size. Called on creation and on every resize.
	fn resize(&mut self, width: f64, height: f64);

	/// Wipes the whole surface before a draw pass.
	fn clear(&mut self);

	/// Draws one particle honoring its color, size and current opacity.
	fn draw_particle(&mut self, particle: &Particle);

	/// Strokes one wave line across the full width.
	fn draw_wave(&mut self, wave: &Wave);

	/// Strokes a shooting-star streak.
	fn draw_streak(&mut self, streak: &Streak);

	/// Washes a nebula wisp over the whole surface.
	fn draw_wisp(&mut self, wisp: &Wisp);

	/// Size the particle field should step within.
	fn current_bounds(&self) -> Bounds;

	/// False once the underlying target is gone (e.g. removed from the page).
	fn is_attached(&self) -> bool {
		true
	}
}

/// Opacity below which a particle is not worth a draw call.
const MIN_VISIBLE_ALPHA: f64 = 0.005;

const STREAK_ALPHA: f64 = 0.8;
const STREAK_BLUR: f64 = 8.0;

const WISP_STOPS: [(f32, Color); 3] = [
	(0.0, Color::rgba(138, 43, 226, 0.1)),
	(0.5, Color::rgba(75, 0, 130, 0.05)),
	(1.0, Color::rgba(25, 25, 35, 0.0)),
];

/// A [`Surface`] backed by an HTML canvas element.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	bounds: Bounds,
	glow: Glow,
	backdrop: Option<Backdrop>,
	offset: (f64, f64),
}

impl CanvasSurface {
	/// Wraps `canvas`, sizing it to `width` × `height`.
	pub fn new(
		canvas: HtmlCanvasElement,
		width: f64,
		height: f64,
		glow: Glow,
		backdrop: Option<Backdrop>,
	) -> Result<Self, AmbientError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(AmbientError::NoContext)?
			.dyn_into()
			.map_err(|_| AmbientError::NoContext)?;

		let mut surface = Self {
			canvas,
			ctx,
			bounds: Bounds::new(width, height),
			glow,
			backdrop,
			offset: (0.0, 0.0),
		};
		surface.resize(width, height);
		Ok(surface)
	}

	/// Shifts everything drawn by `(dx, dy)` pixels. Used for pointer parallax.
	pub fn set_offset(&mut self, dx: f64, dy: f64) {
		self.offset = (dx, dy);
	}

	fn draw_backdrop(&self, backdrop: &Backdrop) {
		let Bounds { width, height } = self.bounds;
		let Ok(gradient) = self.ctx.create_radial_gradient(
			width / 2.0,
			height / 2.0,
			0.0,
			width / 2.0,
			height / 2.0,
			width.max(height) / 2.0,
		) else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &backdrop.inner.to_css());
		let _ = gradient.add_color_stop(1.0, &backdrop.outer.to_css());

		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
	}

	/// Radial gradient from the particle color to transparent. Falls back to a
	/// flat fill if the gradient cannot be created.
	fn fill_halo(&self, p: &Particle, x: f64, y: f64, radius: f64, alpha: f64) {
		match self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius) {
			Ok(gradient) => {
				let _ = gradient.add_color_stop(0.0, &p.color.to_css_with_opacity(alpha));
				let _ = gradient.add_color_stop(0.3, &p.color.to_css_with_opacity(alpha * 0.5));
				let _ = gradient.add_color_stop(1.0, &p.color.with_alpha(0.0).to_css());
				#[allow(deprecated)]
				self.ctx.set_fill_style(&gradient);
			}
			Err(_) => self
				.ctx
				.set_fill_style_str(&p.color.to_css_with_opacity(alpha * 0.5)),
		}
		self.fill_circle(x, y, radius);
	}
}

impl Surface for CanvasSurface {
	fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width, height);
		self.canvas.set_width(self.bounds.width as u32);
		self.canvas.set_height(self.bounds.height as u32);
	}

	fn clear(&mut self) {
		self.ctx
			.clear_rect(0.0, 0.0, self.bounds.width, self.bounds.height);
		if let Some(backdrop) = self.backdrop {
			self.draw_backdrop(&backdrop);
		}
	}

	fn draw_particle(&mut self, p: &Particle) {
		let alpha = p.current_opacity();
		if alpha < MIN_VISIBLE_ALPHA {
			return;
		}
		let (x, y) = (p.x + self.offset.0, p.y + self.offset.1);
		let size = p.current_size();

		match self.glow {
			Glow::None => {
				self.ctx.set_fill_style_str(&p.color.to_css_with_opacity(alpha));
				self.fill_circle(x, y, size);
			}
			Glow::Shadow { blur } => {
				let css = p.color.to_css_with_opacity(alpha);
				self.ctx.set_shadow_color(&css);
				self.ctx.set_shadow_blur(blur);
				self.ctx.set_fill_style_str(&css);
				self.fill_circle(x, y, size);
				self.ctx.set_shadow_blur(0.0);
			}
			Glow::Halo => self.fill_halo(p, x, y, size, alpha),
			Glow::Corona => {
				self.fill_halo(p, x, y, size * 3.0, alpha);
				self.ctx
					.set_fill_style_str(&p.color.lighten(0.2).to_css_with_opacity(alpha));
				self.fill_circle(x, y, size);
			}
		}
	}

	fn draw_wave(&mut self, wave: &Wave) {
		let (dx, dy) = self.offset;
		self.ctx.save();
		self.ctx.set_global_alpha(wave.opacity);
		self.ctx.set_stroke_style_str(&wave.color.to_css());
		self.ctx.set_line_width(wave.line_width);
		self.ctx.begin_path();
		// Shift the pattern rather than the line so no gap opens at the edges
		for px in 0..=self.bounds.width as u32 {
			let x = px as f64;
			let y = wave.y_at(x - dx, self.bounds) + dy;
			if px == 0 {
				self.ctx.move_to(x, y);
			} else {
				self.ctx.line_to(x, y);
			}
		}
		self.ctx.stroke();
		self.ctx.restore();
	}

	fn draw_streak(&mut self, streak: &Streak) {
		let (dx, dy) = self.offset;
		let (tail_x, tail_y) = streak.tail();
		let css = streak.color.to_css();
		self.ctx.save();
		self.ctx.set_global_alpha(STREAK_ALPHA);
		self.ctx.set_stroke_style_str(&css);
		self.ctx.set_line_width(1.0);
		self.ctx.set_shadow_color(&css);
		self.ctx.set_shadow_blur(STREAK_BLUR);
		self.ctx.begin_path();
		self.ctx.move_to(streak.x + dx, streak.y + dy);
		self.ctx.line_to(tail_x + dx, tail_y + dy);
		self.ctx.stroke();
		self.ctx.restore();
	}

	fn draw_wisp(&mut self, wisp: &Wisp) {
		let Bounds { width, height } = self.bounds;
		let gradient = self
			.ctx
			.create_linear_gradient(wisp.top_x, 0.0, wisp.bottom_x, height);
		for (offset, color) in WISP_STOPS {
			let _ = gradient.add_color_stop(offset, &color.to_css());
		}
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn current_bounds(&self) -> Bounds {
		self.bounds
	}

	fn is_attached(&self) -> bool {
		self.canvas.is_connected()
	}
}
