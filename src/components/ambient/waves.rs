//! Sine-wave lines drawn across the full width of the surface.
//!
//! A wave has no position to integrate, only a phase that scrolls it
//! sideways. Its baseline is a fraction of the surface height so it follows
//! resizes.

use std::f64::consts::TAU;

use serde::Deserialize;

use super::config::REFERENCE_FPS;
use super::particles::Bounds;
use super::theme::{Color, Palette};

/// Upper bound on waves per background.
pub const MAX_WAVES: usize = 16;

/// Configured shape of one wave line.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveSpec {
	/// Vertical center line as a fraction of the surface height.
	pub baseline: f64,
	/// Peak displacement from the baseline in pixels.
	pub amplitude: f64,
	/// Radians per horizontal pixel.
	pub frequency: f64,
	/// Phase advance in radians per frame at [`REFERENCE_FPS`].
	pub speed: f64,
	pub opacity: f64,
	pub line_width: f64,
}

impl Default for WaveSpec {
	fn default() -> Self {
		Self {
			baseline: 0.5,
			amplitude: 50.0,
			frequency: 0.02,
			speed: 0.01,
			opacity: 0.1,
			line_width: 2.0,
		}
	}
}

impl WaveSpec {
	pub fn sanitized(&self) -> Self {
		let fix = |v: f64, lo: f64, hi: f64| if v.is_finite() { v.clamp(lo, hi) } else { lo };
		Self {
			baseline: fix(self.baseline, 0.0, 1.0),
			amplitude: fix(self.amplitude, 0.0, 10_000.0),
			frequency: fix(self.frequency, 0.0, 1.0),
			speed: fix(self.speed, 0.0, 10.0),
			opacity: fix(self.opacity, 0.0, 1.0),
			line_width: fix(self.line_width, 0.1, 50.0),
		}
	}
}

/// A live wave line.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
	pub baseline: f64,
	pub amplitude: f64,
	pub frequency: f64,
	/// Radians per second.
	pub phase_speed: f64,
	pub phase: f64,
	pub opacity: f64,
	pub line_width: f64,
	pub color: Color,
}

impl Wave {
	pub fn new(spec: &WaveSpec, color: Color) -> Self {
		let spec = spec.sanitized();
		Self {
			baseline: spec.baseline,
			amplitude: spec.amplitude,
			frequency: spec.frequency,
			phase_speed: spec.speed * REFERENCE_FPS,
			phase: 0.0,
			opacity: spec.opacity,
			line_width: spec.line_width,
			color,
		}
	}

	pub fn advance(&mut self, dt: f64) {
		self.phase = (self.phase + self.phase_speed * dt) % TAU;
	}

	/// Height of the line at horizontal pixel `x`.
	pub fn y_at(&self, x: f64, bounds: Bounds) -> f64 {
		self.baseline * bounds.height + (x * self.frequency + self.phase).sin() * self.amplitude
	}
}

/// The waves of one background, in draw order.
#[derive(Clone, Debug, Default)]
pub struct WaveLayer {
	waves: Vec<Wave>,
}

impl WaveLayer {
	/// Wave `i` takes palette color `i`.
	pub fn new(specs: &[WaveSpec], palette: &Palette) -> Self {
		Self {
			waves: specs
				.iter()
				.take(MAX_WAVES)
				.enumerate()
				.map(|(i, spec)| Wave::new(spec, palette.get(i)))
				.collect(),
		}
	}

	pub fn step(&mut self, dt: f64) {
		let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
		for wave in &mut self.waves {
			wave.advance(dt);
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Wave> {
		self.waves.iter()
	}

	pub fn len(&self) -> usize {
		self.waves.len()
	}

	pub fn is_empty(&self) -> bool {
		self.waves.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec(speed: f64) -> WaveSpec {
		WaveSpec {
			speed,
			..WaveSpec::default()
		}
	}

	#[test]
	fn phase_advances_by_per_frame_speed() {
		let mut layer = WaveLayer::new(&[spec(0.01), spec(0.02)], &Palette::violet());
		layer.step(1.0 / REFERENCE_FPS);
		let phases: Vec<f64> = layer.iter().map(|w| w.phase).collect();
		assert!((phases[0] - 0.01).abs() < 1e-12);
		assert!((phases[1] - 0.02).abs() < 1e-12);

		layer.step(-1.0);
		layer.step(f64::NAN);
		assert!((layer.iter().next().unwrap().phase - 0.01).abs() < 1e-12);
	}

	#[test]
	fn phase_stays_bounded() {
		let mut wave = Wave::new(&spec(5.0), Color::WHITE);
		for _ in 0..1000 {
			wave.advance(0.1);
			assert!((0.0..TAU).contains(&wave.phase));
		}
	}

	#[test]
	fn line_follows_the_surface_height() {
		let wave = Wave::new(
			&WaveSpec {
				baseline: 0.3,
				amplitude: 50.0,
				..WaveSpec::default()
			},
			Color::WHITE,
		);
		assert!((wave.y_at(0.0, Bounds::new(800.0, 600.0)) - 180.0).abs() < 1e-9);
		assert!((wave.y_at(0.0, Bounds::new(800.0, 1000.0)) - 300.0).abs() < 1e-9);

		let peak = std::f64::consts::FRAC_PI_2 / wave.frequency;
		assert!((wave.y_at(peak, Bounds::new(800.0, 600.0)) - 230.0).abs() < 1e-9);
	}

	#[test]
	fn layer_is_capped_and_colored_by_index() {
		let specs = vec![WaveSpec::default(); MAX_WAVES + 4];
		let palette = Palette::from(vec![Color::rgb(1, 1, 1), Color::rgb(2, 2, 2)]);
		let layer = WaveLayer::new(&specs, &palette);
		assert_eq!(layer.len(), MAX_WAVES);
		let colors: Vec<Color> = layer.iter().take(3).map(|w| w.color).collect();
		assert_eq!(colors, vec![Color::rgb(1, 1, 1), Color::rgb(2, 2, 2), Color::rgb(1, 1, 1)]);
	}

	#[test]
	fn sanitizing_clamps_wave_shape() {
		let wild = WaveSpec {
			baseline: 3.0,
			amplitude: f64::INFINITY,
			frequency: -1.0,
			speed: f64::NAN,
			opacity: 2.0,
			line_width: 0.0,
		}
		.sanitized();
		assert_eq!(wild.baseline, 1.0);
		assert_eq!(wild.amplitude, 0.0);
		assert_eq!(wild.frequency, 0.0);
		assert_eq!(wild.speed, 0.0);
		assert_eq!(wild.opacity, 1.0);
		assert_eq!(wild.line_width, 0.1);
	}
}
