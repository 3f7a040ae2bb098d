//! Background configuration supplied by the hosting page.
//!
//! Configs are plain JSON objects with camelCase keys. Every key is optional
//! and falls back to [`BackgroundConfig::default`]:
//!
//! ```json
//! {
//!   "particleCount": 10,
//!   "colorPalette": ["#a855f7", "rgb(217 95 228)"],
//!   "boundaryPolicy": "wrap",
//!   "sizeRange": [1, 3],
//!   "speedRange": [0.1, 0.5]
//! }
//! ```

use std::collections::HashMap;

use log::warn;
use serde::Deserialize;

use super::error::AmbientError;
use super::particles::{BoundaryPolicy, OpacityMode};
use super::theme::{Color, Palette};
use super::waves::{MAX_WAVES, WaveSpec};

/// Upper bound on particles per background.
pub const MAX_PARTICLES: usize = 2000;

/// Frame rate at which configured per-frame speeds are expressed.
pub const REFERENCE_FPS: f64 = 60.0;

/// Heading of newly sampled particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Drift {
	/// Uniformly random direction.
	#[default]
	Scatter,
	/// Straight down, like falling stars.
	Fall,
	/// Straight up, like rising sparks.
	Rise,
}

/// Cosmetic glow drawn around each particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Glow {
	#[default]
	None,
	/// Canvas shadow blur in the particle's own color.
	Shadow { blur: f64 },
	/// Radial gradient fading from the particle color to transparent.
	Halo,
	/// Halo three times the radius plus a solid core.
	Corona,
}

/// Radial gradient painted under the particles on every clear.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Backdrop {
	pub inner: Color,
	pub outer: Color,
}

/// Options recognised when mounting an ambient background.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundConfig {
	pub particle_count: usize,
	pub color_palette: Vec<Color>,
	pub boundary_policy: BoundaryPolicy,
	/// Radius range in pixels.
	pub size_range: (f64, f64),
	/// Speed range in pixels per frame at [`REFERENCE_FPS`].
	pub speed_range: (f64, f64),
	pub opacity_range: (f64, f64),
	pub opacity_mode: OpacityMode,
	/// Phase advance in radians per frame at [`REFERENCE_FPS`].
	pub phase_speed_range: (f64, f64),
	/// Opacity lost per second in [`OpacityMode::Fade`].
	pub fade_rate: f64,
	pub drift: Drift,
	pub glow: Glow,
	pub backdrop: Option<Backdrop>,
	/// Maximum pointer parallax offset in pixels; zero disables it.
	pub parallax: f64,
	/// Sine-wave lines drawn under the particles.
	pub waves: Vec<WaveSpec>,
	/// Per-particle chance of a shooting-star streak, per frame at
	/// [`REFERENCE_FPS`].
	pub streak_chance: f64,
	/// Chance of a nebula wisp over the whole surface, per frame at
	/// [`REFERENCE_FPS`].
	pub wisp_chance: f64,
}

impl Default for BackgroundConfig {
	fn default() -> Self {
		Self {
			particle_count: 50,
			color_palette: Palette::violet().colors,
			boundary_policy: BoundaryPolicy::Wrap,
			size_range: (1.0, 4.0),
			speed_range: (0.0, 0.35),
			opacity_range: (0.2, 0.7),
			opacity_mode: OpacityMode::Steady,
			phase_speed_range: (0.02, 0.03),
			fade_rate: 0.25,
			drift: Drift::Scatter,
			glow: Glow::None,
			backdrop: None,
			parallax: 0.0,
			waves: Vec::new(),
			streak_chance: 0.0,
			wisp_chance: 0.0,
		}
	}
}

fn ordered((a, b): (f64, f64), floor: f64, ceil: f64) -> (f64, f64) {
	let fix = |v: f64| if v.is_finite() { v.clamp(floor, ceil) } else { floor };
	let (a, b) = (fix(a), fix(b));
	if a <= b { (a, b) } else { (b, a) }
}

impl BackgroundConfig {
	/// Parses a JSON config. Values are not sanitized yet.
	pub fn from_json(json: &str) -> Result<Self, AmbientError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Copy with every option forced into a drawable range.
	///
	/// Decorative layers must never take the page down, so out-of-range values
	/// are clamped instead of rejected.
	pub fn sanitized(&self) -> Self {
		let color_palette = if self.color_palette.is_empty() {
			vec![Color::WHITE]
		} else {
			self.color_palette.clone()
		};
		let glow = match self.glow {
			Glow::Shadow { blur } if !blur.is_finite() || blur < 0.0 => Glow::Shadow { blur: 0.0 },
			glow => glow,
		};
		let finite_or_zero = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
		let probability = |v: f64| finite_or_zero(v).min(1.0);
		let waves: Vec<WaveSpec> = self
			.waves
			.iter()
			.take(MAX_WAVES)
			.map(WaveSpec::sanitized)
			.collect();
		// A background must draw something: particles may only be dropped
		// entirely when there are waves.
		let min_particles = if waves.is_empty() { 1 } else { 0 };

		Self {
			particle_count: self.particle_count.clamp(min_particles, MAX_PARTICLES),
			color_palette,
			boundary_policy: self.boundary_policy,
			size_range: ordered(self.size_range, 0.1, 1000.0),
			speed_range: ordered(self.speed_range, 0.0, 1000.0),
			opacity_range: ordered(self.opacity_range, 0.0, 1.0),
			opacity_mode: self.opacity_mode,
			phase_speed_range: ordered(self.phase_speed_range, 0.0, 10.0),
			fade_rate: finite_or_zero(self.fade_rate),
			drift: self.drift,
			glow,
			backdrop: self.backdrop,
			parallax: finite_or_zero(self.parallax),
			waves,
			streak_chance: probability(self.streak_chance),
			wisp_chance: probability(self.wisp_chance),
		}
	}

	/// Falling starfield with pulsing, glowing stars, the odd shooting star
	/// and drifting nebula wisps.
	pub fn starfield() -> Self {
		Self {
			particle_count: 300,
			color_palette: Palette::cosmic().colors,
			boundary_policy: BoundaryPolicy::Recycle,
			size_range: (0.5, 4.5),
			speed_range: (0.1, 0.6),
			opacity_range: (0.1, 1.0),
			opacity_mode: OpacityMode::Pulse,
			phase_speed_range: (0.02, 0.02),
			drift: Drift::Fall,
			glow: Glow::Corona,
			backdrop: Some(Backdrop {
				inner: Color::rgba(25, 25, 35, 0.3),
				outer: Color::rgba(5, 5, 15, 0.6),
			}),
			parallax: 12.0,
			streak_chance: 0.0005,
			wisp_chance: 0.01,
			..Self::default()
		}
	}

	/// Slow violet dust that wraps around the edges.
	pub fn dust() -> Self {
		Self {
			particle_count: 50,
			color_palette: Palette::violet().colors,
			boundary_policy: BoundaryPolicy::Wrap,
			size_range: (1.0, 4.0),
			speed_range: (0.0, 0.35),
			opacity_range: (0.2, 0.7),
			glow: Glow::Shadow { blur: 10.0 },
			backdrop: Some(Backdrop {
				inner: Color::rgba(236, 72, 153, 0.05),
				outer: Color::rgba(15, 23, 42, 0.1),
			}),
			..Self::default()
		}
	}

	/// A handful of large soft orbs bouncing off the edges.
	pub fn orbs() -> Self {
		Self {
			particle_count: 8,
			color_palette: Palette::orchid().colors,
			boundary_policy: BoundaryPolicy::Reflect,
			size_range: (50.0, 150.0),
			speed_range: (0.0, 0.35),
			opacity_range: (0.1, 0.4),
			glow: Glow::Halo,
			backdrop: Some(Backdrop {
				inner: Color::rgba(147, 51, 234, 0.05),
				outer: Color::rgba(15, 23, 42, 0.1),
			}),
			parallax: 24.0,
			..Self::default()
		}
	}

	/// Three slow violet sine waves stacked down the surface, no particles.
	pub fn waves() -> Self {
		let waves = (0..3)
			.map(|i| {
				let i = i as f64;
				WaveSpec {
					baseline: 0.3 + i * 0.2,
					amplitude: 50.0 + i * 20.0,
					frequency: 0.02 + i * 0.01,
					speed: 0.01 + i * 0.005,
					opacity: 0.1 - i * 0.02,
					line_width: 2.0,
				}
			})
			.collect();
		Self {
			particle_count: 0,
			color_palette: Palette::violet().colors,
			waves,
			backdrop: Some(Backdrop {
				inner: Color::rgba(147, 51, 234, 0.05),
				outer: Color::rgba(15, 23, 42, 0.1),
			}),
			..Self::default()
		}
	}

	/// Preset by name, as used in page configuration.
	pub fn preset(name: &str) -> Option<Self> {
		match name {
			"starfield" => Some(Self::starfield()),
			"dust" => Some(Self::dust()),
			"orbs" => Some(Self::orbs()),
			"waves" => Some(Self::waves()),
			_ => None,
		}
	}
}

/// One value of the page's section map: a preset name or a full config.
#[derive(Deserialize)]
#[serde(untagged)]
enum SectionEntry {
	Preset(String),
	Custom(BackgroundConfig),
}

/// Parses a section map such as `{ "hero": "starfield", "about": { ... } }`.
/// Entries naming an unknown preset are dropped with a warning.
pub fn parse_section_configs(
	json: &str,
) -> Result<HashMap<String, BackgroundConfig>, AmbientError> {
	let entries: HashMap<String, SectionEntry> = serde_json::from_str(json)?;
	Ok(entries
		.into_iter()
		.filter_map(|(section, entry)| match entry {
			SectionEntry::Custom(config) => Some((section, config)),
			SectionEntry::Preset(name) => match BackgroundConfig::preset(&name) {
				Some(config) => Some((section, config)),
				None => {
					warn!("ambient: unknown preset {name:?} for section {section:?}");
					None
				}
			},
		})
		.collect())
}
