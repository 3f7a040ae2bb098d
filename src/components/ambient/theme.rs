//! Colors and palettes for ambient backgrounds.
//!
//! Colors can be written in configuration as CSS strings (`#rrggbb`, `#rgb`,
//! `rgb(..)` or `rgba(..)`) and are parsed into [`Color`] on deserialization.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

/// A CSS color string that could not be understood.
#[derive(Debug, Error, PartialEq)]
#[error("unsupported CSS color `{0}`")]
pub struct ColorParseError(pub String);

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// CSS `rgba()` string with the alpha multiplied by `opacity`.
	pub fn to_css_with_opacity(self, opacity: f64) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.r,
			self.g,
			self.b,
			(self.a * opacity).clamp(0.0, 1.0)
		)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl FromStr for Color {
	type Err = ColorParseError;

	/// Supports hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` functional notation,
	/// both comma and space separated (`rgb(217 95 228)`).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let err = || ColorParseError(s.to_string());

		if let Some(hex) = s.strip_prefix('#') {
			if !hex.is_ascii() {
				return Err(err());
			}
			let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| err());
			return match hex.len() {
				6 => Ok(Color::rgb(
					channel(&hex[0..2])?,
					channel(&hex[2..4])?,
					channel(&hex[4..6])?,
				)),
				3 => {
					let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => Err(err()),
			};
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))
			.and_then(|rest| rest.strip_suffix(')'))
			.ok_or_else(err)?;
		let parts: Vec<&str> = body
			.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
			.filter(|p| !p.is_empty())
			.collect();
		if parts.len() != 3 && parts.len() != 4 {
			return Err(err());
		}
		let channel = |p: &str| p.parse::<u8>().map_err(|_| err());
		let a = match parts.get(3) {
			Some(p) => match p.parse::<f64>() {
				Ok(a) if a.is_finite() => a.clamp(0.0, 1.0),
				_ => return Err(err()),
			},
			None => 1.0,
		};
		Ok(Color::rgba(
			channel(parts[0])?,
			channel(parts[1])?,
			channel(parts[2])?,
			a,
		))
	}
}

impl TryFrom<String> for Color {
	type Error = ColorParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

/// A set of colors particles are drawn from.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Star colors: white, blue, yellow, red and orange giants.
	pub fn cosmic() -> Self {
		Self {
			colors: vec![
				Color::rgb(255, 255, 255), // White
				Color::rgb(248, 248, 255), // Ghost white
				Color::rgb(135, 206, 235), // Sky blue
				Color::rgb(30, 144, 255),  // Dodger blue
				Color::rgb(255, 215, 0),   // Gold
				Color::rgb(255, 255, 224), // Light yellow
				Color::rgb(255, 107, 107), // Coral red
				Color::rgb(255, 165, 0),   // Orange
			],
		}
	}

	/// Single violet accent used by the section backdrops.
	pub fn violet() -> Self {
		Self {
			colors: vec![Color::rgb(168, 85, 247)],
		}
	}

	/// Deep purple used by the floating orbs.
	pub fn orchid() -> Self {
		Self {
			colors: vec![Color::rgba(147, 51, 234, 0.3)],
		}
	}

	/// Color at `index`, cycling through the palette.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::WHITE;
		}
		self.colors[index % self.colors.len()]
	}
}

impl From<Vec<Color>> for Palette {
	fn from(colors: Vec<Color>) -> Self {
		Self { colors }
	}
}
