//! Ambient particle backgrounds.
//!
//! Each background is a self-contained [`AmbientBackground`]: a [`Scene`]
//! (a [`ParticleField`], optional wave lines and rare flourishes) stepped and
//! drawn onto a [`Surface`] by an [`AnimationDriver`] once per display frame. The engine is generic over the
//! surface and the frame scheduler so it runs on the host in tests; in the
//! browser [`mount`] wires it to a canvas and `requestAnimationFrame`.
//!
//! What a background looks like is entirely data, see [`BackgroundConfig`]
//! and its presets.

mod component;
mod composite;
pub mod config;
mod driver;
mod error;
mod field;
mod flourish;
mod mount;
pub mod particles;
mod scene;
mod surface;
#[cfg(test)]
mod testing;
pub mod theme;
pub mod waves;

pub use component::AmbientCanvas;
pub use composite::AmbientBackground;
pub use config::{BackgroundConfig, parse_section_configs};
pub use driver::{AnimationDriver, DriverState, FrameScheduler, TickOutcome, frame_delta};
pub use error::AmbientError;
pub use field::{ConfigSampler, ParticleField, Sampler};
pub use flourish::{Streak, Wisp};
pub use mount::{BackgroundHandle, mount};
pub use scene::Scene;
pub use surface::{CanvasSurface, Surface};
