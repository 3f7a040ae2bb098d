//! Page-level helpers shared by every section: the pointer signal and
//! reveal-on-scroll.

mod pointer;
mod reveal;
mod visibility;

pub use pointer::{PointerPosition, PointerSignal, PointerSubscription};
pub use reveal::Reveal;
pub use visibility::{VisibilityGuard, VisibilityLatch, observe_visibility};
