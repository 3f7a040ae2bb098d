//! Viewport visibility notifications over `IntersectionObserver`.

use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};

use crate::components::ambient::AmbientError;

/// Turns raw intersection reports into visibility changes.
///
/// With `once` set the latch stays visible after the first intersection, which
/// is what reveal-on-scroll animations want.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityLatch {
	once: bool,
	visible: bool,
}

impl VisibilityLatch {
	pub fn new(once: bool) -> Self {
		Self {
			once,
			visible: false,
		}
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Feeds one report. Returns the new visibility if it changed.
	pub fn observe(&mut self, intersecting: bool) -> Option<bool> {
		if self.once && self.visible {
			return None;
		}
		if intersecting == self.visible {
			return None;
		}
		self.visible = intersecting;
		Some(intersecting)
	}
}

/// Keeps an observer alive. Dropping it disconnects the observer.
pub struct VisibilityGuard {
	observer: IntersectionObserver,
	_callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl Drop for VisibilityGuard {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

/// Calls `on_change` whenever `element` enters or leaves the viewport.
pub fn observe_visibility(
	element: &Element,
	once: bool,
	mut on_change: impl FnMut(bool) + 'static,
) -> Result<VisibilityGuard, AmbientError> {
	let mut latch = VisibilityLatch::new(once);
	let callback: Closure<dyn FnMut(js_sys::Array)> = Closure::new(move |entries: js_sys::Array| {
		for entry in entries.iter() {
			let entry: IntersectionObserverEntry = entry.unchecked_into();
			if let Some(visible) = latch.observe(entry.is_intersecting()) {
				on_change(visible);
			}
		}
	});

	let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
	observer.observe(element);
	debug!("ambient: observing visibility of <{}>", element.tag_name().to_lowercase());

	Ok(VisibilityGuard {
		observer,
		_callback: callback,
	})
}
