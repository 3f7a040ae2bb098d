//! Browser glue: puts an [`AmbientBackground`] on a real canvas inside a
//! container element and keeps it alive until the handle is unmounted.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

use super::composite::AmbientBackground;
use super::config::BackgroundConfig;
use super::driver::{FrameCallback, RafScheduler, frame_delta};
use super::error::AmbientError;
use super::surface::CanvasSurface;
use crate::components::shell::{PointerSignal, PointerSubscription};

type CanvasBackground = AmbientBackground<CanvasSurface, RafScheduler>;

/// Fallback size when neither the container nor the window report one.
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Owns a mounted background. Dropping the handle unmounts it.
///
/// A handle whose mount failed is inert: it animates nothing and unmounting
/// it does nothing.
pub struct BackgroundHandle {
	mounted: Option<Mounted>,
}

struct Mounted {
	background: Rc<RefCell<CanvasBackground>>,
	canvas: HtmlCanvasElement,
	window: Window,
	frame_cb: FrameCallback,
	resize_cb: Closure<dyn FnMut()>,
	_pointer: Option<PointerSubscription>,
}

impl BackgroundHandle {
	/// A handle with nothing behind it.
	pub fn inert() -> Self {
		Self { mounted: None }
	}

	pub fn is_inert(&self) -> bool {
		self.mounted.is_none()
	}

	pub fn is_animating(&self) -> bool {
		self.mounted
			.as_ref()
			.is_some_and(|m| m.background.borrow().is_running())
	}

	pub fn particle_count(&self) -> usize {
		self.mounted
			.as_ref()
			.map_or(0, |m| m.background.borrow().particle_count())
	}

	/// Stops the animation, removes the listeners and the canvas. Calling it
	/// again is a no-op.
	pub fn unmount(&mut self) {
		let Some(mounted) = self.mounted.take() else {
			return;
		};
		mounted.background.borrow_mut().unmount();
		if let Err(e) = mounted
			.window
			.remove_event_listener_with_callback("resize", mounted.resize_cb.as_ref().unchecked_ref())
		{
			warn!("ambient: removing resize listener failed: {e:?}");
		}
		mounted.frame_cb.borrow_mut().take();
		mounted.canvas.remove();
		info!("ambient: background unmounted");
	}
}

impl Drop for BackgroundHandle {
	fn drop(&mut self) {
		self.unmount();
	}
}

/// Mounts a background filling `container` and starts it.
///
/// Never fails: if the canvas cannot be set up the error is logged and an
/// inert handle is returned so the rest of the page keeps working.
pub fn mount(
	container: &HtmlElement,
	config: &BackgroundConfig,
	pointer: Option<&PointerSignal>,
) -> BackgroundHandle {
	match try_mount(container, config, pointer) {
		Ok(handle) => handle,
		Err(e) => {
			warn!("ambient: background disabled: {e}");
			BackgroundHandle::inert()
		}
	}
}

fn try_mount(
	container: &HtmlElement,
	config: &BackgroundConfig,
	pointer: Option<&PointerSignal>,
) -> Result<BackgroundHandle, AmbientError> {
	let config = config.sanitized();
	let window = web_sys::window().ok_or(AmbientError::NoWindow)?;
	let document = window.document().ok_or(AmbientError::NoDocument)?;

	let canvas: HtmlCanvasElement = document
		.create_element("canvas")?
		.dyn_into()
		.map_err(|_| AmbientError::Dom("created element is not a canvas".into()))?;
	canvas.set_class_name("ambient-canvas");
	canvas.set_attribute("aria-hidden", "true")?;
	let style = canvas.style();
	for (name, value) in [
		("position", "absolute"),
		("inset", "0"),
		("display", "block"),
		("pointer-events", "none"),
	] {
		style.set_property(name, value)?;
	}
	container.append_child(&canvas)?;

	let wired = wire(container, &canvas, &window, &config, pointer);
	if wired.is_err() {
		canvas.remove();
	}
	wired
}

/// Everything after the canvas is in the document. The caller removes the
/// canvas again if this fails.
fn wire(
	container: &HtmlElement,
	canvas: &HtmlCanvasElement,
	window: &Window,
	config: &BackgroundConfig,
	pointer: Option<&PointerSignal>,
) -> Result<BackgroundHandle, AmbientError> {
	let (w, h) = container_size(container, window);
	let surface = CanvasSurface::new(canvas.clone(), w, h, config.glow, config.backdrop)?;

	let frame_cb: FrameCallback = Rc::new(RefCell::new(None));
	let scheduler = RafScheduler::new(window.clone(), frame_cb.clone());
	let background = Rc::new(RefCell::new(AmbientBackground::new(
		surface,
		scheduler,
		config,
		random_seed(),
	)));

	// Weak so the closure stored in the scheduler does not keep its own
	// background alive.
	let weak = Rc::downgrade(&background);
	let mut last_frame: Option<f64> = None;
	*frame_cb.borrow_mut() = Some(Closure::new(move |now: f64| {
		let Some(background) = weak.upgrade() else {
			return;
		};
		let dt = frame_delta(last_frame.replace(now), now);
		background.borrow_mut().tick(dt);
	}));

	let (weak, container_el, win) = (Rc::downgrade(&background), container.clone(), window.clone());
	let resize_cb: Closure<dyn FnMut()> = Closure::new(move || {
		let Some(background) = weak.upgrade() else {
			return;
		};
		let (w, h) = container_size(&container_el, &win);
		background.borrow_mut().resize(w, h);
	});
	window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())?;

	let pointer = pointer
		.filter(|_| config.parallax > 0.0)
		.map(|signal| {
			let weak = Rc::downgrade(&background);
			let depth = config.parallax;
			signal.subscribe(move |position| {
				let Some(background) = weak.upgrade() else {
					return;
				};
				// Skip the event rather than panic if a frame is mid-draw
				let Ok(mut background) = background.try_borrow_mut() else {
					return;
				};
				let (nx, ny) = position.normalized();
				background.surface_mut().set_offset(-nx * depth, -ny * depth);
			})
		});

	background.borrow_mut().start();
	info!(
		"ambient: mounted {} particles on {}x{}",
		background.borrow().particle_count(),
		w,
		h
	);

	Ok(BackgroundHandle {
		mounted: Some(Mounted {
			background,
			canvas: canvas.clone(),
			window: window.clone(),
			frame_cb,
			resize_cb,
			_pointer: pointer,
		}),
	})
}

/// Client size of `container`, falling back to the viewport for containers
/// that have not been laid out yet.
fn container_size(container: &HtmlElement, window: &Window) -> (f64, f64) {
	let (w, h) = (container.client_width() as f64, container.client_height() as f64);
	if w > 0.0 && h > 0.0 {
		return (w, h);
	}
	let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).filter(|v| *v > 0.0);
	(
		extent(window.inner_width()).unwrap_or(FALLBACK_SIZE.0),
		extent(window.inner_height()).unwrap_or(FALLBACK_SIZE.1),
	)
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}
