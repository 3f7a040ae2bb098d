//! Page-wide pointer position signal.
//!
//! The page shell owns a single [`PointerSignal`] and installs one
//! `pointermove` listener on the window. Anything that wants parallax
//! subscribes to it instead of registering its own listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{PointerEvent, Window};

use crate::components::ambient::AmbientError;

/// Pointer location in viewport pixels plus the viewport it was measured in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPosition {
	pub x: f64,
	pub y: f64,
	pub viewport_width: f64,
	pub viewport_height: f64,
}

impl PointerPosition {
	/// Offset from the viewport center, each axis in `[-1, 1]`.
	pub fn normalized(&self) -> (f64, f64) {
		let axis = |v: f64, extent: f64| {
			if extent > 0.0 {
				((v / extent) * 2.0 - 1.0).clamp(-1.0, 1.0)
			} else {
				0.0
			}
		};
		(
			axis(self.x, self.viewport_width),
			axis(self.y, self.viewport_height),
		)
	}
}

type Listener = Rc<dyn Fn(PointerPosition)>;

#[derive(Default)]
struct PointerHub {
	next_id: u64,
	listeners: Vec<(u64, Listener)>,
}

type WindowListener = Rc<RefCell<Option<(Window, Closure<dyn FnMut(PointerEvent)>)>>>;

/// Shared pointer position provider. Clones refer to the same signal.
#[derive(Clone, Default)]
pub struct PointerSignal {
	hub: Rc<RefCell<PointerHub>>,
	listener: WindowListener,
}

/// Keeps a pointer callback registered; dropping it unsubscribes.
pub struct PointerSubscription {
	hub: Weak<RefCell<PointerHub>>,
	id: u64,
}

impl Drop for PointerSubscription {
	fn drop(&mut self) {
		if let Some(hub) = self.hub.upgrade() {
			hub.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
		}
	}
}

impl PointerSignal {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts listening to `pointermove` on the window. Calling it again is a
	/// no-op, so there is never more than one window listener per signal.
	pub fn install(&self) -> Result<(), AmbientError> {
		if self.listener.borrow().is_some() {
			return Ok(());
		}
		let window = web_sys::window().ok_or(AmbientError::NoWindow)?;

		let (signal, win) = (self.clone_weak(), window.clone());
		let callback: Closure<dyn FnMut(PointerEvent)> = Closure::new(move |ev: PointerEvent| {
			let Some(signal) = signal.upgrade() else {
				return;
			};
			let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
			signal.publish(PointerPosition {
				x: ev.client_x() as f64,
				y: ev.client_y() as f64,
				viewport_width: extent(win.inner_width()),
				viewport_height: extent(win.inner_height()),
			});
		});
		window.add_event_listener_with_callback("pointermove", callback.as_ref().unchecked_ref())?;
		*self.listener.borrow_mut() = Some((window, callback));
		debug!("ambient: pointer signal installed");
		Ok(())
	}

	/// Removes the window listener. Subscriptions stay registered.
	pub fn uninstall(&self) {
		if let Some((window, callback)) = self.listener.borrow_mut().take() {
			if let Err(e) = window
				.remove_event_listener_with_callback("pointermove", callback.as_ref().unchecked_ref())
			{
				warn!("ambient: removing pointermove listener failed: {e:?}");
			}
		}
	}

	/// Registers `listener` for every future pointer position.
	pub fn subscribe(&self, listener: impl Fn(PointerPosition) + 'static) -> PointerSubscription {
		let mut hub = self.hub.borrow_mut();
		hub.next_id += 1;
		let id = hub.next_id;
		hub.listeners.push((id, Rc::new(listener)));
		PointerSubscription {
			hub: Rc::downgrade(&self.hub),
			id,
		}
	}

	/// Delivers `position` to every subscriber.
	pub fn publish(&self, position: PointerPosition) {
		// Snapshot so listeners may (un)subscribe while being notified
		let listeners: Vec<Listener> = {
			let hub = self.hub.borrow();
			hub.listeners.iter().map(|(_, l)| l.clone()).collect()
		};
		for listener in listeners {
			listener(position);
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.hub.borrow().listeners.len()
	}

	fn clone_weak(&self) -> WeakPointerSignal {
		WeakPointerSignal {
			hub: Rc::downgrade(&self.hub),
			listener: Rc::downgrade(&self.listener),
		}
	}
}

/// Non-owning reference held by the window listener.
struct WeakPointerSignal {
	hub: Weak<RefCell<PointerHub>>,
	listener: Weak<RefCell<Option<(Window, Closure<dyn FnMut(PointerEvent)>)>>>,
}

impl WeakPointerSignal {
	fn upgrade(&self) -> Option<PointerSignal> {
		Some(PointerSignal {
			hub: self.hub.upgrade()?,
			listener: self.listener.upgrade()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	fn at(x: f64, y: f64) -> PointerPosition {
		PointerPosition {
			x,
			y,
			viewport_width: 1000.0,
			viewport_height: 500.0,
		}
	}

	#[test]
	fn normalizes_around_the_viewport_center() {
		assert_eq!(at(500.0, 250.0).normalized(), (0.0, 0.0));
		assert_eq!(at(0.0, 500.0).normalized(), (-1.0, 1.0));
		assert_eq!(at(5000.0, -10.0).normalized(), (1.0, -1.0));
		let degenerate = PointerPosition {
			viewport_width: 0.0,
			..at(10.0, 10.0)
		};
		assert_eq!(degenerate.normalized().0, 0.0);
	}

	#[test]
	fn subscribers_receive_positions_until_dropped() {
		let signal = PointerSignal::new();
		let seen = Rc::new(Cell::new(0));
		let latest = Rc::new(Cell::new(None));
		let (counter, slot) = (seen.clone(), latest.clone());
		let subscription = signal.subscribe(move |position| {
			counter.set(counter.get() + 1);
			slot.set(Some(position));
		});
		assert_eq!(signal.subscriber_count(), 1);

		signal.publish(at(1.0, 2.0));
		signal.publish(at(3.0, 4.0));
		assert_eq!(seen.get(), 2);
		assert_eq!(latest.get(), Some(at(3.0, 4.0)));

		drop(subscription);
		assert_eq!(signal.subscriber_count(), 0);
		signal.publish(at(5.0, 6.0));
		assert_eq!(seen.get(), 2);
	}

	#[test]
	fn clones_share_one_hub() {
		let signal = PointerSignal::new();
		let other = signal.clone();
		let _a = signal.subscribe(|_| {});
		let _b = other.subscribe(|_| {});
		assert_eq!(signal.subscriber_count(), 2);
	}

	#[test]
	fn listeners_may_unsubscribe_while_notified() {
		let signal = PointerSignal::new();
		let slot: Rc<RefCell<Option<PointerSubscription>>> = Rc::new(RefCell::new(None));
		let inner = slot.clone();
		*slot.borrow_mut() = Some(signal.subscribe(move |_| {
			inner.borrow_mut().take();
		}));
		signal.publish(at(0.0, 0.0));
		assert_eq!(signal.subscriber_count(), 0);
	}
}
