#![cfg(target_arch = "wasm32")]

use ambient_canvas::components::shell::observe_visibility;
use ambient_canvas::{BackgroundConfig, BackgroundHandle, PointerSignal, mount};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn container(width: u32, height: u32) -> HtmlElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let div: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	let style = div.style();
	style.set_property("position", "relative").unwrap();
	style.set_property("width", &format!("{width}px")).unwrap();
	style.set_property("height", &format!("{height}px")).unwrap();
	document.body().unwrap().append_child(&div).unwrap();
	div
}

/// Resolves on the next animation frame.
async fn next_frame() {
	let promise = js_sys::Promise::new(&mut |resolve, _| {
		web_sys::window()
			.unwrap()
			.request_animation_frame(&resolve)
			.unwrap();
	});
	JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn mount_adds_a_sized_canvas_and_unmount_removes_it() {
	let div = container(320, 200);
	let mut handle = mount(&div, &BackgroundConfig::dust(), None);

	assert!(handle.is_animating());
	assert_eq!(handle.particle_count(), 50);
	assert_eq!(div.child_element_count(), 1);
	let canvas: web_sys::HtmlCanvasElement = div.first_element_child().unwrap().dyn_into().unwrap();
	assert_eq!((canvas.width(), canvas.height()), (320, 200));

	handle.unmount();
	assert!(!handle.is_animating());
	assert_eq!(div.child_element_count(), 0);

	handle.unmount();
	div.remove();
}

#[wasm_bindgen_test]
async fn removing_the_container_stops_the_loop() {
	let div = container(160, 120);
	let handle = mount(&div, &BackgroundConfig::starfield(), None);
	assert!(handle.is_animating());

	div.remove();
	next_frame().await;
	next_frame().await;
	assert!(!handle.is_animating());
}

#[wasm_bindgen_test]
fn wave_background_mounts_without_particles() {
	let div = container(300, 150);
	let handle = mount(&div, &BackgroundConfig::waves(), None);
	assert!(handle.is_animating());
	assert_eq!(handle.particle_count(), 0);
	drop(handle);
	div.remove();
}

#[wasm_bindgen_test]
fn dropping_the_handle_unmounts() {
	let div = container(100, 100);
	{
		let _handle = mount(&div, &BackgroundConfig::orbs(), None);
		assert_eq!(div.child_element_count(), 1);
	}
	assert_eq!(div.child_element_count(), 0);
	div.remove();
}

#[wasm_bindgen_test]
fn sections_get_independent_canvases() {
	let (a, b) = (container(200, 100), container(200, 100));
	let mut first = mount(&a, &BackgroundConfig::starfield(), None);
	let second = mount(&b, &BackgroundConfig::waves(), None);

	first.unmount();
	assert!(second.is_animating());
	assert_eq!(b.child_element_count(), 1);

	drop(second);
	a.remove();
	b.remove();
}

#[wasm_bindgen_test]
fn parallax_subscribes_to_the_shared_pointer() {
	let div = container(200, 100);
	let pointer = PointerSignal::new();

	let mut with_parallax = mount(&div, &BackgroundConfig::starfield(), Some(&pointer));
	let without = mount(&div, &BackgroundConfig::dust(), Some(&pointer));
	assert_eq!(pointer.subscriber_count(), 1);

	with_parallax.unmount();
	assert_eq!(pointer.subscriber_count(), 0);
	drop(without);
	div.remove();
}

#[wasm_bindgen_test]
fn inert_handle_does_nothing() {
	let mut handle = BackgroundHandle::inert();
	assert!(handle.is_inert());
	assert!(!handle.is_animating());
	assert_eq!(handle.particle_count(), 0);
	handle.unmount();
}

#[wasm_bindgen_test]
fn pointer_signal_installs_once() {
	let pointer = PointerSignal::new();
	pointer.install().unwrap();
	pointer.install().unwrap();
	pointer.uninstall();
}

#[wasm_bindgen_test]
fn visibility_observer_can_be_created_and_dropped() {
	let div = container(10, 10);
	let guard = observe_visibility(&div, true, |_| {}).unwrap();
	drop(guard);
	div.remove();
}
