//! Leptos component that places an ambient background behind a section.

use leptos::html::Div;
use leptos::prelude::*;
use web_sys::HtmlElement;

use super::config::BackgroundConfig;
use super::mount::{BackgroundHandle, mount};
use crate::components::shell::PointerSignal;

/// Absolutely positioned layer that fills its (positioned) parent and animates
/// `config` on a canvas inside it.
///
/// The background is mounted once the layer is in the DOM and unmounted when
/// the component is disposed. Pass the page's `pointer` signal to enable
/// parallax for configs with a non-zero `parallax`.
#[component]
pub fn AmbientCanvas(
	config: BackgroundConfig,
	#[prop(optional)] pointer: Option<PointerSignal>,
	#[prop(optional, into)] class: Option<String>,
) -> impl IntoView {
	let container_ref = NodeRef::<Div>::new();
	let handle = StoredValue::new_local(None::<BackgroundHandle>);

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if handle.with_value(Option::is_some) {
			return;
		}
		let container: HtmlElement = container.into();
		handle.set_value(Some(mount(&container, &config, pointer.as_ref())));
	});

	on_cleanup(move || {
		let _ = handle.try_update_value(|h| {
			if let Some(h) = h.as_mut() {
				h.unmount();
			}
		});
	});

	let class = match class {
		Some(extra) => format!("ambient-background {extra}"),
		None => "ambient-background".to_string(),
	};

	view! {
		<div
			node_ref=container_ref
			class=class
			aria-hidden="true"
			style="position: absolute; inset: 0; overflow: hidden; pointer-events: none; z-index: 0;"
		></div>
	}
}
