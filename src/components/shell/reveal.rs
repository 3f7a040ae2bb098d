use leptos::html::Div;
use leptos::prelude::*;
use log::warn;
use web_sys::Element;

use super::visibility::{VisibilityGuard, observe_visibility};

/// Wraps its children and adds `reveal-visible` once they scroll into view.
///
/// If the observer cannot be created the content is shown immediately.
#[component]
pub fn Reveal(
	children: Children,
	/// Keep the content visible after it was first revealed.
	#[prop(default = true)]
	once: bool,
) -> impl IntoView {
	let node_ref = NodeRef::<Div>::new();
	let (visible, set_visible) = signal(false);
	let guard = StoredValue::new_local(None::<VisibilityGuard>);

	Effect::new(move |_| {
		let Some(div) = node_ref.get() else {
			return;
		};
		if guard.with_value(Option::is_some) {
			return;
		}
		let element: Element = div.into();
		match observe_visibility(&element, once, move |v| set_visible.set(v)) {
			Ok(observer) => guard.set_value(Some(observer)),
			Err(e) => {
				warn!("ambient: reveal disabled: {e}");
				set_visible.set(true);
			}
		}
	});

	on_cleanup(move || {
		let _ = guard.try_update_value(|g| g.take());
	});

	view! {
		<div
			node_ref=node_ref
			class=move || if visible.get() { "reveal reveal-visible" } else { "reveal" }
		>
			{children()}
		</div>
	}
}
