//! ambient-canvas: decorative particle backgrounds for a portfolio page.
//!
//! Every page section gets its own canvas animation (a starfield, floating
//! dust, slow orbs, sine waves) driven by one configurable engine and rendered
//! from WASM.

use std::collections::HashMap;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::ambient::{
	AmbientBackground, AmbientCanvas, AmbientError, BackgroundConfig, BackgroundHandle, mount,
};
pub use components::shell::{PointerSignal, Reveal};

/// Id of the script element that may override section backgrounds.
pub const CONFIG_ELEMENT_ID: &str = "ambient-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ambient: logging initialized");
}

/// Load per-section background configs from a script element with
/// id="ambient-config".
/// Expected format: JSON object mapping section names to a preset name or a
/// config object, e.g. `{ "hero": "starfield", "about": { "particleCount": 30 } }`.
fn load_section_configs() -> Option<HashMap<String, BackgroundConfig>> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match components::ambient::parse_section_configs(&json_text) {
		Ok(sections) => {
			info!("ambient: loaded configs for {} sections", sections.len());
			Some(sections)
		}
		Err(e) => {
			warn!("ambient: {e}, using preset backgrounds");
			None
		}
	}
}

/// Main application component.
/// Lays out the page sections, each over its own ambient background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let mut sections = load_section_configs().unwrap_or_default();
	let mut background = |section: &str, preset: fn() -> BackgroundConfig| {
		sections.remove(section).unwrap_or_else(preset)
	};
	let hero = background("hero", BackgroundConfig::starfield);
	let about = background("about", BackgroundConfig::dust);
	let projects = background("projects", BackgroundConfig::orbs);
	let contact = background("contact", BackgroundConfig::waves);

	// One window listener for the whole page; backgrounds subscribe to it.
	let pointer = PointerSignal::new();
	if let Err(e) = pointer.install() {
		warn!("ambient: pointer tracking unavailable: {e}");
	}

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="portfolio">
			<section id="home" class="section hero" style="position: relative;">
				<AmbientCanvas config=hero pointer={pointer.clone()} />
				<Reveal>
					<h1>"Hi, I build things for the web."</h1>
				</Reveal>
			</section>
			<section id="about" class="section about" style="position: relative;">
				<AmbientCanvas config=about pointer={pointer.clone()} />
				<Reveal>
					<h2>"About"</h2>
				</Reveal>
			</section>
			<section id="projects" class="section projects" style="position: relative;">
				<AmbientCanvas config=projects pointer={pointer.clone()} />
				<Reveal>
					<h2>"Projects"</h2>
				</Reveal>
			</section>
			<section id="contact" class="section contact" style="position: relative;">
				<AmbientCanvas config=contact pointer=pointer />
				<Reveal>
					<h2>"Contact"</h2>
				</Reveal>
			</section>
		</main>
	}
}
