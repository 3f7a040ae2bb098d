//! Error type for mounting ambient backgrounds.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Reasons an ambient background could not be set up.
///
/// None of these escape to the page: mounting logs them and degrades to an
/// inert handle.
#[derive(Debug, Error)]
pub enum AmbientError {
	#[error("no global window")]
	NoWindow,
	#[error("window has no document")]
	NoDocument,
	#[error("canvas has no 2d drawing context")]
	NoContext,
	#[error("DOM call failed: {0}")]
	Dom(String),
	#[error("invalid background config: {0}")]
	Config(#[from] serde_json::Error),
}

impl From<JsValue> for AmbientError {
	fn from(value: JsValue) -> Self {
		AmbientError::Dom(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}
}
