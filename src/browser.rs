//! Browser glue: DOM-embedded data and the [`Host`] implementation.
//!
//! The page embeds two JSON blocks:
//! `<script id="vault-data" type="application/json">` holds a
//! [`VaultSnapshot`] of the research directory, and the optional
//! `<script id="canvas-config">` holds a partial [`CanvasConfig`].

use std::path::PathBuf;

use async_trait::async_trait;
use log::{error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::config::CanvasConfig;
use crate::error::Severity;
use crate::graph::{Host, VaultSnapshot};

pub const VAULT_DATA_ID: &str = "vault-data";
pub const CANVAS_CONFIG_ID: &str = "canvas-config";

/// Text of the script element with `id`, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

pub fn parse_snapshot(json: &str) -> Result<VaultSnapshot, serde_json::Error> {
	serde_json::from_str(json)
}

/// Loads the embedded vault snapshot.
pub fn load_vault_snapshot() -> Option<VaultSnapshot> {
	let Some(text) = script_text(VAULT_DATA_ID) else {
		warn!("research-canvas: no #{VAULT_DATA_ID} element");
		return None;
	};
	match parse_snapshot(&text) {
		Ok(snapshot) => {
			info!(
				"research-canvas: snapshot of {} with {} files",
				snapshot.root.display(),
				snapshot.files.len()
			);
			Some(snapshot)
		}
		Err(e) => {
			warn!("research-canvas: failed to parse vault snapshot: {}", e);
			None
		}
	}
}

/// Loads the embedded canvas configuration, or the defaults.
pub fn load_config() -> CanvasConfig {
	let Some(text) = script_text(CANVAS_CONFIG_ID) else {
		return CanvasConfig::default();
	};
	CanvasConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("research-canvas: invalid canvas config, using defaults: {}", e);
		CanvasConfig::default()
	})
}

/// Host backed by the page. The only selectable directory is the
/// snapshot root; messages go to the console and an alert.
pub struct BrowserHost {
	root: Option<PathBuf>,
}

impl BrowserHost {
	pub fn new(root: Option<PathBuf>) -> Self {
		Self { root }
	}
}

#[async_trait(?Send)]
impl Host for BrowserHost {
	async fn select_directory(&self) -> Option<PathBuf> {
		self.root.clone()
	}

	fn notify(&self, severity: Severity, message: &str) {
		match severity {
			Severity::Warning => warn!("research-canvas: {message}"),
			Severity::Error => error!("research-canvas: {message}"),
		}
		if let Some(window) = web_sys::window() {
			let _ = window.alert_with_message(message);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_lists_files_relative_to_root() {
		let snapshot = parse_snapshot(
			r#"{
				"root": "/kb",
				"files": { ".research/graph.yaml": "uuid: x", "a/index.en.md": "---\n---\n" },
				"folders": ["empty"]
			}"#,
		)
		.unwrap();
		assert_eq!(snapshot.root, PathBuf::from("/kb"));
		assert_eq!(snapshot.files.len(), 2);
		assert_eq!(snapshot.folders, vec!["empty".to_string()]);

		let bare = parse_snapshot(r#"{ "root": "/kb" }"#).unwrap();
		assert!(bare.files.is_empty());
		assert!(parse_snapshot("[]").is_err());
	}
}
