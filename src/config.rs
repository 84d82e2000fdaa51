//! Canvas and authoring configuration.
//!
//! Every field has a default, so a partial JSON object is enough to override
//! a single setting.

use serde::Deserialize;

use crate::error::SchemaError;
use crate::graph::schema;

/// Modifier key the wheel must be combined with to zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelModifier {
	#[default]
	None,
	Ctrl,
}

/// Tunables for the canvas and for vertices created on it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
	/// Multiplicative step per wheel notch.
	pub zoom_factor: f64,
	/// Zoom bounds. `min_scale` must be positive and below `max_scale`.
	pub min_scale: f64,
	pub max_scale: f64,
	/// Key that must be held for the wheel to zoom.
	pub wheel_zoom_modifier: WheelModifier,
	/// Quiet period before a burst of resize events is applied.
	pub resize_debounce_ms: u64,
	/// Grid dots are hidden below this scale.
	pub grid_min_scale: f64,
	/// Type tag written for vertices created on the canvas.
	pub new_vertex_type: String,
	/// Title and slug stem of a new vertex in every language.
	pub new_vertex_title: String,
	/// Extension of the content files written for new vertices.
	pub content_extension: String,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			zoom_factor: 1.1,
			min_scale: 0.1,
			max_scale: 10.0,
			wheel_zoom_modifier: WheelModifier::None,
			resize_debounce_ms: 100,
			grid_min_scale: 0.5,
			new_vertex_type: "fleeting".into(),
			new_vertex_title: "Untitled".into(),
			content_extension: "md".into(),
		}
	}
}

impl CanvasConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let config: Self = serde_json::from_str(text)?;
		Ok(config.sanitized())
	}

	/// Checks that new vertices would load back: the type must be a tag and
	/// the extension a single alphanumeric segment.
	pub fn check_vertex_template(&self) -> Result<(), SchemaError> {
		if !schema::is_type_tag(&self.new_vertex_type) {
			return Err(SchemaError::field(
				"new_vertex_type",
				format!("`{}` is not a lowercase type tag", self.new_vertex_type),
			));
		}
		let ext = &self.content_extension;
		if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
			return Err(SchemaError::field(
				"content_extension",
				format!("`{ext}` is not a plain file extension"),
			));
		}
		Ok(())
	}

	/// Replaces values that would break the viewport or produce unloadable
	/// vertices with defaults.
	pub fn sanitized(mut self) -> Self {
		let defaults = Self::default();
		if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
			self.zoom_factor = defaults.zoom_factor;
		}
		if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
			self.min_scale = defaults.min_scale;
		}
		if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
			self.max_scale = defaults.max_scale.max(self.min_scale);
		}
		if !schema::is_type_tag(&self.new_vertex_type) {
			self.new_vertex_type = defaults.new_vertex_type;
		}
		if let Err(SchemaError::Field { field: "content_extension", .. }) =
			self.check_vertex_template()
		{
			self.content_extension = defaults.content_extension;
		}
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config = CanvasConfig::from_json(r#"{ "wheel_zoom_modifier": "ctrl" }"#).unwrap();
		assert_eq!(config.wheel_zoom_modifier, WheelModifier::Ctrl);
		assert_eq!(config.zoom_factor, 1.1);
		assert_eq!(config.resize_debounce_ms, 100);
	}

	#[test]
	fn rejects_degenerate_scales() {
		let config =
			CanvasConfig::from_json(r#"{ "zoom_factor": 0.5, "min_scale": 0, "max_scale": -1 }"#)
				.unwrap();
		assert_eq!(config.zoom_factor, 1.1);
		assert_eq!(config.min_scale, 0.1);
		assert_eq!(config.max_scale, 10.0);
	}

	#[test]
	fn inverted_scale_bounds_are_ordered() {
		let config = CanvasConfig {
			min_scale: 20.0,
			..Default::default()
		}
		.sanitized();
		assert!(config.min_scale <= config.max_scale);
		assert_eq!(config.max_scale, 20.0);
	}

	#[test]
	fn unloadable_vertex_template_falls_back() {
		let config = CanvasConfig::from_json(
			r#"{ "new_vertex_type": "Idea", "content_extension": "tar.gz", "new_vertex_title": "Note" }"#,
		)
		.unwrap();
		assert_eq!(config.new_vertex_type, "fleeting");
		assert_eq!(config.content_extension, "md");
		assert_eq!(config.new_vertex_title, "Note");
		assert!(config.check_vertex_template().is_ok());
	}

	#[test]
	fn vertex_template_check_names_the_field() {
		let mut config = CanvasConfig {
			new_vertex_type: "Idea".into(),
			..Default::default()
		};
		assert!(matches!(
			config.check_vertex_template(),
			Err(SchemaError::Field { field: "new_vertex_type", .. })
		));

		config.new_vertex_type = "literature-note".into();
		for ext in ["", "a/b", ".md", "tar.gz"] {
			config.content_extension = ext.into();
			assert!(
				matches!(
					config.check_vertex_template(),
					Err(SchemaError::Field { field: "content_extension", .. })
				),
				"{ext:?}"
			);
		}
		config.content_extension = "txt".into();
		assert!(config.check_vertex_template().is_ok());
	}
}
