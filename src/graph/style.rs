//! Icon style resolution.
//!
//! Every attribute is looked up through three layers in order: the vertex's
//! own canvas block, the graph's per-type default, and the built-in
//! fallback. The first layer that sets a value wins.

use serde::{Deserialize, Serialize};

/// A partial style. Used for per-vertex overrides and per-type defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexStyle {
	#[serde(default)]
	pub library: Option<String>,
	#[serde(default)]
	pub icon: Option<String>,
	#[serde(default)]
	pub size: Option<f64>,
	#[serde(default)]
	pub fill: Option<String>,
	#[serde(default)]
	pub stroke: Option<String>,
}

pub const FALLBACK_LIBRARY: &str = "material-symbols-rounded";
pub const FALLBACK_ICON: &str = "error";
pub const FALLBACK_SIZE: f64 = 16.0;
pub const FALLBACK_FILL: &str = "--warning";

/// Glyph font families an icon may come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconLibrary {
	Outlined,
	Rounded,
	Sharp,
}

impl IconLibrary {
	/// Unknown library names render with the rounded set.
	pub fn from_name(name: &str) -> Self {
		match name {
			"material-symbols-outlined" => IconLibrary::Outlined,
			"material-symbols-sharp" => IconLibrary::Sharp,
			_ => IconLibrary::Rounded,
		}
	}

	pub fn font_family(self) -> &'static str {
		match self {
			IconLibrary::Outlined => "Material Symbols Outlined",
			IconLibrary::Rounded => "Material Symbols Rounded",
			IconLibrary::Sharp => "Material Symbols Sharp",
		}
	}
}

/// A style with every attribute decided.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
	pub library: IconLibrary,
	pub icon: String,
	pub size: f64,
	pub fill: String,
	pub stroke: Option<String>,
}

/// Resolves `overrides` over `type_default` over the built-in fallback.
pub fn resolve(overrides: &VertexStyle, type_default: Option<&VertexStyle>) -> ResolvedStyle {
	let layers = [Some(overrides), type_default];

	let library = first(&layers, |s| s.library.as_deref()).unwrap_or(FALLBACK_LIBRARY);
	let icon = first(&layers, |s| s.icon.as_deref()).unwrap_or(FALLBACK_ICON);
	let size = first(&layers, |s| s.size.filter(|v| *v > 0.0)).unwrap_or(FALLBACK_SIZE);
	let fill = first(&layers, |s| s.fill.as_deref()).unwrap_or(FALLBACK_FILL);
	let stroke = first(&layers, |s| s.stroke.as_deref());

	ResolvedStyle {
		library: IconLibrary::from_name(library),
		icon: icon.to_string(),
		size,
		fill: fill.to_string(),
		stroke: stroke.map(str::to_string),
	}
}

fn first<'a, T>(
	layers: &[Option<&'a VertexStyle>],
	pick: impl Fn(&'a VertexStyle) -> Option<T>,
) -> Option<T> {
	layers.iter().copied().flatten().find_map(pick)
}
