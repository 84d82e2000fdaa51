//! Color tokens for the canvas.
//!
//! Vertex and edge styles name colors by CSS custom property (`--layer`,
//! `--tertiary`, ...). A [`Theme`] maps those tokens to concrete colors.
//! Anything that is not a `--token` is treated as a literal CSS color.

use std::collections::BTreeMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Parses `#rgb`, `#rrggbb` and `rgb()`/`rgba()` notation.
pub fn parse_color(value: &str) -> Option<Color> {
	let value = value.trim();
	if let Some(hex) = value.strip_prefix('#') {
		if !hex.is_ascii() {
			return None;
		}
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		return match hex.len() {
			6 => Some(Color::rgb(
				channel(&hex[0..2])?,
				channel(&hex[2..4])?,
				channel(&hex[4..6])?,
			)),
			3 => {
				let short = |i: usize| channel(&hex[i..=i]).map(|c| c * 17);
				Some(Color::rgb(short(0)?, short(1)?, short(2)?))
			}
			_ => None,
		};
	}
	let inner = value
		.strip_prefix("rgba(")
		.or_else(|| value.strip_prefix("rgb("))?
		.strip_suffix(')')?;
	let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
	let (r, g, b) = match parts.as_slice() {
		[r, g, b] | [r, g, b, _] => (r.parse().ok()?, g.parse().ok()?, b.parse().ok()?),
		_ => return None,
	};
	let a = parts.get(3).map_or(Some(1.0), |a| a.parse().ok())?;
	Some(Color::rgba(r, g, b, a))
}

/// Tokens the renderer reads.
pub const TOKENS: &[&str] = &[
	"--background",
	"--border",
	"--container",
	"--font",
	"--layer",
	"--muted",
	"--tertiary",
	"--warning",
];

/// Token table for one color scheme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	tokens: BTreeMap<&'static str, String>,
	/// Used for tokens the table does not know.
	fallback: String,
}

impl Theme {
	fn from_table(name: &'static str, table: [(&'static str, Color); 8]) -> Self {
		Self {
			name,
			tokens: table.into_iter().map(|(k, c)| (k, c.to_css())).collect(),
			fallback: Color::rgb(128, 128, 128).to_css(),
		}
	}

	/// Default scheme, also used for unknown theme names.
	pub fn dark() -> Self {
		Self::from_table(
			"dark",
			[
				("--background", Color::rgb(22, 27, 34)),
				("--border", Color::rgb(48, 54, 61)),
				("--container", Color::rgb(45, 51, 59)),
				("--font", Color::rgb(230, 237, 243)),
				("--layer", Color::rgba(140, 160, 180, 0.6)),
				("--muted", Color::rgb(125, 133, 144)),
				("--tertiary", Color::rgb(121, 192, 255)),
				("--warning", Color::rgb(210, 153, 34)),
			],
		)
	}

	pub fn light() -> Self {
		Self::from_table(
			"light",
			[
				("--background", Color::rgb(255, 255, 255)),
				("--border", Color::rgb(208, 215, 222)),
				("--container", Color::rgb(234, 238, 242)),
				("--font", Color::rgb(31, 35, 40)),
				("--layer", Color::rgba(87, 96, 106, 0.6)),
				("--muted", Color::rgb(101, 109, 118)),
				("--tertiary", Color::rgb(9, 105, 218)),
				("--warning", Color::rgb(154, 103, 0)),
			],
		)
	}

	/// Preset for a page `data-theme` value.
	pub fn named(name: Option<&str>) -> Self {
		match name.map(str::trim) {
			Some(n) if n.eq_ignore_ascii_case("light") => Self::light(),
			_ => Self::dark(),
		}
	}

	/// Replaces a token's value, typically with a computed CSS property.
	/// Blank values are ignored.
	pub fn set(&mut self, token: &'static str, value: &str) {
		let value = value.trim();
		if !value.is_empty() {
			self.tokens.insert(token, value.to_string());
		}
	}

	/// The CSS color for a token or literal.
	pub fn resolve(&self, value: &str) -> String {
		if !value.starts_with("--") {
			return match parse_color(value) {
				Some(color) => color.to_css(),
				None => value.to_string(),
			};
		}
		self.tokens
			.get(value)
			.cloned()
			.unwrap_or_else(|| self.fallback.clone())
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}
