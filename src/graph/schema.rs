//! Descriptor schemas for `.research/graph.yaml`, vertex `graph.yaml`, and
//! content file headers.
//!
//! Parsing happens in two steps. The text must first be a YAML mapping;
//! anything else is "unparsable". The mapping is then deserialized into the
//! typed descriptor and checked with `validate`; failures at either point
//! are schema violations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{CanvasStyle, Languages, Visibility};
use super::style::VertexStyle;
use crate::error::SchemaError;

/// ISO 639-1 two-letter codes, sorted for binary search.
const ISO_639_1: &[&str] = &[
	"aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg", "bh",
	"bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv", "cy", "da",
	"de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr",
	"fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht", "hu", "hy", "hz",
	"ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja", "jv", "ka", "kg", "ki", "kj",
	"kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln",
	"lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my", "na", "nb",
	"nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny", "oc", "oj", "om", "or", "os", "pa", "pi",
	"pl", "ps", "pt", "qu", "rm", "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk",
	"sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti",
	"tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo",
	"wa", "wo", "xh", "yi", "yo", "za", "zh", "zu",
];

pub fn is_language_code(code: &str) -> bool {
	ISO_639_1.binary_search(&code).is_ok()
}

/// Type tags are lowercase identifiers: `^[a-z][a-z0-9_-]*$`.
pub fn is_type_tag(tag: &str) -> bool {
	let mut chars = tag.chars();
	matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
		&& chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Parses `text` as YAML and keeps it only if it is a mapping.
pub fn parse_mapping(text: &str) -> Option<serde_yaml::Value> {
	match serde_yaml::from_str::<serde_yaml::Value>(text) {
		Ok(value @ serde_yaml::Value::Mapping(_)) => Some(value),
		_ => None,
	}
}

/// Deserializes a parsed mapping into `T` and runs its validation.
pub fn from_mapping<T: DeserializeOwned + Validate>(value: serde_yaml::Value) -> Result<T, SchemaError> {
	let parsed: T =
		serde_yaml::from_value(value).map_err(|e| SchemaError::Shape(e.to_string()))?;
	parsed.validate()?;
	Ok(parsed)
}

pub trait Validate {
	fn validate(&self) -> Result<(), SchemaError>;
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VertexDefaults {
	#[serde(default)]
	pub default: BTreeMap<String, VertexStyle>,
}

/// Contents of `.research/graph.yaml`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GraphDescriptor {
	pub uuid: Uuid,
	pub languages: Languages,
	#[serde(default)]
	pub vertices: VertexDefaults,
}

impl Validate for GraphDescriptor {
	fn validate(&self) -> Result<(), SchemaError> {
		let languages = &self.languages;
		if languages.all.is_empty() {
			return Err(SchemaError::field("languages.all", "must not be empty"));
		}
		for (i, code) in languages.all.iter().enumerate() {
			if !is_language_code(code) {
				return Err(SchemaError::Language(code.clone()));
			}
			if languages.all[..i].contains(code) {
				return Err(SchemaError::field(
					"languages.all",
					format!("`{code}` is listed twice"),
				));
			}
		}
		if !languages.all.contains(&languages.default) {
			return Err(SchemaError::DefaultLanguage(languages.default.clone()));
		}
		for (tag, style) in &self.vertices.default {
			if !is_type_tag(tag) {
				return Err(SchemaError::field(
					"vertices.default",
					format!("`{tag}` is not a valid type tag"),
				));
			}
			check_size("vertices.default.size", style.size)?;
		}
		Ok(())
	}
}

/// Contents of a vertex folder's `graph.yaml`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VertexDescriptor {
	pub uuid: Uuid,
	pub graph: Uuid,
	#[serde(rename = "type")]
	pub kind: String,
	pub visibility: Visibility,
	#[serde(with = "timestamp")]
	pub created: DateTime<Utc>,
	#[serde(with = "timestamp")]
	pub modified: DateTime<Utc>,
	pub canvas: CanvasStyle,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub edges: BTreeMap<String, Vec<Uuid>>,
}

impl Validate for VertexDescriptor {
	fn validate(&self) -> Result<(), SchemaError> {
		if !is_type_tag(&self.kind) {
			return Err(SchemaError::field(
				"type",
				format!("`{}` is not a valid type tag", self.kind),
			));
		}
		if !self.canvas.x.is_finite() || !self.canvas.y.is_finite() {
			return Err(SchemaError::field("canvas", "position must be finite"));
		}
		check_size("canvas.size", self.canvas.size)?;
		if self.edges.keys().any(|label| label.trim().is_empty()) {
			return Err(SchemaError::field("edges", "labels must not be blank"));
		}
		Ok(())
	}
}

/// The `---` delimited header of an `index.<lang>.<ext>` file.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ContentHeader {
	pub title: String,
	pub slug: String,
}

impl Validate for ContentHeader {
	fn validate(&self) -> Result<(), SchemaError> {
		if self.slug.is_empty() || self.slug.chars().any(char::is_whitespace) {
			return Err(SchemaError::field(
				"slug",
				"must be non-empty and free of whitespace",
			));
		}
		Ok(())
	}
}

fn check_size(field: &'static str, size: Option<f64>) -> Result<(), SchemaError> {
	match size {
		Some(s) if !(s.is_finite() && s > 0.0) => {
			Err(SchemaError::field(field, format!("{s} is not positive")))
		}
		_ => Ok(()),
	}
}

/// RFC 3339 timestamps; a bare `YYYY-MM-DD` date reads as midnight UTC.
mod timestamp {
	use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
	use serde::{Deserialize, Deserializer, Serializer, de::Error};

	pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
		let raw = String::deserialize(deserializer)?;
		if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
			return Ok(at.with_timezone(&Utc));
		}
		NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
			.ok()
			.and_then(|d| d.and_hms_opt(0, 0, 0))
			.map(|d| d.and_utc())
			.ok_or_else(|| D::Error::custom(format!("`{raw}` is not a timestamp")))
	}
}
