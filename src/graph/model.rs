//! In-memory graph: vertices, derived edges, and lookup indices.
//!
//! A [`Graph`] is immutable once built. Every load or reload produces a new
//! instance that replaces the previous one wholesale.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::style::{self, ResolvedStyle, VertexStyle};

/// Relation label rendered with a directional arrowhead.
pub const LABEL_PARENT: &str = "parent";
/// Relation label rendered dashed and highlighted from either endpoint.
pub const LABEL_SIBLING: &str = "sibling";
/// Color token every derived edge starts with.
pub const DEFAULT_EDGE_COLOR: &str = "--layer";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	Public,
	Private,
}

/// Per-vertex canvas block: position plus optional style overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasStyle {
	pub x: f64,
	pub y: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub library: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fill: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stroke: Option<String>,
}

impl CanvasStyle {
	/// The per-vertex layer of the style lookup.
	pub fn overrides(&self) -> VertexStyle {
		VertexStyle {
			library: self.library.clone(),
			icon: self.icon.clone(),
			size: self.size,
			fill: self.fill.clone(),
			stroke: self.stroke.clone(),
		}
	}
}

/// A note backed by one folder on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub uuid: Uuid,
	pub graph: Uuid,
	/// Open type tag such as `permanent` or `fleeting`.
	pub kind: String,
	pub visibility: Visibility,
	pub created: DateTime<Utc>,
	pub modified: DateTime<Utc>,
	pub canvas: CanvasStyle,
	/// Language code to title, one entry per valid content file.
	pub title: BTreeMap<String, String>,
	/// Language code to slug, one entry per valid content file.
	pub slug: BTreeMap<String, String>,
	/// Relation label to ordered target UUIDs.
	pub adjacency: BTreeMap<String, Vec<Uuid>>,
	/// Owning folder.
	pub path: PathBuf,
	/// Language code to the content file the title came from.
	pub files: BTreeMap<String, PathBuf>,
}

impl Vertex {
	/// Title for `language`, falling back to `default_language`, then to any
	/// available title, then to an empty string.
	pub fn title_in(&self, language: &str, default_language: &str) -> &str {
		self.title
			.get(language)
			.or_else(|| self.title.get(default_language))
			.or_else(|| self.title.values().next())
			.map(String::as_str)
			.unwrap_or("")
	}
}

/// Rendering hints attached to every derived edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: String,
	pub width: f64,
	pub weight: f64,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			color: DEFAULT_EDGE_COLOR.to_string(),
			width: 1.0,
			weight: 1.0,
		}
	}
}

/// A directed, labeled relation derived from a vertex's adjacency map.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub from: Uuid,
	pub to: Uuid,
	pub label: String,
	pub canvas: EdgeStyle,
}

impl Edge {
	pub fn new(from: Uuid, to: Uuid, label: impl Into<String>) -> Self {
		Self {
			from,
			to,
			label: label.into(),
			canvas: EdgeStyle::default(),
		}
	}

	pub fn is_parent(&self) -> bool {
		self.label == LABEL_PARENT
	}

	pub fn is_sibling(&self) -> bool {
		self.label == LABEL_SIBLING
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Languages {
	pub default: String,
	pub all: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
	Folder,
	File,
}

/// One non-ignored entry of the base directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphItem {
	pub name: String,
	pub kind: ItemKind,
	pub path: PathBuf,
}

/// A fully loaded graph.
#[derive(Clone, Debug)]
pub struct Graph {
	pub uuid: Uuid,
	pub languages: Languages,
	/// Per-type style defaults from the graph descriptor.
	pub vertex_defaults: BTreeMap<String, VertexStyle>,
	pub path: PathBuf,
	pub items: Vec<GraphItem>,
	vertices: Vec<Vertex>,
	edges: Vec<Edge>,
	index: HashMap<Uuid, usize>,
}

impl Graph {
	pub fn new(
		uuid: Uuid,
		languages: Languages,
		vertex_defaults: BTreeMap<String, VertexStyle>,
		path: PathBuf,
		items: Vec<GraphItem>,
		vertices: Vec<Vertex>,
		edges: Vec<Edge>,
	) -> Self {
		let index = vertices
			.iter()
			.enumerate()
			.map(|(i, v)| (v.uuid, i))
			.collect();
		Self {
			uuid,
			languages,
			vertex_defaults,
			path,
			items,
			vertices,
			edges,
			index,
		}
	}

	pub fn vertices(&self) -> &[Vertex] {
		&self.vertices
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn vertex(&self, uuid: &Uuid) -> Option<&Vertex> {
		self.index.get(uuid).map(|&i| &self.vertices[i])
	}

	/// Both endpoints of `edge`, or `None` when either is absent.
	pub fn endpoints(&self, edge: &Edge) -> Option<(&Vertex, &Vertex)> {
		Some((self.vertex(&edge.from)?, self.vertex(&edge.to)?))
	}

	/// Icon styling for `vertex` after the per-vertex, per-type and
	/// built-in layers have been consulted.
	pub fn style_of(&self, vertex: &Vertex) -> ResolvedStyle {
		style::resolve(
			&vertex.canvas.overrides(),
			self.vertex_defaults.get(&vertex.kind),
		)
	}
}

/// Emits one edge per adjacency entry, in vertex then label order.
///
/// Targets are not checked against the vertex set; renderers skip edges
/// whose endpoints are missing.
pub fn derive_edges(vertices: &[Vertex]) -> Vec<Edge> {
	vertices
		.iter()
		.flat_map(|vertex| {
			vertex.adjacency.iter().flat_map(move |(label, targets)| {
				targets
					.iter()
					.map(move |target| Edge::new(vertex.uuid, *target, label.clone()))
			})
		})
		.collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
	use super::*;

	pub fn vertex(uuid: Uuid, x: f64, y: f64) -> Vertex {
		let at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
			.map(|d| d.with_timezone(&Utc))
			.unwrap();
		Vertex {
			uuid,
			graph: Uuid::nil(),
			kind: "permanent".into(),
			visibility: Visibility::Public,
			created: at,
			modified: at,
			canvas: CanvasStyle {
				x,
				y,
				..Default::default()
			},
			title: BTreeMap::from([("en".to_string(), format!("Vertex {x},{y}"))]),
			slug: BTreeMap::from([("en".to_string(), "vertex".to_string())]),
			adjacency: BTreeMap::new(),
			path: PathBuf::from(format!("/vault/{uuid}")),
			files: BTreeMap::new(),
		}
	}

	pub fn graph(vertices: Vec<Vertex>) -> Graph {
		let edges = derive_edges(&vertices);
		Graph::new(
			Uuid::nil(),
			Languages {
				default: "en".into(),
				all: vec!["en".into()],
			},
			BTreeMap::new(),
			PathBuf::from("/vault"),
			Vec::new(),
			vertices,
			edges,
		)
	}
}
