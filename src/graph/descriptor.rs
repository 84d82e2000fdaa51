//! Reads one vertex folder into a [`Vertex`].
//!
//! A folder is either accepted or skipped. Skips are logged and never
//! escalate; only an I/O failure on a file the listing reported is
//! returned as an error.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use uuid::Uuid;

use super::model::Vertex;
use super::schema::{self, ContentHeader, VertexDescriptor};
use super::vault::VaultFs;
use crate::error::{GraphError, GraphResult, SkipReason};

/// File name of both the graph-level and the per-vertex descriptor.
pub const DESCRIPTOR_FILE: &str = "graph.yaml";
const HEADER_DELIMITER: &str = "---";

/// Outcome of reading a vertex folder.
#[derive(Debug)]
pub enum VertexLoad {
	Loaded(Box<Vertex>),
	Skipped(SkipReason),
}

/// Splits a content file into its `---` delimited header and the body that
/// follows the closing delimiter. The opening delimiter must be the first
/// line.
pub fn split_header(text: &str) -> Option<(&str, &str)> {
	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	let (first, rest) = text.split_once('\n')?;
	if first.trim_end() != HEADER_DELIMITER {
		return None;
	}
	let mut offset = 0;
	for line in rest.split_inclusive('\n') {
		if line.trim_end() == HEADER_DELIMITER {
			let header = rest[..offset].trim_end_matches(['\r', '\n']);
			return Some((header, &rest[offset + line.len()..]));
		}
		offset += line.len();
	}
	None
}

/// Renders a content file from its header and body.
pub fn render_content(header: &ContentHeader, body: &str) -> GraphResult<String> {
	let yaml = serde_yaml::to_string(header)?;
	Ok(format!("{HEADER_DELIMITER}\n{yaml}{HEADER_DELIMITER}\n{body}"))
}

/// Language code of an `index.<lang>.<ext>` file name.
pub fn content_language(file_name: &str) -> Option<&str> {
	let rest = file_name.strip_prefix("index.")?;
	let (language, ext) = rest.split_once('.')?;
	if ext.is_empty() || ext.contains('.') || !schema::is_language_code(language) {
		return None;
	}
	Some(language)
}

/// Reads and validates a content file header.
pub fn parse_header(text: &str) -> Option<ContentHeader> {
	let (header, _) = split_header(text)?;
	schema::from_mapping(schema::parse_mapping(header)?).ok()
}

/// Reads the vertex stored in `folder`.
///
/// `graph` is the UUID of the graph being loaded; vertices claiming another
/// graph are skipped.
pub async fn load_vertex(vault: &dyn VaultFs, folder: &Path, graph: Uuid) -> GraphResult<VertexLoad> {
	let entries = vault
		.read_dir(folder)
		.await
		.map_err(|e| GraphError::io(folder, e))?;

	if !entries
		.iter()
		.any(|e| !e.is_folder() && e.name == DESCRIPTOR_FILE)
	{
		return Ok(VertexLoad::Skipped(SkipReason::MissingDescriptor));
	}

	let descriptor_path = folder.join(DESCRIPTOR_FILE);
	let raw = vault
		.read_to_string(&descriptor_path)
		.await
		.map_err(|e| GraphError::io(&descriptor_path, e))?;
	let Some(mapping) = schema::parse_mapping(&raw) else {
		return Ok(VertexLoad::Skipped(SkipReason::UnparsableDescriptor));
	};
	let descriptor: VertexDescriptor = match schema::from_mapping(mapping) {
		Ok(d) => d,
		Err(e) => return Ok(VertexLoad::Skipped(SkipReason::InvalidDescriptor(e.to_string()))),
	};
	if descriptor.graph != graph {
		return Ok(VertexLoad::Skipped(SkipReason::ForeignGraph {
			expected: graph,
			found: descriptor.graph,
		}));
	}

	let mut title = BTreeMap::new();
	let mut slug = BTreeMap::new();
	let mut files = BTreeMap::new();

	for entry in entries.iter().filter(|e| !e.is_folder()) {
		let Some(language) = content_language(&entry.name) else {
			continue;
		};
		if files.contains_key(language) {
			warn!(
				"research-canvas: {} has more than one {} content file, keeping the first",
				folder.display(),
				language
			);
			continue;
		}
		let path = folder.join(&entry.name);
		let text = vault
			.read_to_string(&path)
			.await
			.map_err(|e| GraphError::io(&path, e))?;
		let Some(header) = parse_header(&text) else {
			debug!("research-canvas: skipping invalid header in {}", path.display());
			continue;
		};
		title.insert(language.to_string(), header.title);
		slug.insert(language.to_string(), header.slug);
		files.insert(language.to_string(), path);
	}

	if files.is_empty() {
		return Ok(VertexLoad::Skipped(SkipReason::NoContent));
	}

	Ok(VertexLoad::Loaded(Box::new(Vertex {
		uuid: descriptor.uuid,
		graph: descriptor.graph,
		kind: descriptor.kind,
		visibility: descriptor.visibility,
		created: descriptor.created,
		modified: descriptor.modified,
		canvas: descriptor.canvas,
		title,
		slug,
		adjacency: descriptor.edges,
		path: folder.to_path_buf(),
		files,
	})))
}
