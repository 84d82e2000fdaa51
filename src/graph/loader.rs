//! Builds a [`Graph`] from a base directory.
//!
//! Pipeline: list the base directory, validate `.research/graph.yaml`,
//! classify the remaining entries, load every folder as a vertex, then
//! derive edges from the adjacency maps. Nothing is published until every
//! step has succeeded.

use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};

use super::descriptor::{self, DESCRIPTOR_FILE, VertexLoad};
use super::model::{Graph, GraphItem, ItemKind, derive_edges};
use super::schema::{self, GraphDescriptor};
use super::vault::{DirEntry, VaultFs};
use crate::error::{GraphError, GraphResult, SkipReason};

/// Reserved subfolder holding the graph-level descriptor.
pub const METADATA_FOLDER: &str = ".research";

/// Housekeeping entries that are never vertices or listed items.
pub const IGNORED_ITEMS: &[&str] = &[
	".git",
	".gitignore",
	METADATA_FOLDER,
	"CONTRIBUTING.md",
	"LICENSE.md",
	"README.md",
];

pub fn is_ignored(name: &str) -> bool {
	IGNORED_ITEMS.contains(&name)
}

/// Reads and validates the graph-level descriptor under `base`.
pub async fn read_graph_descriptor(
	vault: &dyn VaultFs,
	base: &Path,
	base_entries: &[DirEntry],
) -> GraphResult<GraphDescriptor> {
	let Some(metadata) = base_entries.iter().find(|e| e.name == METADATA_FOLDER) else {
		return Err(GraphError::MissingMetadataFolder(base.to_path_buf()));
	};
	if !metadata.is_folder() {
		return Err(GraphError::MetadataNotFolder(base.to_path_buf()));
	}

	let folder = base.join(METADATA_FOLDER);
	let entries = vault
		.read_dir(&folder)
		.await
		.map_err(|e| GraphError::io(&folder, e))?;
	if !entries
		.iter()
		.any(|e| !e.is_folder() && e.name == DESCRIPTOR_FILE)
	{
		return Err(GraphError::MissingGraphDescriptor(folder));
	}

	let path = folder.join(DESCRIPTOR_FILE);
	let raw = vault
		.read_to_string(&path)
		.await
		.map_err(|e| GraphError::io(&path, e))?;
	let mapping = schema::parse_mapping(&raw)
		.ok_or_else(|| GraphError::UnparsableGraphDescriptor(path.display().to_string()))?;
	Ok(schema::from_mapping(mapping)?)
}

/// Loads the graph rooted at `base`.
///
/// Invalid vertex folders are skipped. Only graph-level precondition and
/// I/O failures are returned as errors.
pub async fn load_graph(vault: &dyn VaultFs, base: &Path) -> GraphResult<Graph> {
	let entries = vault
		.read_dir(base)
		.await
		.map_err(|e| GraphError::io(base, e))?;

	let descriptor = read_graph_descriptor(vault, base, &entries).await?;

	let items: Vec<GraphItem> = entries
		.iter()
		.filter(|e| !is_ignored(&e.name))
		.map(|e| GraphItem {
			name: e.name.clone(),
			kind: e.kind,
			path: base.join(&e.name),
		})
		.collect();

	let mut vertices = Vec::new();
	let mut seen = HashSet::new();
	let mut skipped = 0usize;

	for item in items.iter().filter(|i| i.kind == ItemKind::Folder) {
		let reason = match descriptor::load_vertex(vault, &item.path, descriptor.uuid).await? {
			VertexLoad::Loaded(vertex) if seen.insert(vertex.uuid) => {
				vertices.push(*vertex);
				continue;
			}
			VertexLoad::Loaded(vertex) => SkipReason::DuplicateUuid(vertex.uuid),
			VertexLoad::Skipped(reason) => reason,
		};
		skipped += 1;
		warn!(
			"research-canvas: skipping {}: {}",
			item.path.display(),
			reason
		);
	}

	let edges = derive_edges(&vertices);
	info!(
		"research-canvas: loaded {} vertices, {} edges from {} ({} skipped)",
		vertices.len(),
		edges.len(),
		base.display(),
		skipped
	);

	Ok(Graph::new(
		descriptor.uuid,
		descriptor.languages,
		descriptor.vertices.default,
		base.to_path_buf(),
		items,
		vertices,
		edges,
	))
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::graph::vault::MemoryVault;

	const GRAPH: &str =
		"uuid: 0b8f3a52-9a57-4c3c-8d4e-2f0c1a6b7e10\nlanguages:\n  default: en\n  all: [en]\n";

	fn load(vault: &MemoryVault) -> GraphResult<Graph> {
		block_on(load_graph(vault, Path::new("/kb")))
	}

	#[test]
	fn missing_metadata_folder_cannot_open() {
		let vault = MemoryVault::new();
		vault.insert_folder("/kb/note");
		assert!(matches!(load(&vault), Err(GraphError::MissingMetadataFolder(_))));

		vault.insert_file("/kb/.research", "not a folder");
		assert!(matches!(load(&vault), Err(GraphError::MetadataNotFolder(_))));
	}

	#[test]
	fn graph_descriptor_must_exist_and_validate() {
		let vault = MemoryVault::new();
		vault.insert_folder("/kb/.research");
		assert!(matches!(load(&vault), Err(GraphError::MissingGraphDescriptor(_))));

		vault.insert_file("/kb/.research/graph.yaml", "[1, 2]");
		assert!(matches!(load(&vault), Err(GraphError::UnparsableGraphDescriptor(_))));

		vault.insert_file("/kb/.research/graph.yaml", GRAPH.replace("[en]", "[]"));
		assert!(matches!(load(&vault), Err(GraphError::InvalidGraphDescriptor(_))));

		vault.insert_file("/kb/.research/graph.yaml", GRAPH);
		let graph = load(&vault).unwrap();
		assert_eq!(graph.languages.default, "en");
		assert!(graph.vertices().is_empty());
	}

	#[test]
	fn missing_base_is_an_io_error() {
		let vault = MemoryVault::new();
		let err = load(&vault).unwrap_err();
		assert!(matches!(err, GraphError::Io { .. }));
		assert_eq!(err.severity(), crate::error::Severity::Error);
	}

	#[test]
	fn classifies_items_without_housekeeping() {
		let vault = MemoryVault::new();
		vault.insert_file("/kb/.research/graph.yaml", GRAPH);
		vault.insert_file("/kb/README.md", "# readme");
		vault.insert_file("/kb/.gitignore", "target");
		vault.insert_folder("/kb/.git");
		vault.insert_file("/kb/notes.txt", "loose file");
		vault.insert_folder("/kb/draft");

		let graph = load(&vault).unwrap();
		let items: Vec<_> = graph
			.items
			.iter()
			.map(|i| (i.name.as_str(), i.kind))
			.collect();
		assert_eq!(
			items,
			vec![("draft", ItemKind::Folder), ("notes.txt", ItemKind::File)]
		);
	}
}
