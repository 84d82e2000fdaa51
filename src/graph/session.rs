//! Owned application state for the currently open graph.
//!
//! [`GraphSession`] is the single writer of the published graph. Opening,
//! reloading, and creating a vertex all run the full load pipeline and swap
//! the result in only on success, so readers either see the previous graph
//! or the new one. At most one of those operations runs at a time; a second
//! request while one is in flight is rejected with [`GraphError::Busy`].

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use uuid::Uuid;

use super::descriptor::{self, DESCRIPTOR_FILE};
use super::loader;
use super::model::{CanvasStyle, Edge, Graph, Vertex, Visibility};
use super::schema::{ContentHeader, VertexDescriptor};
use super::vault::VaultFs;
use crate::config::CanvasConfig;
use crate::error::{GraphError, GraphResult, Severity};

/// Services the embedding application provides to the session.
#[async_trait(?Send)]
pub trait Host {
	/// Asks the user for a base directory. `None` means the user cancelled.
	async fn select_directory(&self) -> Option<PathBuf>;

	async fn new_uuid(&self) -> Uuid {
		Uuid::new_v4()
	}

	async fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}

	/// Shows a user-facing message.
	fn notify(&self, severity: Severity, message: &str);
}

/// The body of one language file, read on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexContent {
	pub uuid: Uuid,
	pub language: String,
	pub title: String,
	pub slug: String,
	pub body: String,
	pub path: PathBuf,
}

/// Clears the in-flight flag when the guarded operation ends, including on
/// early return.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
	fn acquire(flag: &'a Cell<bool>) -> GraphResult<Self> {
		if flag.replace(true) {
			return Err(GraphError::Busy);
		}
		Ok(Self(flag))
	}
}

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// The open graph plus the vault and host it was loaded through.
///
/// Not `Sync`: the session lives on the UI thread and is shared by `Rc`.
pub struct GraphSession<V: VaultFs, H: Host> {
	vault: V,
	host: H,
	config: CanvasConfig,
	current: RefCell<Option<Arc<Graph>>>,
	in_flight: Cell<bool>,
}

impl<V: VaultFs, H: Host> GraphSession<V, H> {
	/// A session with no graph open.
	pub fn new(vault: V, host: H, config: CanvasConfig) -> Self {
		Self {
			vault,
			host,
			config,
			current: RefCell::new(None),
			in_flight: Cell::new(false),
		}
	}

	/// The vault the session reads and writes.
	pub fn vault(&self) -> &V {
		&self.vault
	}

	/// Host services, also used to surface preview failures.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Whether an open, reload or create is running.
	pub fn is_loading(&self) -> bool {
		self.in_flight.get()
	}

	/// The published graph, if any.
	pub fn graph(&self) -> Option<Arc<Graph>> {
		self.current.borrow().clone()
	}

	/// Same as [`GraphSession::graph`]; the metadata lives on the graph.
	pub fn metadata(&self) -> GraphResult<Arc<Graph>> {
		self.graph().ok_or(GraphError::NotOpen)
	}

	/// Vertices of the published graph; empty when none is open.
	pub fn vertices(&self) -> Vec<Vertex> {
		self.graph()
			.map(|g| g.vertices().to_vec())
			.unwrap_or_default()
	}

	/// Edges of the published graph; empty when none is open.
	pub fn edges(&self) -> Vec<Edge> {
		self.graph().map(|g| g.edges().to_vec()).unwrap_or_default()
	}

	/// Asks the host for a directory and opens it. A cancelled selection is
	/// a no-op and yields `Ok(None)`.
	pub async fn open(&self) -> GraphResult<Option<Arc<Graph>>> {
		let Some(path) = self.host.select_directory().await else {
			info!("research-canvas: open cancelled");
			return Ok(None);
		};
		self.open_path(&path).await.map(Some)
	}

	pub async fn open_path(&self, path: &Path) -> GraphResult<Arc<Graph>> {
		let _guard = self.guard()?;
		self.load_and_publish(path).await
	}

	/// Rebuilds the open graph from disk.
	pub async fn reload(&self) -> GraphResult<Arc<Graph>> {
		let _guard = self.guard()?;
		let path = self.current_path()?;
		self.load_and_publish(&path).await
	}

	/// Drops the published graph. Returns `false` if nothing was open.
	pub fn close(&self) -> bool {
		if self.in_flight.get() {
			self.report(&GraphError::Busy);
			return false;
		}
		match self.current.borrow_mut().take() {
			Some(graph) => {
				info!("research-canvas: closed {}", graph.path.display());
				true
			}
			None => {
				self.report(&GraphError::NotOpen);
				false
			}
		}
	}

	/// Reads the body of `uuid` in `language`, falling back to the graph's
	/// default language and then to any language the vertex has.
	pub async fn vertex_content(&self, uuid: Uuid, language: &str) -> GraphResult<VertexContent> {
		let graph = self.metadata()?;
		let vertex = graph.vertex(&uuid).ok_or(GraphError::VertexNotFound(uuid))?;
		let (language, path) = vertex
			.files
			.get_key_value(language)
			.or_else(|| vertex.files.get_key_value(&graph.languages.default))
			.or_else(|| vertex.files.iter().next())
			.ok_or(GraphError::VertexNotFound(uuid))?;

		let text = self
			.vault
			.read_to_string(path)
			.await
			.map_err(|e| GraphError::io(path, e))?;
		let body = descriptor::split_header(&text)
			.map(|(_, body)| body)
			.unwrap_or(&text);

		Ok(VertexContent {
			uuid,
			language: language.clone(),
			title: vertex.title.get(language).cloned().unwrap_or_default(),
			slug: vertex.slug.get(language).cloned().unwrap_or_default(),
			body: body.to_string(),
			path: path.clone(),
		})
	}

	/// Writes a new vertex at graph coordinates `(x, y)` and reloads.
	///
	/// The folder, one content file per graph language, and then the
	/// descriptor are written before the reload starts. A write that fails
	/// part way leaves a folder without `graph.yaml`, which the loader skips.
	/// Invalid type or extension settings fail before anything is written.
	pub async fn create_vertex(&self, x: f64, y: f64) -> GraphResult<Uuid> {
		let _guard = self.guard()?;
		let graph = self.metadata().inspect_err(|e| self.report(e))?;
		let uuid = self
			.write_vertex(&graph, x, y)
			.await
			.inspect_err(|e| self.report(e))?;
		self.load_and_publish(&graph.path).await?;
		Ok(uuid)
	}

	async fn write_vertex(&self, graph: &Graph, x: f64, y: f64) -> GraphResult<Uuid> {
		self.config
			.check_vertex_template()
			.map_err(GraphError::InvalidVertexTemplate)?;
		let uuid = self.host.new_uuid().await;
		let now = self.host.now().await;
		let folder = graph.path.join(uuid.to_string());

		let descriptor = VertexDescriptor {
			uuid,
			graph: graph.uuid,
			kind: self.config.new_vertex_type.clone(),
			visibility: Visibility::Private,
			created: now,
			modified: now,
			canvas: CanvasStyle {
				x,
				y,
				..Default::default()
			},
			edges: Default::default(),
		};
		let descriptor_yaml = serde_yaml::to_string(&descriptor)?;

		let short = uuid.simple().to_string();
		let header = ContentHeader {
			title: self.config.new_vertex_title.clone(),
			slug: format!("{}-{}", slugify(&self.config.new_vertex_title), &short[..8]),
		};
		let content = descriptor::render_content(&header, "")?;

		self.vault
			.create_dir(&folder)
			.await
			.map_err(|e| GraphError::io(&folder, e))?;
		for language in &graph.languages.all {
			let path = folder.join(format!(
				"index.{language}.{}",
				self.config.content_extension
			));
			self.vault
				.write(&path, &content)
				.await
				.map_err(|e| GraphError::io(&path, e))?;
		}
		let descriptor_path = folder.join(DESCRIPTOR_FILE);
		self.vault
			.write(&descriptor_path, &descriptor_yaml)
			.await
			.map_err(|e| GraphError::io(&descriptor_path, e))?;

		info!("research-canvas: created vertex {uuid} at ({x}, {y})");
		Ok(uuid)
	}

	fn guard(&self) -> GraphResult<InFlight<'_>> {
		InFlight::acquire(&self.in_flight).inspect_err(|e| {
			warn!("research-canvas: {e}");
		})
	}

	fn current_path(&self) -> GraphResult<PathBuf> {
		self.metadata()
			.map(|graph| graph.path.clone())
			.inspect_err(|e| self.report(e))
	}

	/// Runs the loader and publishes on success. Failures are reported to
	/// the host once and the previous graph stays published.
	async fn load_and_publish(&self, path: &Path) -> GraphResult<Arc<Graph>> {
		match loader::load_graph(&self.vault, path).await {
			Ok(graph) => {
				let graph = Arc::new(graph);
				*self.current.borrow_mut() = Some(graph.clone());
				Ok(graph)
			}
			Err(e) => {
				self.report(&e);
				Err(e)
			}
		}
	}

	/// Logs `e` and shows it to the user with its severity.
	fn report(&self, e: &GraphError) {
		match e.severity() {
			Severity::Warning => warn!("research-canvas: {e}"),
			Severity::Error => error!("research-canvas: {e}"),
		}
		self.host.notify(e.severity(), &e.to_string());
	}
}

/// Lowercase ASCII slug with single dashes between words.
fn slugify(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());
	for c in text.chars() {
		if c.is_ascii_alphanumeric() {
			slug.push(c.to_ascii_lowercase());
		} else if !slug.is_empty() && !slug.ends_with('-') {
			slug.push('-');
		}
	}
	let slug = slug.trim_end_matches('-');
	if slug.is_empty() {
		"vertex".to_string()
	} else {
		slug.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn slugify_collapses_separators() {
		assert_eq!(slugify("Untitled"), "untitled");
		assert_eq!(slugify("  A new   idea! "), "a-new-idea");
		assert_eq!(slugify("???"), "vertex");
	}

	#[test]
	fn in_flight_guard_rejects_and_releases() {
		let flag = Cell::new(false);
		{
			let _held = InFlight::acquire(&flag).unwrap();
			assert!(matches!(InFlight::acquire(&flag), Err(GraphError::Busy)));
		}
		assert!(!flag.get());
		assert!(InFlight::acquire(&flag).is_ok());
	}
}
