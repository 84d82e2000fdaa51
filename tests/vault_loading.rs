//! End-to-end loading, reloading and authoring over an in-memory vault.

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::executor::block_on;
use research_canvas::components::graph_canvas::render::arrowhead;
use research_canvas::graph::{DirEntry, GraphSession, Host, MemoryVault, VaultFs};
use research_canvas::{CanvasConfig, GraphError, Severity};
use uuid::Uuid;

const GRAPH_UUID: &str = "0b8f3a52-9a57-4c3c-8d4e-2f0c1a6b7e10";
const A: &str = "6f1c9e0e-3f55-4a8e-9d7e-8d0b9f3b2a11";
const B: &str = "a3d2c1b0-1111-4222-8333-444455556666";

fn graph_yaml(languages: &[&str]) -> String {
	format!(
		"uuid: {GRAPH_UUID}\nlanguages:\n  default: {}\n  all: [{}]\n",
		languages[0],
		languages.join(", ")
	)
}

fn vertex_yaml(uuid: &str, x: f64, y: f64, parents: &[&str]) -> String {
	format!(
		"uuid: {uuid}\ngraph: {GRAPH_UUID}\ntype: permanent\nvisibility: public\n\
		 created: 2024-01-01T00:00:00Z\nmodified: 2024-01-02\n\
		 canvas:\n  x: {x}\n  y: {y}\nedges:\n  parent: [{}]\n",
		parents.join(", ")
	)
}

fn content(title: &str, slug: &str, body: &str) -> String {
	format!("---\ntitle: {title}\nslug: {slug}\n---\n{body}")
}

/// A vertex folder with one English content file.
fn add_vertex(vault: &MemoryVault, folder: &str, uuid: &str, x: f64, y: f64, parents: &[&str]) {
	vault.insert_file(
		format!("/kb/{folder}/graph.yaml"),
		vertex_yaml(uuid, x, y, parents),
	);
	vault.insert_file(
		format!("/kb/{folder}/index.en.md"),
		content(folder, folder, "Body text\n"),
	);
}

struct TestHost {
	directory: Option<PathBuf>,
	uuids: RefCell<Vec<Uuid>>,
	notices: RefCell<Vec<(Severity, String)>>,
}

impl TestHost {
	fn new(directory: Option<&str>) -> Self {
		Self {
			directory: directory.map(PathBuf::from),
			uuids: RefCell::new(Vec::new()),
			notices: RefCell::new(Vec::new()),
		}
	}
}

#[async_trait(?Send)]
impl Host for TestHost {
	async fn select_directory(&self) -> Option<PathBuf> {
		self.directory.clone()
	}

	async fn new_uuid(&self) -> Uuid {
		self.uuids.borrow_mut().pop().unwrap_or_else(Uuid::new_v4)
	}

	async fn now(&self) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
	}

	fn notify(&self, severity: Severity, message: &str) {
		self.notices.borrow_mut().push((severity, message.to_string()));
	}
}

/// Returns `Pending` once so a concurrent future gets polled.
struct YieldOnce(bool);

impl Future for YieldOnce {
	type Output = ();

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		if self.0 {
			Poll::Ready(())
		} else {
			self.0 = true;
			cx.waker().wake_by_ref();
			Poll::Pending
		}
	}
}

/// Memory vault whose directory listings suspend once.
#[derive(Default)]
struct SlowVault(MemoryVault);

#[async_trait(?Send)]
impl VaultFs for SlowVault {
	async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		YieldOnce(false).await;
		self.0.read_dir(path).await
	}

	async fn read_to_string(&self, path: &Path) -> io::Result<String> {
		self.0.read_to_string(path).await
	}

	async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		self.0.write(path, contents).await
	}

	async fn create_dir(&self, path: &Path) -> io::Result<()> {
		self.0.create_dir(path).await
	}
}

/// Memory vault that refuses to write files whose name is `fail_on`.
struct FailingVault {
	inner: MemoryVault,
	fail_on: &'static str,
}

#[async_trait(?Send)]
impl VaultFs for FailingVault {
	async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		self.inner.read_dir(path).await
	}

	async fn read_to_string(&self, path: &Path) -> io::Result<String> {
		self.inner.read_to_string(path).await
	}

	async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		if path.file_name().is_some_and(|name| name == self.fail_on) {
			return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
		}
		self.inner.write(path, contents).await
	}

	async fn create_dir(&self, path: &Path) -> io::Result<()> {
		self.inner.create_dir(path).await
	}
}

fn base_vault(languages: &[&str]) -> MemoryVault {
	let vault = MemoryVault::new();
	vault.insert_file("/kb/.research/graph.yaml", graph_yaml(languages));
	vault
}

fn session(vault: MemoryVault) -> GraphSession<MemoryVault, TestHost> {
	GraphSession::new(vault, TestHost::new(Some("/kb")), CanvasConfig::default())
}

#[test]
fn invalid_vertex_folders_are_skipped() {
	let vault = base_vault(&["en"]);
	add_vertex(&vault, "one", A, 0.0, 0.0, &[]);
	add_vertex(&vault, "two", B, 50.0, 0.0, &[]);
	add_vertex(
		&vault,
		"three",
		"c0ffee00-0000-4000-8000-000000000003",
		0.0,
		50.0,
		&[],
	);
	// Missing descriptor.
	vault.insert_file("/kb/bare/index.en.md", content("Bare", "bare", ""));
	// Schema violation.
	vault.insert_file(
		"/kb/bad-type/graph.yaml",
		vertex_yaml("c0ffee00-0000-4000-8000-000000000004", 0.0, 0.0, &[])
			.replace("type: permanent", "type: Not A Tag"),
	);
	vault.insert_file("/kb/bad-type/index.en.md", content("Bad", "bad", ""));
	// Not YAML.
	vault.insert_file("/kb/garbled/graph.yaml", "::: [");
	// No content files.
	vault.insert_file(
		"/kb/empty/graph.yaml",
		vertex_yaml("c0ffee00-0000-4000-8000-000000000005", 0.0, 0.0, &[]),
	);
	// Duplicate of A.
	add_vertex(&vault, "zz-copy", A, 9.0, 9.0, &[]);

	let session = session(vault);
	let graph = block_on(session.open()).unwrap().unwrap();
	assert_eq!(graph.vertices().len(), 3);
	let a = Uuid::parse_str(A).unwrap();
	assert_eq!(graph.vertex(&a).unwrap().canvas.x, 0.0);
	assert!(session.host().notices.borrow().is_empty());
}

#[test]
fn titles_cover_only_present_languages() {
	let vault = base_vault(&["en", "de", "fr"]);
	vault.insert_file("/kb/n/graph.yaml", vertex_yaml(A, 0.0, 0.0, &[]));
	vault.insert_file("/kb/n/index.en.md", content("Hello", "hello", "Hi\n"));
	vault.insert_file("/kb/n/index.de.md", content("Hallo", "hallo", "Moin\n"));

	let session = session(vault);
	let graph = block_on(session.open()).unwrap().unwrap();
	let vertex = &graph.vertices()[0];
	assert_eq!(vertex.title.keys().collect::<Vec<_>>(), vec!["de", "en"]);
	assert_eq!(vertex.slug.keys().collect::<Vec<_>>(), vec!["de", "en"]);
	assert_eq!(vertex.title_in("fr", &graph.languages.default), "Hello");
	assert_eq!(vertex.title_in("de", &graph.languages.default), "Hallo");

	let uuid = vertex.uuid;
	let fr = block_on(session.vertex_content(uuid, "fr")).unwrap();
	assert_eq!((fr.language.as_str(), fr.body.as_str()), ("en", "Hi\n"));
	let de = block_on(session.vertex_content(uuid, "de")).unwrap();
	assert_eq!((de.title.as_str(), de.body.as_str()), ("Hallo", "Moin\n"));
}

#[test]
fn parent_edge_between_two_vertices() {
	let vault = base_vault(&["en"]);
	add_vertex(&vault, "a", A, 0.0, 0.0, &[B]);
	add_vertex(&vault, "b", B, 100.0, 0.0, &[]);

	let session = session(vault);
	let graph = block_on(session.open()).unwrap().unwrap();
	assert_eq!(graph.vertices().len(), 2);
	assert_eq!(graph.edges().len(), 1);

	let edge = &graph.edges()[0];
	assert_eq!(edge.label, "parent");
	let (from, to) = graph.endpoints(edge).unwrap();
	let size = graph.style_of(to).size;
	assert_eq!(size, 16.0);
	let [tip, ..] = arrowhead(from, to, size).unwrap();
	assert!((tip.x - (100.0 - 16.0 * 1.125)).abs() < 1e-9);
	assert!(tip.y.abs() < 1e-9);
}

#[test]
fn concurrent_reload_is_rejected() {
	let vault = SlowVault::default();
	vault.0.insert_file("/kb/.research/graph.yaml", graph_yaml(&["en"]));
	add_vertex(&vault.0, "a", A, 0.0, 0.0, &[]);
	let session = GraphSession::new(vault, TestHost::new(Some("/kb")), CanvasConfig::default());
	let before = block_on(session.open_path(Path::new("/kb"))).unwrap();

	let (first, second) = block_on(futures::future::join(session.reload(), session.reload()));
	assert!(first.is_ok());
	assert!(matches!(second, Err(GraphError::Busy)));
	assert!(!session.is_loading());
	assert_eq!(session.graph().unwrap().vertices(), before.vertices());

	assert!(block_on(session.reload()).is_ok());
}

#[test]
fn failed_reload_keeps_previous_graph() {
	let vault = base_vault(&["en"]);
	add_vertex(&vault, "a", A, 0.0, 0.0, &[]);
	let session = session(vault);
	let before = block_on(session.open()).unwrap().unwrap();

	session.vault().remove("/kb/.research/graph.yaml");
	let err = block_on(session.reload()).unwrap_err();
	assert!(matches!(err, GraphError::MissingGraphDescriptor(_)));
	assert!(Arc::ptr_eq(&session.graph().unwrap(), &before));

	let notices = session.host().notices.borrow();
	assert_eq!(notices.len(), 1);
	assert_eq!(notices[0].0, Severity::Warning);
}

#[test]
fn create_vertex_writes_files_then_reloads() {
	let vault = base_vault(&["en", "de"]);
	add_vertex(&vault, "a", A, 0.0, 0.0, &[]);
	let session = session(vault);
	block_on(session.open()).unwrap();

	let new = Uuid::parse_str("12345678-9abc-4def-8123-456789abcdef").unwrap();
	session.host().uuids.borrow_mut().push(new);
	let created = block_on(session.create_vertex(120.0, -40.0)).unwrap();
	assert_eq!(created, new);

	let folder = format!("/kb/{new}");
	for file in ["graph.yaml", "index.en.md", "index.de.md"] {
		assert!(session.vault().contains(format!("{folder}/{file}")), "{file}");
	}

	let graph = session.graph().unwrap();
	assert_eq!(graph.vertices().len(), 2);
	let vertex = graph.vertex(&new).unwrap();
	assert_eq!((vertex.canvas.x, vertex.canvas.y), (120.0, -40.0));
	assert_eq!(vertex.kind, "fleeting");
	assert_eq!(vertex.title["en"], "Untitled");
	assert_eq!(vertex.slug["de"], "untitled-12345678");
	assert_eq!(vertex.created, vertex.modified);
}

#[test]
fn create_vertex_requires_open_graph() {
	let session = session(base_vault(&["en"]));
	let err = block_on(session.create_vertex(0.0, 0.0)).unwrap_err();
	assert!(matches!(err, GraphError::NotOpen));
	assert_eq!(session.host().notices.borrow().len(), 1);
}

#[test]
fn cancelled_open_is_a_no_op() {
	let session = GraphSession::new(
		base_vault(&["en"]),
		TestHost::new(None),
		CanvasConfig::default(),
	);
	assert!(block_on(session.open()).unwrap().is_none());
	assert!(session.graph().is_none());
	assert!(session.host().notices.borrow().is_empty());
	assert!(matches!(session.metadata(), Err(GraphError::NotOpen)));
}

#[test]
fn close_drops_the_graph_once() {
	let session = session(base_vault(&["en"]));
	block_on(session.open()).unwrap();
	assert!(session.close());
	assert!(session.vertices().is_empty());
	assert!(!session.close());
	assert_eq!(session.host().notices.borrow().len(), 1);
}

#[test]
fn create_vertex_rejects_unloadable_type_without_writing() {
	let vault = base_vault(&["en"]);
	add_vertex(&vault, "a", A, 0.0, 0.0, &[]);
	let config = CanvasConfig {
		new_vertex_type: "Idea".into(),
		..CanvasConfig::default()
	};
	let session = GraphSession::new(vault, TestHost::new(Some("/kb")), config);
	block_on(session.open()).unwrap();

	let new = Uuid::parse_str("12345678-9abc-4def-8123-456789abcdef").unwrap();
	session.host().uuids.borrow_mut().push(new);
	let err = block_on(session.create_vertex(0.0, 0.0)).unwrap_err();
	assert!(matches!(err, GraphError::InvalidVertexTemplate(_)));
	assert_eq!(err.severity(), Severity::Warning);
	assert!(!session.vault().contains(format!("/kb/{new}")));
	assert_eq!(session.host().notices.borrow().len(), 1);
	assert_eq!(session.vertices().len(), 1);
	assert!(!session.is_loading());
}

#[test]
fn create_vertex_rejects_dotted_extension() {
	let config = CanvasConfig {
		content_extension: "tar.gz".into(),
		..CanvasConfig::default()
	};
	let session = GraphSession::new(base_vault(&["en"]), TestHost::new(Some("/kb")), config);
	block_on(session.open()).unwrap();

	let err = block_on(session.create_vertex(0.0, 0.0)).unwrap_err();
	assert!(matches!(err, GraphError::InvalidVertexTemplate(_)));
	assert!(session.vertices().is_empty());
}

#[test]
fn failed_content_write_leaves_no_descriptor() {
	let inner = base_vault(&["en", "de"]);
	add_vertex(&inner, "a", A, 0.0, 0.0, &[]);
	let vault = FailingVault {
		inner,
		fail_on: "index.de.md",
	};
	let session = GraphSession::new(vault, TestHost::new(Some("/kb")), CanvasConfig::default());
	block_on(session.open()).unwrap();

	let new = Uuid::parse_str("12345678-9abc-4def-8123-456789abcdef").unwrap();
	session.host().uuids.borrow_mut().push(new);
	let err = block_on(session.create_vertex(10.0, 10.0)).unwrap_err();
	assert!(matches!(err, GraphError::Io { .. }));
	assert_eq!(err.severity(), Severity::Error);

	let folder = format!("/kb/{new}");
	assert!(session.vault().inner.contains(format!("{folder}/index.en.md")));
	assert!(!session.vault().inner.contains(format!("{folder}/graph.yaml")));

	let graph = block_on(session.reload()).unwrap();
	assert_eq!(graph.vertices().len(), 1);
	assert!(graph.vertex(&new).is_none());
}
