//! Filesystem access for the loader.
//!
//! The loader only talks to a [`VaultFs`]. The browser build serves a vault
//! snapshot from memory; native builds can read a real directory.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use super::model::ItemKind;

/// One child of a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
	pub name: String,
	pub kind: ItemKind,
}

impl DirEntry {
	pub fn is_folder(&self) -> bool {
		self.kind == ItemKind::Folder
	}
}

/// Async filesystem operations consumed by the loader and the session.
#[async_trait(?Send)]
pub trait VaultFs {
	/// Immediate children of `path`, in listing order.
	async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
	async fn read_to_string(&self, path: &Path) -> io::Result<String>;
	async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
	async fn create_dir(&self, path: &Path) -> io::Result<()>;
}

#[derive(Clone, Debug)]
enum Node {
	Folder,
	File(String),
}

/// An in-memory directory tree.
///
/// Children are listed in lexical order.
#[derive(Debug, Default)]
pub struct MemoryVault {
	nodes: RefCell<BTreeMap<PathBuf, Node>>,
}

/// JSON snapshot shape: a root path plus file contents keyed by path
/// relative to that root. Folders are implied by the file paths; empty
/// folders can be listed explicitly.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VaultSnapshot {
	pub root: PathBuf,
	#[serde(default)]
	pub files: BTreeMap<String, String>,
	#[serde(default)]
	pub folders: Vec<String>,
}

impl MemoryVault {
	/// An empty vault with no root folder.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_snapshot(snapshot: &VaultSnapshot) -> Self {
		let vault = Self::new();
		vault.insert_folder(&snapshot.root);
		for folder in &snapshot.folders {
			vault.insert_folder(snapshot.root.join(folder));
		}
		for (rel, contents) in &snapshot.files {
			vault.insert_file(snapshot.root.join(rel), contents.clone());
		}
		vault
	}

	/// Adds a folder and any missing ancestors.
	pub fn insert_folder(&self, path: impl AsRef<Path>) {
		let mut nodes = self.nodes.borrow_mut();
		for ancestor in path.as_ref().ancestors() {
			if ancestor.as_os_str().is_empty() {
				break;
			}
			nodes.entry(ancestor.to_path_buf()).or_insert(Node::Folder);
		}
	}

	/// Adds or replaces a file, creating its parent folders.
	pub fn insert_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			self.insert_folder(parent);
		}
		self.nodes
			.borrow_mut()
			.insert(path.to_path_buf(), Node::File(contents.into()));
	}

	/// Removes `path` and everything beneath it.
	pub fn remove(&self, path: impl AsRef<Path>) {
		let path = path.as_ref();
		self.nodes.borrow_mut().retain(|p, _| !p.starts_with(path));
	}

	pub fn contains(&self, path: impl AsRef<Path>) -> bool {
		self.nodes.borrow().contains_key(path.as_ref())
	}
}

fn not_found(path: &Path) -> io::Error {
	io::Error::new(
		io::ErrorKind::NotFound,
		format!("{} does not exist", path.display()),
	)
}

#[async_trait(?Send)]
impl VaultFs for MemoryVault {
	async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		let nodes = self.nodes.borrow();
		match nodes.get(path) {
			Some(Node::Folder) => {}
			Some(Node::File(_)) => {
				return Err(io::Error::other(format!("{} is not a folder", path.display())));
			}
			None => return Err(not_found(path)),
		}
		Ok(nodes
			.iter()
			.filter(|(p, _)| p.parent() == Some(path))
			.filter_map(|(p, node)| {
				let name = p.file_name()?.to_string_lossy().into_owned();
				let kind = match node {
					Node::Folder => ItemKind::Folder,
					Node::File(_) => ItemKind::File,
				};
				Some(DirEntry { name, kind })
			})
			.collect())
	}

	async fn read_to_string(&self, path: &Path) -> io::Result<String> {
		match self.nodes.borrow().get(path) {
			Some(Node::File(contents)) => Ok(contents.clone()),
			Some(Node::Folder) => Err(io::Error::other(format!("{} is a folder", path.display()))),
			None => Err(not_found(path)),
		}
	}

	async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		match path.parent().map(|p| self.nodes.borrow().get(p).cloned()) {
			Some(Some(Node::Folder)) => {}
			_ => return Err(not_found(path.parent().unwrap_or(path))),
		}
		self.nodes
			.borrow_mut()
			.insert(path.to_path_buf(), Node::File(contents.to_string()));
		Ok(())
	}

	async fn create_dir(&self, path: &Path) -> io::Result<()> {
		let mut nodes = self.nodes.borrow_mut();
		if nodes.contains_key(path) {
			return Err(io::Error::new(
				io::ErrorKind::AlreadyExists,
				format!("{} already exists", path.display()),
			));
		}
		match path.parent().and_then(|p| nodes.get(p)) {
			Some(Node::Folder) => {}
			_ => return Err(not_found(path.parent().unwrap_or(path))),
		}
		nodes.insert(path.to_path_buf(), Node::Folder);
		Ok(())
	}
}

/// Reads a real directory with `std::fs`. Entries are listed in name order
/// so loads are reproducible across platforms.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct StdVault;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl VaultFs for StdVault {
	async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		let mut entries = Vec::new();
		for entry in std::fs::read_dir(path)? {
			let entry = entry?;
			let file_type = entry.file_type()?;
			let kind = if file_type.is_dir() {
				ItemKind::Folder
			} else if file_type.is_file() {
				ItemKind::File
			} else {
				continue;
			};
			entries.push(DirEntry {
				name: entry.file_name().to_string_lossy().into_owned(),
				kind,
			});
		}
		entries.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(entries)
	}

	async fn read_to_string(&self, path: &Path) -> io::Result<String> {
		std::fs::read_to_string(path)
	}

	async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		std::fs::write(path, contents)
	}

	async fn create_dir(&self, path: &Path) -> io::Result<()> {
		std::fs::create_dir(path)
	}
}
