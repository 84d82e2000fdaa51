//! Error taxonomy for graph loading and mutation.
//!
//! Only graph-level failures are errors. Problems with a single vertex or a
//! single language file are absorbed by the loader as [`SkipReason`]s.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// How a failure should be surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
	/// The user asked for something the graph cannot do right now.
	Warning,
	/// Storage or serialization failed underneath the operation.
	Error,
}

/// Failures that abort an open, reload, or mutation as a whole.
#[derive(Error, Debug)]
pub enum GraphError {
	#[error("No graph is currently open")]
	NotOpen,

	/// An open, reload or create is still running on this session.
	#[error("Another graph operation is already in progress")]
	Busy,

	/// The chosen directory has no `.research` entry.
	#[error("The .research item is missing in {0}")]
	MissingMetadataFolder(PathBuf),

	#[error("The .research item is not a folder in {0}")]
	MetadataNotFolder(PathBuf),

	#[error("The graph.yaml file is missing in {0}")]
	MissingGraphDescriptor(PathBuf),

	/// `graph.yaml` is not YAML, or its top level is not a mapping.
	#[error("The graph.yaml file is not a valid YAML object: {0}")]
	UnparsableGraphDescriptor(String),

	#[error("The graph.yaml file does not match the required schema: {0}")]
	InvalidGraphDescriptor(#[from] SchemaError),

	/// The configured type tag or content extension cannot produce a
	/// loadable vertex. Nothing is written.
	#[error("The new vertex settings are invalid: {0}")]
	InvalidVertexTemplate(SchemaError),

	#[error("Vertex not found: {0}")]
	VertexNotFound(Uuid),

	#[error("Serialization error: {0}")]
	Serialize(#[from] serde_yaml::Error),

	/// A vault read or write failed at `path`.
	#[error("IO error at {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl GraphError {
	pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	/// Graph-level precondition failures are warnings; I/O and internal
	/// failures are errors.
	pub fn severity(&self) -> Severity {
		match self {
			GraphError::Io { .. } | GraphError::Serialize(_) => Severity::Error,
			_ => Severity::Warning,
		}
	}
}

/// A descriptor or header that parsed but violates its schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
	#[error("field `{field}` is invalid: {reason}")]
	Field { field: &'static str, reason: String },

	#[error("`{0}` is not an ISO 639-1 language code")]
	Language(String),

	#[error("default language `{0}` is not listed in languages.all")]
	DefaultLanguage(String),

	#[error("{0}")]
	Shape(String),
}

impl SchemaError {
	pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
		Self::Field {
			field,
			reason: reason.into(),
		}
	}
}

/// Why a vertex folder was left out of the graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
	#[error("descriptor graph.yaml is missing")]
	MissingDescriptor,

	#[error("descriptor is not a YAML object")]
	UnparsableDescriptor,

	#[error("descriptor does not match the schema: {0}")]
	InvalidDescriptor(String),

	#[error("vertex belongs to graph {found}, expected {expected}")]
	ForeignGraph { expected: Uuid, found: Uuid },

	#[error("no readable language content file")]
	NoContent,

	#[error("uuid {0} is already used by another vertex")]
	DuplicateUuid(Uuid),
}

pub type GraphResult<T> = Result<T, GraphError>;
