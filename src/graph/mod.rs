//! Graph construction pipeline.
//!
//! A base directory of vertex folders is read through a [`VaultFs`],
//! validated folder by folder, and assembled into an immutable [`Graph`].
//! [`GraphSession`] owns the published graph and serializes reloads.
//!
//! ```text
//! base/
//!   .research/graph.yaml        graph uuid, languages, per-type styles
//!   <vertex>/graph.yaml         uuid, type, canvas, edges
//!   <vertex>/index.<lang>.md    --- title, slug --- body
//! ```

pub mod descriptor;
pub mod loader;
pub mod model;
pub mod schema;
pub mod session;
pub mod style;
pub mod vault;

pub use loader::load_graph;
pub use model::{Edge, Graph, GraphItem, ItemKind, Languages, Vertex};
pub use session::{GraphSession, Host, VertexContent};
pub use style::{ResolvedStyle, VertexStyle};
#[cfg(not(target_arch = "wasm32"))]
pub use vault::StdVault;
pub use vault::{DirEntry, MemoryVault, VaultFs, VaultSnapshot};
