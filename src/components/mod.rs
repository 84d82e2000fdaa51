pub mod graph_canvas;
mod vertex_preview;

pub use graph_canvas::{CanvasAction, GraphCanvas};
pub use vertex_preview::VertexPreview;
