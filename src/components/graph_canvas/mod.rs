//! Pan/zoom canvas view of a research graph.
//!
//! Renders vertices as icon glyphs on circular backgrounds with titles
//! below, and edges as straight lines (dashed for siblings, arrowed for
//! parents) over a dot grid.
//!
//! # Example
//!
//! ```ignore
//! let (action, set_action) = signal(None::<CanvasAction>);
//! view! { <GraphCanvas graph=graph language="en".to_string() actions=set_action /> }
//! ```

mod component;
pub mod interaction;
pub mod metrics;
pub mod render;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use component::GraphCanvas;
pub use interaction::{CanvasAction, CanvasInput, PointerButton, Selection};
pub use theme::Theme;
pub use viewport::{CursorMode, Viewport, ZoomDirection};
