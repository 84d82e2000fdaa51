//! Pointer input: hit-testing, selection, panning and zoom.
//!
//! [`CanvasInput`] turns raw pointer events into viewport changes and
//! [`CanvasAction`]s. It never touches the DOM, so the component only has
//! to translate `web_sys` events into calls here and act on the result.

use uuid::Uuid;

use super::viewport::{Viewport, ZoomDirection};
use crate::config::{CanvasConfig, WheelModifier};
use crate::graph::Graph;

/// What the canvas asks of its owner after an input event.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasAction {
	None,
	Redraw,
	/// Open the preview for a vertex.
	Preview(Uuid),
	/// Author a new vertex at graph coordinates.
	CreateVertex { x: f64, y: f64 },
}

/// Mouse button of a pointer event, independent of the DOM numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	Middle,
	Secondary,
	Other,
}

impl PointerButton {
	/// Maps `MouseEvent.button`.
	pub fn from_dom(button: i16) -> Self {
		match button {
			0 => PointerButton::Primary,
			1 => PointerButton::Middle,
			2 => PointerButton::Secondary,
			_ => PointerButton::Other,
		}
	}
}

/// At most one selected vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection(Option<Uuid>);

impl Selection {
	/// The selected vertex, if any.
	pub fn current(&self) -> Option<Uuid> {
		self.0
	}

	/// Whether `uuid` is the selected vertex.
	pub fn is_selected(&self, uuid: &Uuid) -> bool {
		self.0.as_ref() == Some(uuid)
	}

	/// Selects `uuid`, replacing any previous selection.
	pub fn select(&mut self, uuid: Uuid) {
		self.0 = Some(uuid);
	}

	/// Deselects.
	pub fn clear(&mut self) {
		self.0 = None;
	}

	/// Drops the selection if its vertex is no longer in `graph`.
	pub fn retain_in(&mut self, graph: Option<&Graph>) {
		let stale = self
			.0
			.is_some_and(|uuid| graph.and_then(|g| g.vertex(&uuid)).is_none());
		if stale {
			self.0 = None;
		}
	}
}

/// First vertex whose icon circle contains graph point `(gx, gy)`.
pub fn hit_test(graph: &Graph, gx: f64, gy: f64) -> Option<Uuid> {
	graph
		.vertices()
		.iter()
		.find(|v| {
			let size = graph.style_of(v).size;
			let (dx, dy) = (gx - v.canvas.x, gy - v.canvas.y);
			dx * dx + dy * dy < size * size
		})
		.map(|v| v.uuid)
}

/// Viewport and selection state driven by pointer and wheel events.
///
/// Handlers take canvas pixel coordinates and return the [`CanvasAction`]
/// the owner should carry out. Nothing here touches the DOM.
#[derive(Clone, Debug)]
pub struct CanvasInput {
	pub viewport: Viewport,
	pub selection: Selection,
	wheel_modifier: WheelModifier,
}

impl CanvasInput {
	/// Fresh state for a `width` x `height` canvas with nothing selected.
	pub fn new(width: f64, height: f64, config: &CanvasConfig) -> Self {
		Self {
			viewport: Viewport::new(width, height, config),
			selection: Selection::default(),
			wheel_modifier: config.wheel_zoom_modifier,
		}
	}

	/// Primary selects the vertex under the pointer or clears the
	/// selection. Middle starts a pan.
	pub fn pointer_down(
		&mut self,
		graph: Option<&Graph>,
		button: PointerButton,
		px: f64,
		py: f64,
	) -> CanvasAction {
		match button {
			PointerButton::Primary => {
				let p = self.viewport.to_graph_coords(px, py);
				match graph.and_then(|g| hit_test(g, p.x, p.y)) {
					Some(uuid) => self.selection.select(uuid),
					None => self.selection.clear(),
				}
				CanvasAction::Redraw
			}
			PointerButton::Middle => {
				self.viewport.begin_pan(px, py);
				CanvasAction::None
			}
			_ => CanvasAction::None,
		}
	}

	/// Releasing the middle button ends the pan.
	pub fn pointer_up(&mut self, button: PointerButton) -> CanvasAction {
		if button == PointerButton::Middle {
			self.viewport.end_pan();
		}
		CanvasAction::None
	}

	/// Continues a pan; redraws only when the view moved.
	pub fn pointer_move(&mut self, px: f64, py: f64) -> CanvasAction {
		if self.viewport.pan_to(px, py) {
			CanvasAction::Redraw
		} else {
			CanvasAction::None
		}
	}

	/// Leaving the canvas ends any pan, since the release is never seen.
	pub fn pointer_leave(&mut self) {
		self.viewport.end_pan();
	}

	/// Previews the vertex under the pointer, or asks for a new vertex
	/// there when nothing is hit.
	pub fn double_click(&mut self, graph: Option<&Graph>, px: f64, py: f64) -> CanvasAction {
		let Some(graph) = graph else {
			return CanvasAction::None;
		};
		let p = self.viewport.to_graph_coords(px, py);
		match hit_test(graph, p.x, p.y) {
			Some(uuid) => CanvasAction::Preview(uuid),
			None => CanvasAction::CreateVertex {
				x: p.x.round(),
				y: p.y.round(),
			},
		}
	}

	/// Zooms around the pointer. Returns [`CanvasAction::None`] when the
	/// configured modifier is not held, so the page may scroll instead.
	pub fn wheel(&mut self, px: f64, py: f64, delta_y: f64, ctrl: bool) -> CanvasAction {
		if self.wheel_modifier == WheelModifier::Ctrl && !ctrl {
			return CanvasAction::None;
		}
		if delta_y == 0.0 {
			return CanvasAction::None;
		}
		self.viewport
			.zoom_at(px, py, ZoomDirection::from_wheel_delta(delta_y));
		CanvasAction::Redraw
	}
}
