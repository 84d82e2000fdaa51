//! Pan and zoom transform between canvas pixels and graph coordinates.
//!
//! The transform is `screen = graph * scale + offset`. The renderer applies
//! it once per frame on the drawing context; pointer events go through the
//! inverse, [`Viewport::to_graph_coords`].

use crate::config::CanvasConfig;

/// A position in either screen pixels or graph units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
	#[default]
	Default,
	Pan,
}

impl CursorMode {
	pub fn css_cursor(self) -> &'static str {
		match self {
			CursorMode::Default => "auto",
			CursorMode::Pan => "grabbing",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
	In,
	Out,
}

impl ZoomDirection {
	/// Wheel deltas below zero scroll up, which zooms in.
	pub fn from_wheel_delta(delta_y: f64) -> Self {
		if delta_y < 0.0 {
			ZoomDirection::In
		} else {
			ZoomDirection::Out
		}
	}
}

/// Graph-space rectangle currently visible on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

#[derive(Clone, Debug)]
pub struct Viewport {
	/// Zoom factor; always strictly positive.
	pub scale: f64,
	/// Pixel position of the graph origin.
	pub offset: Point,
	pub width: f64,
	pub height: f64,
	pub cursor_mode: CursorMode,
	last_pointer: Point,
	zoom_factor: f64,
	min_scale: f64,
	max_scale: f64,
}

impl Viewport {
	/// A 1:1 viewport with the graph origin at the canvas center. Unusable
	/// zoom settings in `config` fall back to their defaults.
	pub fn new(width: f64, height: f64, config: &CanvasConfig) -> Self {
		let config = config.clone().sanitized();
		Self {
			scale: 1.0,
			offset: Point::new(width / 2.0, height / 2.0),
			width,
			height,
			cursor_mode: CursorMode::Default,
			last_pointer: Point::default(),
			zoom_factor: config.zoom_factor,
			min_scale: config.min_scale,
			max_scale: config.max_scale,
		}
	}

	/// Canvas pixel to graph coordinates.
	pub fn to_graph_coords(&self, px: f64, py: f64) -> Point {
		Point::new(
			(px - self.offset.x) / self.scale,
			(py - self.offset.y) / self.scale,
		)
	}

	/// Inverse of [`Viewport::to_graph_coords`].
	pub fn to_screen_coords(&self, gx: f64, gy: f64) -> Point {
		Point::new(
			gx * self.scale + self.offset.x,
			gy * self.scale + self.offset.y,
		)
	}

	/// Zooms one step while keeping the graph point under `(px, py)` fixed.
	pub fn zoom_at(&mut self, px: f64, py: f64, direction: ZoomDirection) {
		let target = match direction {
			ZoomDirection::In => self.scale * self.zoom_factor,
			ZoomDirection::Out => self.scale / self.zoom_factor,
		};
		let new_scale = target.clamp(self.min_scale, self.max_scale);
		if !(new_scale.is_finite() && new_scale > 0.0) {
			return;
		}
		let ratio = new_scale / self.scale;
		self.offset.x = px - (px - self.offset.x) * ratio;
		self.offset.y = py - (py - self.offset.y) * ratio;
		self.scale = new_scale;
	}

	/// Shifts the view by a pixel delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.offset.x += dx;
		self.offset.y += dy;
	}

	/// Enters pan mode with `(px, py)` as the first sample.
	pub fn begin_pan(&mut self, px: f64, py: f64) {
		self.cursor_mode = CursorMode::Pan;
		self.last_pointer = Point::new(px, py);
	}

	/// Pans by the distance moved since the previous sample. Returns whether
	/// the view changed.
	pub fn pan_to(&mut self, px: f64, py: f64) -> bool {
		if self.cursor_mode != CursorMode::Pan {
			return false;
		}
		let (dx, dy) = (px - self.last_pointer.x, py - self.last_pointer.y);
		self.last_pointer = Point::new(px, py);
		self.pan_by(dx, dy);
		dx != 0.0 || dy != 0.0
	}

	/// Leaves pan mode; later samples are ignored.
	pub fn end_pan(&mut self) {
		self.cursor_mode = CursorMode::Default;
	}

	/// Applies new canvas dimensions and re-centers the graph origin.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.offset = Point::new(width / 2.0, height / 2.0);
	}

	/// Graph-space rectangle covered by the canvas.
	pub fn visible_bounds(&self) -> Bounds {
		let top_left = self.to_graph_coords(0.0, 0.0);
		let bottom_right = self.to_graph_coords(self.width, self.height);
		Bounds {
			left: top_left.x,
			top: top_left.y,
			right: bottom_right.x,
			bottom: bottom_right.y,
		}
	}
}

/// Coalesces bursts of resize events.
///
/// Every event calls [`ResizeDebouncer::schedule`] and arms a timer with
/// the returned ticket. When a timer fires, only the ticket from the most
/// recent schedule is still current.
#[derive(Clone, Debug, Default)]
pub struct ResizeDebouncer {
	generation: u64,
}

impl ResizeDebouncer {
	pub fn schedule(&mut self) -> u64 {
		self.generation = self.generation.wrapping_add(1);
		self.generation
	}

	pub fn is_current(&self, ticket: u64) -> bool {
		ticket == self.generation
	}
}
