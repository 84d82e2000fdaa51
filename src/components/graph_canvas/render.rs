//! Canvas rendering for the graph.
//!
//! One frame is drawn in passes so the z-order is fixed:
//! 1. Clear (screen space)
//! 2. Grid and origin crosshair
//! 3. Edges, then arrowheads on parent edges
//! 4. Icon backgrounds and glyphs, covering the edge stubs
//! 5. Labels
//!
//! Passes 2-5 run in graph space under a single viewport transform.

use super::interaction::Selection;
use super::metrics::{
	ARROW_ANGLE, ARROW_LENGTH, CROSSHAIR_EXTENT, CROSSHAIR_WIDTH, GRID_DOT_RADIUS, GRID_SPACING,
	ICON_GLYPH_NUDGE, LABEL_ELLIPSIS, LABEL_FONT, LABEL_MAX_CHARS, SIBLING_DASH, icon_font,
	icon_radius, label_offset,
};
use super::surface::Surface;
use super::theme::Theme;
use super::viewport::{Point, Viewport};
use crate::graph::{Edge, Graph, Vertex};

/// Everything one frame depends on.
pub struct Frame<'a> {
	pub graph: Option<&'a Graph>,
	pub viewport: &'a Viewport,
	pub selection: &'a Selection,
	pub theme: &'a Theme,
	/// Language labels are shown in.
	pub language: &'a str,
	pub grid_min_scale: f64,
}

pub fn render<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>) {
	let view = frame.viewport;
	surface.clear_rect(0.0, 0.0, view.width, view.height);

	surface.save();
	surface.translate(view.offset.x, view.offset.y);
	surface.scale(view.scale, view.scale);

	draw_grid(surface, frame);
	if let Some(graph) = frame.graph {
		draw_edges(surface, frame, graph);
		draw_icons(surface, frame, graph);
		draw_labels(surface, frame, graph);
	}

	surface.restore();
}

fn draw_grid<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>) {
	surface.begin_path();
	surface.move_to(-CROSSHAIR_EXTENT, 0.0);
	surface.line_to(CROSSHAIR_EXTENT, 0.0);
	surface.move_to(0.0, -CROSSHAIR_EXTENT);
	surface.line_to(0.0, CROSSHAIR_EXTENT);
	surface.set_line_width(CROSSHAIR_WIDTH);
	surface.set_stroke_style(&frame.theme.resolve("--warning"));
	surface.stroke();

	if frame.viewport.scale < frame.grid_min_scale {
		return;
	}

	let bounds = frame.viewport.visible_bounds();
	let first = |v: f64| (v / GRID_SPACING).floor() as i64;
	let last = |v: f64| (v / GRID_SPACING).ceil() as i64;

	surface.set_fill_style(&frame.theme.resolve("--border"));
	for i in first(bounds.left)..=last(bounds.right) {
		for j in first(bounds.top)..=last(bounds.bottom) {
			if i == 0 && j == 0 {
				continue;
			}
			surface.begin_path();
			surface.arc(
				i as f64 * GRID_SPACING,
				j as f64 * GRID_SPACING,
				GRID_DOT_RADIUS,
			);
			surface.fill();
		}
	}
}

/// Token an edge is stroked with, given the current selection. A selected
/// source highlights any edge; siblings also light up from their target.
fn edge_color<'a>(edge: &'a Edge, selection: &Selection) -> &'a str {
	let touched = selection.is_selected(&edge.from)
		|| (edge.is_sibling() && selection.is_selected(&edge.to));
	if touched {
		"--tertiary"
	} else {
		&edge.canvas.color
	}
}

fn draw_edges<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>, graph: &Graph) {
	for edge in graph.edges() {
		let Some((from, to)) = graph.endpoints(edge) else {
			continue;
		};
		let color = frame.theme.resolve(edge_color(edge, frame.selection));
		let dash: &[f64] = if edge.is_sibling() { &SIBLING_DASH } else { &[] };

		surface.begin_path();
		surface.set_line_dash(dash);
		surface.move_to(from.canvas.x, from.canvas.y);
		surface.line_to(to.canvas.x, to.canvas.y);
		surface.set_stroke_style(&color);
		surface.set_line_width(edge.canvas.width);
		surface.stroke();
		surface.set_line_dash(&[]);

		if !edge.is_parent() {
			continue;
		}
		let target_size = graph.style_of(to).size;
		if let Some([tip, left, right]) = arrowhead(from, to, target_size) {
			surface.begin_path();
			surface.move_to(tip.x, tip.y);
			surface.line_to(left.x, left.y);
			surface.move_to(tip.x, tip.y);
			surface.line_to(right.x, right.y);
			surface.stroke();
		}
	}
}

/// Tip and the two arm ends of a parent-edge arrowhead. The tip sits on the
/// target's icon background circle. `None` when the endpoints coincide.
pub fn arrowhead(from: &Vertex, to: &Vertex, target_size: f64) -> Option<[Point; 3]> {
	let (dx, dy) = (to.canvas.x - from.canvas.x, to.canvas.y - from.canvas.y);
	let distance = dx.hypot(dy);
	if !(distance > 0.0 && distance.is_finite()) {
		return None;
	}
	let (ux, uy) = (dx / distance, dy / distance);
	let pull = icon_radius(target_size);
	let tip = Point::new(to.canvas.x - ux * pull, to.canvas.y - uy * pull);

	let arm = |angle: f64| {
		let (sin, cos) = angle.sin_cos();
		Point::new(
			tip.x - ARROW_LENGTH * (ux * cos - uy * sin),
			tip.y - ARROW_LENGTH * (uy * cos + ux * sin),
		)
	};
	Some([tip, arm(ARROW_ANGLE), arm(-ARROW_ANGLE)])
}

fn draw_icons<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>, graph: &Graph) {
	let theme = frame.theme;
	for vertex in graph.vertices() {
		let style = graph.style_of(vertex);
		let (x, y) = (vertex.canvas.x, vertex.canvas.y);
		let background = if frame.selection.is_selected(&vertex.uuid) {
			"--container"
		} else {
			"--background"
		};

		surface.begin_path();
		surface.arc(x, y, icon_radius(style.size));
		surface.set_fill_style(&theme.resolve(background));
		surface.fill();
		if let Some(stroke) = &style.stroke {
			surface.set_stroke_style(&theme.resolve(stroke));
			surface.set_line_width(1.0);
			surface.stroke();
		}

		surface.set_font(&icon_font(style.library.font_family(), style.size));
		surface.set_fill_style(&theme.resolve(&style.fill));
		surface.set_text_align("center");
		surface.set_text_baseline("middle");
		surface.fill_text(&style.icon, x, y + ICON_GLYPH_NUDGE);
	}
}

/// Unselected titles longer than the limit are cut and get an ellipsis.
pub fn label_text(title: &str, selected: bool) -> String {
	if selected || title.chars().count() <= LABEL_MAX_CHARS {
		return title.to_string();
	}
	let cut: String = title.chars().take(LABEL_MAX_CHARS).collect();
	format!("{}{LABEL_ELLIPSIS}", cut.trim())
}

fn draw_labels<S: Surface + ?Sized>(surface: &S, frame: &Frame<'_>, graph: &Graph) {
	surface.set_font(LABEL_FONT);
	surface.set_text_align("left");
	surface.set_text_baseline("alphabetic");
	for vertex in graph.vertices() {
		let selected = frame.selection.is_selected(&vertex.uuid);
		let title = vertex.title_in(frame.language, &graph.languages.default);
		let text = label_text(title, selected);
		let size = graph.style_of(vertex).size;

		surface.set_fill_style(&frame.theme.resolve(if selected { "--font" } else { "--muted" }));
		let width = surface.measure_text(&text).floor();
		surface.fill_text(
			&text,
			vertex.canvas.x - width / 2.0,
			vertex.canvas.y + label_offset(size),
		);
	}
}
