//! Leptos component wrapping the graph canvas.
//!
//! The component creates an HTML canvas sized to its parent and wires mouse
//! and wheel handlers into [`CanvasInput`]. There is no animation loop: a
//! frame is painted synchronously whenever an input event, a new graph, or
//! a language change asks for one.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::interaction::{CanvasAction, CanvasInput, PointerButton};
use super::render::{self, Frame};
use super::theme::{TOKENS, Theme};
use super::viewport::ResizeDebouncer;
use crate::config::CanvasConfig;
use crate::graph::Graph;

/// Drawing context plus the interaction state painted through it.
struct CanvasContext {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	input: CanvasInput,
	theme: Theme,
	debouncer: ResizeDebouncer,
}

impl CanvasContext {
	fn paint(&self, graph: Option<&Graph>, language: &str, grid_min_scale: f64) {
		render::render(
			&self.ctx,
			&Frame {
				graph,
				viewport: &self.input.viewport,
				selection: &self.input.selection,
				theme: &self.theme,
				language,
				grid_min_scale,
			},
		);
	}

	fn sync_cursor(&self) {
		let cursor = self.input.viewport.cursor_mode.css_cursor();
		let _ = web_sys::HtmlElement::style(&self.canvas).set_property("cursor", cursor);
	}
}

/// Everything an event handler needs to apply input and repaint.
#[derive(Clone)]
struct Handle {
	context: Rc<RefCell<Option<CanvasContext>>>,
	graph: Signal<Option<Arc<Graph>>>,
	language: Signal<String>,
	actions: WriteSignal<Option<CanvasAction>>,
	grid_min_scale: f64,
}

impl Handle {
	/// Runs `f` against the input state and carries out the resulting
	/// action. Returns whether the event was consumed.
	fn apply(&self, f: impl FnOnce(&mut CanvasInput, Option<&Graph>) -> CanvasAction) -> bool {
		let mut guard = self.context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return false;
		};
		let graph = self.graph.get_untracked();
		let action = f(&mut c.input, graph.as_deref());
		c.sync_cursor();
		match action {
			CanvasAction::None => return false,
			CanvasAction::Redraw => {
				c.paint(
					graph.as_deref(),
					&self.language.get_untracked(),
					self.grid_min_scale,
				);
			}
			other => self.actions.set(Some(other)),
		}
		true
	}
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// The preset named by the root element's `data-theme`, with any tokens
/// the page defines as CSS custom properties applied on top.
fn document_theme(canvas: &HtmlCanvasElement) -> Theme {
	let window = web_sys::window();
	let name = window
		.as_ref()
		.and_then(|w| w.document())
		.and_then(|d| d.document_element())
		.and_then(|root| root.get_attribute("data-theme"));
	let mut theme = Theme::named(name.as_deref());
	let Some(style) = window.and_then(|w| w.get_computed_style(canvas).ok().flatten()) else {
		return theme;
	};
	for &token in TOKENS {
		if let Ok(value) = style.get_property_value(token) {
			theme.set(token, &value);
		}
	}
	theme
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the open graph on a canvas element.
///
/// Clicking selects, middle-dragging pans, and the wheel zooms around the
/// pointer. Double-clicks are reported through `actions` as a preview
/// request on a vertex or a create request on empty space.
#[component]
pub fn GraphCanvas(
	#[prop(into)] graph: Signal<Option<Arc<Graph>>>,
	#[prop(into)] language: Signal<String>,
	actions: WriteSignal<Option<CanvasAction>>,
	#[prop(optional)] config: CanvasConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<CanvasContext>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let handle = Handle {
		context: context.clone(),
		graph,
		language,
		actions,
		grid_min_scale: config.grid_min_scale,
	};
	let debounce = Duration::from_millis(config.resize_debounce_ms);

	let (handle_init, resize_cb_init) = (handle.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|o| o.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("research-canvas: 2d context unavailable");
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let c = CanvasContext {
			theme: document_theme(&canvas),
			canvas: canvas.clone(),
			ctx,
			input: CanvasInput::new(w, h, &config),
			debouncer: ResizeDebouncer::default(),
		};
		c.paint(
			graph.get_untracked().as_deref(),
			&language.get_untracked(),
			handle_init.grid_min_scale,
		);
		*handle_init.context.borrow_mut() = Some(c);

		let handle_resize = handle_init.clone();
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let ticket = match handle_resize.context.borrow_mut().as_mut() {
				Some(c) => c.debouncer.schedule(),
				None => return,
			};
			let handle_fire = handle_resize.clone();
			set_timeout(
				move || {
					let mut guard = handle_fire.context.borrow_mut();
					let Some(c) = guard.as_mut() else {
						return;
					};
					if !c.debouncer.is_current(ticket) {
						return;
					}
					let (w, h) = parent_size(&c.canvas);
					c.canvas.set_width(w as u32);
					c.canvas.set_height(h as u32);
					c.input.viewport.resize(w, h);
					debug!("research-canvas: resized to {w}x{h}");
					c.paint(
						handle_fire.graph.get_untracked().as_deref(),
						&handle_fire.language.get_untracked(),
						handle_fire.grid_min_scale,
					);
				},
				debounce,
			);
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb_init.borrow().as_ref()) {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let context_graph = context.clone();
	let grid_min_scale = handle.grid_min_scale;
	Effect::new(move |_| {
		let current = graph.get();
		let language = language.get();
		if let Some(c) = context_graph.borrow_mut().as_mut() {
			c.input.selection.retain_in(current.as_deref());
			c.paint(current.as_deref(), &language, grid_min_scale);
		}
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let button = PointerButton::from_dom(ev.button());
		if button == PointerButton::Middle {
			// Suppress the browser's autoscroll.
			ev.prevent_default();
		}
		handle_md.apply(|input, graph| input.pointer_down(graph, button, x, y));
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			handle_mm.apply(|input, _| input.pointer_move(x, y));
		}
	};

	let handle_mu = handle.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let button = PointerButton::from_dom(ev.button());
		handle_mu.apply(|input, _| input.pointer_up(button));
	};

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		handle_ml.apply(|input, _| {
			input.pointer_leave();
			CanvasAction::None
		});
	};

	let handle_dc = handle.clone();
	let on_dblclick = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			handle_dc.apply(|input, graph| input.double_click(graph, x, y));
		}
	};

	let handle_wh = handle;
	let on_wheel = move |ev: WheelEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let (delta, ctrl) = (ev.delta_y(), ev.ctrl_key());
		if handle_wh.apply(|input, _| input.wheel(x, y, delta, ctrl)) {
			ev.prevent_default();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block;"
		/>
	}
}
