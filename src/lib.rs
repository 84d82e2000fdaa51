//! research-canvas: interactive canvas for a folder-based research graph.
//!
//! A research directory holds one folder per vertex, each with a YAML
//! descriptor and per-language Markdown content. This crate loads and
//! validates that directory into an immutable graph and renders it on a
//! pan/zoom canvas where vertices can be selected, previewed and created.

use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info, warn};

pub mod browser;
pub mod components;
pub mod config;
pub mod error;
pub mod graph;

pub use components::{CanvasAction, GraphCanvas, VertexPreview};
pub use config::CanvasConfig;
pub use error::{GraphError, GraphResult, Severity};
pub use graph::{Graph, GraphSession, Host, MemoryVault, VaultFs, VertexContent};

use browser::BrowserHost;

type Session = GraphSession<MemoryVault, BrowserHost>;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("research-canvas: logging initialized");
}

/// Publishes the session's graph and keeps the label language valid for it.
fn publish(session: &Session, graph: RwSignal<Option<Arc<Graph>>>, language: RwSignal<String>) {
	let current = session.graph();
	if let Some(g) = &current {
		if !g.languages.all.contains(&language.get_untracked()) {
			language.set(g.languages.default.clone());
		}
	}
	graph.set(current);
}

async fn handle_action(
	session: Rc<Session>,
	action: CanvasAction,
	graph: RwSignal<Option<Arc<Graph>>>,
	language: RwSignal<String>,
	preview: RwSignal<Option<VertexContent>>,
) {
	match action {
		CanvasAction::Preview(uuid) => {
			match session.vertex_content(uuid, &language.get_untracked()).await {
				Ok(content) => preview.set(Some(content)),
				Err(e) => {
					warn!("research-canvas: preview failed: {e}");
					session.host().notify(e.severity(), &e.to_string());
				}
			}
		}
		CanvasAction::CreateVertex { x, y } => {
			if session.create_vertex(x, y).await.is_ok() {
				publish(&session, graph, language);
			}
		}
		CanvasAction::None | CanvasAction::Redraw => {}
	}
}

/// Main application component.
/// Opens the embedded research directory and shows it on the canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = browser::load_config();
	let snapshot = browser::load_vault_snapshot();
	let root = snapshot.as_ref().map(|s| s.root.clone());
	let vault = snapshot
		.as_ref()
		.map(MemoryVault::from_snapshot)
		.unwrap_or_default();
	let session: Rc<Session> = Rc::new(GraphSession::new(
		vault,
		BrowserHost::new(root),
		config.clone(),
	));

	let graph = RwSignal::new(None::<Arc<Graph>>);
	let language = RwSignal::new(String::from("en"));
	let preview = RwSignal::new(None::<VertexContent>);
	let (action, set_action) = signal(None::<CanvasAction>);

	let session_open = session.clone();
	let open = move || {
		let session = session_open.clone();
		spawn_local(async move {
			if let Ok(Some(_)) = session.open().await {
				publish(&session, graph, language);
			}
		});
	};
	open();

	let session_actions = session.clone();
	Effect::new(move |_| {
		let Some(action) = action.get() else {
			return;
		};
		spawn_local(handle_action(
			session_actions.clone(),
			action,
			graph,
			language,
			preview,
		));
	});

	let session_reload = session.clone();
	let on_reload = move |_| {
		let session = session_reload.clone();
		spawn_local(async move {
			if session.reload().await.is_ok() {
				publish(&session, graph, language);
			}
		});
	};

	let session_close = session;
	let on_close = move |_| {
		if session_close.close() {
			preview.set(None);
			graph.set(None);
		}
	};

	let languages = move || {
		graph.with(|g| {
			g.as_ref()
				.map(|g| g.languages.all.clone())
				.unwrap_or_default()
		})
	};
	let title = move || {
		graph.with(|g| match g {
			Some(g) => format!("{} vertices", g.vertices().len()),
			None => "No graph open".to_string(),
		})
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Research Canvas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphCanvas graph=graph language=language actions=set_action config=config />
			<div class="graph-overlay">
				<h1>"Research Canvas"</h1>
				<p class="subtitle">{title}</p>
				<div class="toolbar">
					<button on:click=move |_| open()>"Open"</button>
					<button on:click=on_reload>"Reload"</button>
					<button on:click=on_close>"Close"</button>
					<select
						prop:value=move || language.get()
						on:change=move |ev| language.set(event_target_value(&ev))
					>
						<For
							each=languages
							key=|lang| lang.clone()
							children=move |lang: String| {
								view! { <option value=lang.clone()>{lang.clone()}</option> }
							}
						/>
					</select>
				</div>
				<p class="subtitle">
					"Double-click to create or preview. Middle-drag to pan. Scroll to zoom."
				</p>
			</div>
			<VertexPreview content=preview on_close=Callback::new(move |_| preview.set(None)) />
		</div>
	}
}
