//! Side panel showing one vertex's content file.

use leptos::prelude::*;

use crate::graph::VertexContent;

/// Shows the title, source path and raw body of a vertex. Renders nothing
/// while `content` is `None`.
#[component]
pub fn VertexPreview(
	#[prop(into)] content: Signal<Option<VertexContent>>,
	on_close: Callback<()>,
) -> impl IntoView {
	move || {
		content.get().map(|c| {
			let heading = if c.title.is_empty() {
				c.uuid.to_string()
			} else {
				c.title.clone()
			};
			view! {
				<aside class="vertex-preview" lang=c.language.clone()>
					<header>
						<h2>{heading}</h2>
						<button class="close" title="Close" on:click=move |_| on_close.run(())>
							"×"
						</button>
					</header>
					<p class="path">{c.path.display().to_string()}</p>
					<pre class="body">{c.body.clone()}</pre>
				</aside>
			}
		})
	}
}
