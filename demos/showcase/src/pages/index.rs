//! Landing page: links to every demo plus one fast boundary so the
//! root route exercises flight payloads and streaming alike.

use std::sync::Arc;

use rill_render::{BoundarySpec, Head, Page, ResolvedBoundary};

pub fn page() -> Arc<Page> {
    Arc::new(
        Page::new("Index")
            .with_head(Head::new().with_title("rill showcase"))
            .with_html(
                r#"<h1>rill showcase</h1><ul>
<li><a href="/streaming">Streaming</a></li>
<li><a href="/partial-hydration">Partial hydration</a></li>
<li><a href="/head">Head lint demo</a></li>
<li><a href="/head-with-json-ld-snippet">JSON-LD demo</a></li>
</ul>"#,
            )
            .with_boundary(BoundarySpec::new(
                "greeting",
                "<p>...</p>",
                || async { Ok(ResolvedBoundary::html("<p>Welcome.</p>")) },
            )),
    )
}
