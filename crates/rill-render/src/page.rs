//! Page model: head elements, parts and suspense boundaries.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use rill_core::RenderError;
use serde_json::Value;

/// MIME type of structured-data scripts exempt from head lint.
pub const JSON_LD_TYPE: &str = "application/ld+json";

/// A typed element of the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    /// Page title.
    Title(String),
    /// Meta tag.
    Meta {
        /// `name` attribute.
        name: String,
        /// `content` attribute.
        content: String,
    },
    /// External stylesheet link.
    Stylesheet {
        /// `href` attribute.
        href: String,
    },
    /// Inline CSS.
    InlineStyle(String),
    /// Script tag, external or inline.
    Script {
        /// `src` attribute, if external.
        src: Option<String>,
        /// `type` attribute, if any.
        script_type: Option<String>,
        /// Inline body, if any.
        body: Option<String>,
    },
}

impl HeadElement {
    /// Whether this is a JSON-LD structured-data script.
    pub fn is_json_ld(&self) -> bool {
        matches!(
            self,
            Self::Script {
                script_type: Some(t),
                ..
            } if t == JSON_LD_TYPE
        )
    }

    /// Render this element to HTML.
    pub fn render(&self) -> String {
        match self {
            Self::Title(t) => format!("<title>{t}</title>"),
            Self::Meta { name, content } => {
                format!(r#"<meta name="{name}" content="{content}">"#)
            }
            Self::Stylesheet { href } => {
                format!(r#"<link rel="stylesheet" href="{href}">"#)
            }
            Self::InlineStyle(css) => format!("<style>{css}</style>"),
            Self::Script {
                src,
                script_type,
                body,
            } => {
                let mut tag = String::from("<script");
                if let Some(t) = script_type {
                    tag.push_str(&format!(r#" type="{t}""#));
                }
                if let Some(s) = src {
                    tag.push_str(&format!(r#" src="{s}""#));
                }
                tag.push('>');
                if let Some(b) = body {
                    tag.push_str(b);
                }
                tag.push_str("</script>");
                tag
            }
        }
    }
}

/// Head content for a page, built from typed elements so the dev-mode
/// linter can classify them.
#[derive(Debug, Clone, Default)]
pub struct Head {
    elements: Vec<HeadElement>,
}

impl Head {
    /// Create empty head content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.elements.push(HeadElement::Title(title.into()));
        self
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.elements.push(HeadElement::Meta {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    /// Add an external stylesheet link.
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.elements
            .push(HeadElement::Stylesheet { href: href.into() });
        self
    }

    /// Add inline CSS.
    pub fn with_style(mut self, css: impl Into<String>) -> Self {
        self.elements.push(HeadElement::InlineStyle(css.into()));
        self
    }

    /// Add an external script.
    pub fn with_script_src(mut self, src: impl Into<String>) -> Self {
        self.elements.push(HeadElement::Script {
            src: Some(src.into()),
            script_type: None,
            body: None,
        });
        self
    }

    /// Add an inline script.
    pub fn with_inline_script(mut self, body: impl Into<String>) -> Self {
        self.elements.push(HeadElement::Script {
            src: None,
            script_type: None,
            body: Some(body.into()),
        });
        self
    }

    /// Add a JSON-LD structured-data snippet.
    pub fn with_json_ld(mut self, json: impl Into<String>) -> Self {
        self.elements.push(HeadElement::Script {
            src: None,
            script_type: Some(JSON_LD_TYPE.to_string()),
            body: Some(json.into()),
        });
        self
    }

    /// Typed elements, in declaration order.
    pub fn elements(&self) -> &[HeadElement] {
        &self.elements
    }

    /// Render head content to HTML.
    pub fn render(&self) -> String {
        self.elements.iter().map(HeadElement::render).collect()
    }
}

/// Outcome of one boundary's resolution.
#[derive(Debug, Clone)]
pub struct ResolvedBoundary {
    /// Resolved HTML replacing the fallback.
    pub html: String,
    /// Server-computed state to inline for hydration, if any.
    pub state: Option<Value>,
}

impl ResolvedBoundary {
    /// Resolved content without inline state.
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            state: None,
        }
    }

    /// Attach inline state.
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }
}

type ResolverFn = dyn Fn() -> BoxFuture<'static, Result<ResolvedBoundary, RenderError>>
    + Send
    + Sync;

/// A named suspense boundary: fallback markup plus an async resolver.
///
/// The resolver is a factory so one registered page can serve many
/// requests; each call produces a fresh resolution future.
#[derive(Clone)]
pub struct BoundarySpec {
    /// Boundary name, unique within the page.
    pub name: String,
    /// Fallback HTML shown while pending.
    pub fallback: String,
    resolver: Arc<ResolverFn>,
}

impl BoundarySpec {
    /// Create a boundary from a resolver closure.
    pub fn new<F, Fut>(name: impl Into<String>, fallback: impl Into<String>, resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResolvedBoundary, RenderError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            fallback: fallback.into(),
            resolver: Arc::new(move || Box::pin(resolver())),
        }
    }

    /// Start a fresh resolution.
    pub fn resolve(&self) -> BoxFuture<'static, Result<ResolvedBoundary, RenderError>> {
        (self.resolver)()
    }
}

impl std::fmt::Debug for BoundarySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundarySpec")
            .field("name", &self.name)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// One ordered part of a page body.
#[derive(Debug, Clone)]
pub enum PagePart {
    /// Static HTML, emitted with the shell.
    Html(String),
    /// A suspense boundary.
    Boundary(BoundarySpec),
}

/// A renderable page: component name, head and ordered body parts.
#[derive(Debug, Clone)]
pub struct Page {
    component: String,
    head: Head,
    parts: Vec<PagePart>,
}

impl Page {
    /// Create a page for the named component.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            head: Head::new(),
            parts: Vec::new(),
        }
    }

    /// Set head content.
    pub fn with_head(mut self, head: Head) -> Self {
        self.head = head;
        self
    }

    /// Append static HTML.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.parts.push(PagePart::Html(html.into()));
        self
    }

    /// Append a suspense boundary.
    pub fn with_boundary(mut self, boundary: BoundarySpec) -> Self {
        self.parts.push(PagePart::Boundary(boundary));
        self
    }

    /// Component name identifying this page.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Head content.
    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Body parts in document order.
    pub fn parts(&self) -> &[PagePart] {
        &self.parts
    }

    /// Boundaries in document order.
    pub fn boundaries(&self) -> impl Iterator<Item = &BoundarySpec> {
        self.parts.iter().filter_map(|p| match p {
            PagePart::Boundary(b) => Some(b),
            PagePart::Html(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === HeadElement Tests ===

    #[test]
    fn test_head_renders_elements_in_order() {
        let head = Head::new()
            .with_title("shop")
            .with_meta("viewport", "width=device-width")
            .with_stylesheet("/style.css");

        let html = head.render();
        let title_at = html.find("<title>shop</title>").unwrap();
        let css_at = html.find(r#"href="/style.css""#).unwrap();
        assert!(title_at < css_at);
    }

    #[test]
    fn test_json_ld_classification() {
        let head = Head::new()
            .with_json_ld(r#"{"@type":"Product"}"#)
            .with_script_src("/app.js");

        assert!(head.elements()[0].is_json_ld());
        assert!(!head.elements()[1].is_json_ld());
    }

    #[test]
    fn test_script_render_includes_type_and_src() {
        let el = HeadElement::Script {
            src: Some("/app.js".to_string()),
            script_type: Some("module".to_string()),
            body: None,
        };
        assert_eq!(
            el.render(),
            r#"<script type="module" src="/app.js"></script>"#
        );
    }

    // === Page Tests ===

    #[tokio::test]
    async fn test_boundary_resolver_is_reusable() {
        let boundary = BoundarySpec::new("feed", "<p>loading</p>", || async {
            Ok(ResolvedBoundary::html("<p>done</p>"))
        });

        let first = boundary.resolve().await.unwrap();
        let second = boundary.resolve().await.unwrap();
        assert_eq!(first.html, second.html);
    }

    #[test]
    fn test_page_boundaries_in_document_order() {
        let page = Page::new("Index")
            .with_html("<h1>hi</h1>")
            .with_boundary(BoundarySpec::new("a", "", || async {
                Ok(ResolvedBoundary::html(""))
            }))
            .with_boundary(BoundarySpec::new("b", "", || async {
                Ok(ResolvedBoundary::html(""))
            }));

        let names: Vec<_> = page.boundaries().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(page.parts().len(), 3);
    }
}
