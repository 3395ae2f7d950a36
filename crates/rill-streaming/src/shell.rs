//! Document shell template.

/// Final bytes of every response body. The closing chunk must end with
/// this sequence so clients can detect a complete document.
pub const DOCUMENT_SUFFIX: &str = "</body></html>";

/// Id of the stable mount anchor every document carries.
pub const MOUNT_ANCHOR_ID: &str = "__rill";

/// Shell template around the streamed page parts.
///
/// `render_opening` produces everything up to and including the mount
/// anchor's opening tag; boundary fallbacks and static parts are appended
/// to that chunk by the pipeline. `render_closing` produces the terminal
/// chunk ending in [`DOCUMENT_SUFFIX`].
#[derive(Debug, Clone)]
pub struct Shell {
    /// Include doctype declaration.
    pub doctype: bool,
    /// Pre-rendered head inner HTML.
    pub head_html: String,
    /// Inline scripts added to the shell (hydration runtime lives here).
    pub shell_scripts: Vec<String>,
}

impl Shell {
    /// Create a new shell with the given head HTML.
    pub fn new(head_html: impl Into<String>) -> Self {
        Self {
            doctype: true,
            head_html: head_html.into(),
            shell_scripts: Vec::new(),
        }
    }

    /// Add an inline script emitted inside the shell, before the anchor.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.shell_scripts.push(script.into());
        self
    }

    /// Render the opening part of the shell.
    pub fn render_opening(&self) -> String {
        let mut html = String::new();

        if self.doctype {
            html.push_str("<!DOCTYPE html>");
        }

        html.push_str("<html><head>");
        html.push_str(&self.head_html);
        html.push_str("</head><body>");

        for script in &self.shell_scripts {
            html.push_str(script);
        }

        html.push_str(&format!(r#"<div id="{}">"#, MOUNT_ANCHOR_ID));
        html
    }

    /// Render the closing part of the shell (terminal chunk).
    pub fn render_closing(&self) -> String {
        format!("</div>{}", DOCUMENT_SUFFIX)
    }
}
