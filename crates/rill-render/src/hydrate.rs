//! Hydration runtime and boundary swap markup.
//!
//! The shell carries a small inline runtime; each resolution chunk ships
//! the resolved HTML in an inert `<template>` plus a swap call. Boundaries
//! hydrate independently, so one can become interactive while a sibling
//! still shows its fallback.

/// Inline runtime script the shell carries.
///
/// `$RILLX(b, s)` moves template `s`'s content into boundary anchor `b`
/// and records the boundary as hydrated on `self.__rill_h`.
pub const HYDRATION_RUNTIME: &str = concat!(
    "<script>",
    "self.__rill_h=self.__rill_h||[];",
    "self.$RILLX=function(b,s){",
    "var t=document.getElementById(s),d=document.getElementById(b);",
    "if(!t||!d)return;",
    "d.innerHTML='';",
    "d.appendChild(t.content.cloneNode(true));",
    "t.remove();",
    "d.removeAttribute('data-rill-pending');",
    "self.__rill_h.push(d.getAttribute('data-rill-boundary'));",
    "};",
    "</script>"
);

/// Anchor element id for the nth boundary.
pub fn boundary_anchor_id(index: usize) -> String {
    format!("B:{index}")
}

/// Template element id for the nth boundary's resolved content.
pub fn template_id(index: usize) -> String {
    format!("S:{index}")
}

/// Render a boundary's fallback anchor, emitted with the shell.
pub fn render_fallback(index: usize, name: &str, fallback_html: &str) -> String {
    format!(
        r#"<div id="{}" data-rill-boundary="{}" data-rill-pending="">{}</div>"#,
        boundary_anchor_id(index),
        html_escape_attr(name),
        fallback_html,
    )
}

/// Render a boundary's resolution chunk: inert template plus swap call.
pub fn render_completion(index: usize, resolved_html: &str) -> String {
    format!(
        r#"<template id="{s}">{html}</template><script>$RILLX("{b}","{s}")</script>"#,
        s = template_id(index),
        b = boundary_anchor_id(index),
        html = resolved_html,
    )
}

/// Error markup swapped in when a boundary's resolver fails.
pub fn error_html(name: &str, error: &str) -> String {
    format!(
        r#"<div class="rill-boundary-error" data-rill-boundary="{}">{}</div>"#,
        html_escape_attr(name),
        html_escape(error),
    )
}

/// Escape text for HTML content.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape text for an HTML attribute value.
pub fn html_escape_attr(s: &str) -> String {
    html_escape(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_anchor_carries_pending_flag() {
        let html = render_fallback(0, "feed", "<p>loading</p>");
        assert!(html.contains(r#"id="B:0""#));
        assert!(html.contains(r#"data-rill-boundary="feed""#));
        assert!(html.contains("data-rill-pending"));
        assert!(html.contains("<p>loading</p>"));
    }

    #[test]
    fn test_completion_pairs_template_with_swap_call() {
        let html = render_completion(2, "<p>done</p>");
        assert!(html.contains(r#"<template id="S:2"><p>done</p></template>"#));
        assert!(html.contains(r#"$RILLX("B:2","S:2")"#));
    }

    #[test]
    fn test_error_html_escapes_message() {
        let html = error_html("feed", "<script>bad</script>");
        assert!(!html.contains("<script>bad"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_runtime_defines_swap_function() {
        assert!(HYDRATION_RUNTIME.contains("self.$RILLX=function"));
        assert!(HYDRATION_RUNTIME.contains("self.__rill_h"));
    }
}
