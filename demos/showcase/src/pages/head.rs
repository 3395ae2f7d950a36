//! Head-lint demos: one page whose head triggers dev-mode warnings and
//! one whose JSON-LD snippet is exempt.

use std::sync::Arc;

use rill_render::{Head, Page};

/// A head full of constructs the dev-mode linter flags.
pub fn offenders_page() -> Arc<Page> {
    Arc::new(
        Page::new("HeadDemo")
            .with_head(
                Head::new()
                    .with_title("Head demo")
                    .with_stylesheet("/assets/extra.css")
                    .with_script_src("/assets/analytics.js"),
            )
            .with_html("<h1>Head demo</h1><p>In dev mode this page warns about its stylesheet and script tags.</p>"),
    )
}

/// Structured data stays warning-free.
pub fn json_ld_page() -> Arc<Page> {
    Arc::new(
        Page::new("HeadJsonLd")
            .with_head(
                Head::new()
                    .with_title("JSON-LD demo")
                    .with_json_ld(
                        r#"{"@context":"https://schema.org","@type":"Product","name":"Desk lamp"}"#,
                    ),
            )
            .with_html("<h1>JSON-LD demo</h1><p>The structured-data snippet above produces no warnings.</p>"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_lint::lint_head;

    #[test]
    fn test_offenders_page_trips_the_linter() {
        let page = offenders_page();
        assert_eq!(lint_head(page.head()).len(), 2);
    }

    #[test]
    fn test_json_ld_page_is_clean() {
        let page = json_ld_page();
        assert!(lint_head(page.head()).is_empty());
    }
}
