//! Dev-mode head lint.
//!
//! Scans a page's declared head elements and warns about constructs that
//! defeat streaming: stylesheets and script tags do not belong in
//! `rill/head` because the head flushes with the shell, before the
//! document is complete. JSON-LD structured-data snippets are inert and
//! therefore allowed. Warnings dedup by message content, so a condition
//! that recurs produces one warning per page load.

use std::collections::HashSet;

use rill_render::{Head, HeadElement};

/// Classification of one head element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadConstruct {
    /// Stylesheet link in head.
    DisallowedStylesheet {
        /// Offending href.
        href: String,
    },
    /// Script tag in head (external or inline).
    DisallowedScript {
        /// Offending src, if external.
        src: Option<String>,
    },
    /// Script allowed in head (JSON-LD structured data).
    AllowedScript,
}

/// One deduplicated lint warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    /// Full warning message.
    pub message: String,
}

/// Classify one head element; `None` for elements with no lint rule.
pub fn classify(element: &HeadElement) -> Option<HeadConstruct> {
    match element {
        HeadElement::Stylesheet { href } => Some(HeadConstruct::DisallowedStylesheet {
            href: href.clone(),
        }),
        HeadElement::Script { .. } if element.is_json_ld() => Some(HeadConstruct::AllowedScript),
        HeadElement::Script { src, .. } => {
            Some(HeadConstruct::DisallowedScript { src: src.clone() })
        }
        _ => None,
    }
}

fn warning_for(construct: &HeadConstruct) -> Option<LintWarning> {
    match construct {
        HeadConstruct::DisallowedStylesheet { href } => Some(LintWarning {
            message: format!(
                "Do not add stylesheets using rill/head (see <link rel=\"stylesheet\"> tag with href=\"{href}\"). \
                 Move styles into the document shell instead."
            ),
        }),
        HeadConstruct::DisallowedScript { src } => {
            let seen = match src {
                Some(src) => format!("src=\"{src}\""),
                None => "inline script".to_string(),
            };
            Some(LintWarning {
                message: format!(
                    "Do not add <script> tags using rill/head (see <script> tag with {seen}). \
                     Use rill/script instead."
                ),
            })
        }
        HeadConstruct::AllowedScript => None,
    }
}

/// Lint a page's head, deduplicating by message content.
pub fn lint_head(head: &Head) -> Vec<LintWarning> {
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();

    for element in head.elements() {
        let Some(construct) = classify(element) else {
            continue;
        };
        let Some(warning) = warning_for(&construct) else {
            continue;
        };
        if seen.insert(warning.message.clone()) {
            warnings.push(warning);
        }
    }

    warnings
}

/// Render a warning as a `console.warn` injection script so it surfaces
/// in the browser console during dev.
pub fn console_warn_script(warning: &LintWarning) -> String {
    let message = serde_json::to_string(&warning.message)
        .unwrap_or_default()
        .replace("</", "<\\/");
    format!("<script>console.warn({message})</script>")
}
