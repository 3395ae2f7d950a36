//! Partial hydration demo: two independent regions. The counter resolves
//! quickly with server state inlined while a slower suspense region is
//! still showing its fallback, so the two hydrate independently.

use std::sync::Arc;
use std::time::Duration;

use rill_data::{resolve_with_policy, MemorySource, RetryPolicy, TimeoutConfig};
use rill_render::{BoundarySpec, Head, Page, ResolvedBoundary};
use serde_json::json;

/// Fallback text the suspense region shows (and reports) while pending.
const SUSPENSE_FALLBACK: &str = "Waiting for content...";

/// Surfaces each region's state on `window` for test harnesses: the
/// counter's inlined count the moment its state arrives, and the suspense
/// region's fallback text until that region's swap has run.
const REGION_REPORT_SCRIPT: &str = concat!(
    "<script>",
    "(function report(){",
    "var s=self.__rill_s||[];",
    "for(var i=0;i<s.length;i++){",
    "if(s[i][0]===\"counter\"){",
    "window.partial_hydration_counter_result=s[i][1].count;",
    "}",
    "}",
    "var region=document.querySelector('[data-rill-boundary=\"suspense\"]');",
    "if(region){",
    "window.partial_hydration_suspense_result=",
    "region.hasAttribute(\"data-rill-pending\")?region.textContent:\"resolved\";",
    "}",
    "if(window.partial_hydration_counter_result===undefined",
    "||window.partial_hydration_suspense_result!==\"resolved\"){",
    "setTimeout(report,10);",
    "}",
    "})();",
    "</script>"
);

pub fn page() -> Arc<Page> {
    Arc::new(
        Page::new("PartialHydration")
            .with_head(
                Head::new()
                    .with_title("Partial hydration demo")
                    .with_style(".counter{padding:1rem;border:1px solid #ccc}"),
            )
            .with_html(format!("<h1>Partial hydration</h1>{REGION_REPORT_SCRIPT}"))
            .with_boundary(counter_boundary())
            .with_boundary(suspense_boundary()),
    )
}

fn counter_boundary() -> BoundarySpec {
    BoundarySpec::new(
        "counter",
        r#"<p class="skeleton">Loading counter...</p>"#,
        || async {
            let source = MemorySource::new("counter", json!({"count": 1}))
                .with_delay(Duration::from_millis(30));
            let state =
                resolve_with_policy(&source, &TimeoutConfig::default(), &RetryPolicy::none())
                    .await
                    .map_err(anyhow::Error::new)?;

            let count = state["count"].as_i64().unwrap_or(0);
            let html = format!(
                r#"<div class="counter" data-count="{count}"><button>Count: {count}</button></div>"#
            );
            Ok(ResolvedBoundary::html(html).with_state(state))
        },
    )
}

fn suspense_boundary() -> BoundarySpec {
    BoundarySpec::new(
        "suspense",
        format!("<p>{SUSPENSE_FALLBACK}</p>"),
        || async {
            let source =
                MemorySource::new("suspense", json!({"body": "Suspense content loaded."}))
                    .with_delay(Duration::from_millis(150));
            let value =
                resolve_with_policy(&source, &TimeoutConfig::default(), &RetryPolicy::none())
                    .await
                    .map_err(anyhow::Error::new)?;

            Ok(ResolvedBoundary::html(format!(
                "<p>{}</p>",
                value["body"].as_str().unwrap_or("")
            )))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use rill_render::resolution_stream;

    #[tokio::test]
    async fn test_counter_resolves_while_suspense_still_pending() {
        let page = page();
        let mut events = resolution_stream(&page);

        let first = events.next().await.unwrap();
        assert_eq!(first.name, "counter");
        let resolved = first.result.unwrap();
        assert_eq!(resolved.state.unwrap()["count"], 1);

        let second = events.next().await.unwrap();
        assert_eq!(second.name, "suspense");
        assert!(second.result.unwrap().html.contains("Suspense content loaded."));
    }

    #[tokio::test]
    async fn test_suspense_region_resolves_without_state() {
        let resolved = suspense_boundary().resolve().await.unwrap();
        assert!(resolved.state.is_none());
    }

    #[test]
    fn test_report_script_tracks_both_regions() {
        assert!(REGION_REPORT_SCRIPT.contains("partial_hydration_counter_result"));
        assert!(REGION_REPORT_SCRIPT.contains("partial_hydration_suspense_result"));
        assert!(REGION_REPORT_SCRIPT.contains("data-rill-pending"));
    }

    #[test]
    fn test_fallback_text_is_the_reported_marker() {
        let page = page();
        let suspense = page.boundaries().find(|b| b.name == "suspense").unwrap();
        assert!(suspense.fallback.contains(SUSPENSE_FALLBACK));
    }
}
