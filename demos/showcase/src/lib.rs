//! Demo application for the rill pipeline.
//!
//! One page per rendering path: shell-first streaming, partial hydration
//! with inline state, and head-lint demos for dev mode.

mod pages;

use std::collections::HashMap;
use std::sync::Arc;

use rill_render::Page;

/// Route table for the demo application.
pub fn routes() -> HashMap<&'static str, Arc<Page>> {
    HashMap::from([
        ("/", pages::index::page()),
        ("/streaming", pages::streaming::page()),
        ("/partial-hydration", pages::hydration::page()),
        ("/head", pages::head::offenders_page()),
        ("/head-with-json-ld-snippet", pages::head::json_ld_page()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_cover_every_demo() {
        let routes = routes();
        for path in [
            "/",
            "/streaming",
            "/partial-hydration",
            "/head",
            "/head-with-json-ld-snippet",
        ] {
            assert!(routes.contains_key(path), "missing route {path}");
        }
    }

    #[test]
    fn test_streaming_page_has_boundaries() {
        let routes = routes();
        let page = &routes["/streaming"];
        assert!(page.boundaries().count() >= 2);
    }

    #[tokio::test]
    async fn test_hydration_boundary_carries_state() {
        let routes = routes();
        let page = &routes["/partial-hydration"];

        let boundary = page.boundaries().next().unwrap();
        let resolved = boundary.resolve().await.unwrap();
        let state = resolved.state.unwrap();
        assert_eq!(state["count"], 1);
    }
}
