//! Flight payloads: a component description protocol distinct from HTML.
//!
//! A request carrying the [`FLIGHT_QUERY_MARKER`] query flag gets a
//! row-based payload naming the server-rendered component, one row per
//! chunk.

use serde_json::json;

use crate::page::{Page, PagePart};

/// Query flag selecting a flight response.
pub const FLIGHT_QUERY_MARKER: &str = "__flight__";

/// Content type of flight responses.
pub const FLIGHT_CONTENT_TYPE: &str = "text/x-component";

/// Serialize a page into flight rows.
///
/// Row 0 names the component; each boundary contributes one row with its
/// name and fallback so a flight client can mirror the suspense shape.
pub fn flight_rows(page: &Page) -> Vec<String> {
    let mut rows = Vec::new();

    let statics = page
        .parts()
        .iter()
        .filter(|p| matches!(p, PagePart::Html(_)))
        .count();
    rows.push(format!(
        "0:{}\n",
        json!(["$", page.component(), { "static": statics }])
    ));

    for (i, boundary) in page.boundaries().enumerate() {
        rows.push(format!(
            "{}:{}\n",
            i + 1,
            json!(["$b", boundary.name, { "fallback": boundary.fallback }])
        ));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{BoundarySpec, ResolvedBoundary};

    #[test]
    fn test_first_row_names_component() {
        let page = Page::new("ProductDetail").with_html("<h1>p</h1>");
        let rows = flight_rows(&page);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("0:"));
        assert!(rows[0].contains("ProductDetail"));
    }

    #[test]
    fn test_boundary_rows_carry_name_and_fallback() {
        let page = Page::new("Feed").with_boundary(BoundarySpec::new(
            "stories",
            "<p>loading stories</p>",
            || async { Ok(ResolvedBoundary::html("<p>stories</p>")) },
        ));

        let rows = flight_rows(&page);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("1:"));
        assert!(rows[1].contains("stories"));
        assert!(rows[1].contains("loading stories"));
    }

    #[test]
    fn test_rows_are_newline_terminated() {
        let page = Page::new("Index");
        assert!(flight_rows(&page)[0].ends_with('\n'));
    }
}
