//! Streaming demo: a static header plus boundaries resolving at
//! different speeds, each backed by an artificially slow data source.

use std::sync::Arc;
use std::time::Duration;

use rill_data::{resolve_typed, resolve_with_policy, MemorySource, RetryPolicy, TimeoutConfig};
use rill_render::{BoundarySpec, Head, Page, ResolvedBoundary};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct ReviewsPayload {
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct Review {
    author: String,
    rating: u8,
    text: String,
}

pub fn page() -> Arc<Page> {
    Arc::new(
        Page::new("Streaming")
            .with_head(
                Head::new()
                    .with_title("Streaming demo")
                    .with_meta("description", "shell-first streaming with suspense boundaries")
                    .with_style("body{font-family:sans-serif;margin:2rem}.skeleton{color:#999}"),
            )
            .with_html(r#"<header><h1>Storefront</h1><p>The header renders immediately; the sections below stream in as their data resolves.</p></header>"#)
            .with_boundary(recommendations_boundary())
            .with_boundary(reviews_boundary()),
    )
}

fn recommendations_boundary() -> BoundarySpec {
    BoundarySpec::new(
        "recommendations",
        r#"<p class="skeleton">Loading recommendations...</p>"#,
        || async {
            let value = load(
                "recommendations",
                json!({"items": ["Desk lamp", "Mechanical keyboard", "Monitor arm"]}),
                Duration::from_millis(40),
            )
            .await?;
            Ok(ResolvedBoundary::html(render_recommendations(&value)))
        },
    )
}

fn reviews_boundary() -> BoundarySpec {
    BoundarySpec::new(
        "reviews",
        r#"<p class="skeleton">Loading reviews...</p>"#,
        || async {
            let source = MemorySource::new(
                "reviews",
                json!({"reviews": [
                    {"author": "ada", "rating": 5, "text": "Arrived in two days."},
                    {"author": "lin", "rating": 4, "text": "Solid build quality."}
                ]}),
            )
            .with_delay(Duration::from_millis(120));
            let payload: ReviewsPayload =
                resolve_typed(&source, &TimeoutConfig::default(), &RetryPolicy::none())
                    .await
                    .map_err(anyhow::Error::new)?;
            Ok(ResolvedBoundary::html(render_reviews(&payload)))
        },
    )
}

async fn load(name: &str, fixture: Value, delay: Duration) -> anyhow::Result<Value> {
    let source = MemorySource::new(name, fixture).with_delay(delay);
    let value = resolve_with_policy(&source, &TimeoutConfig::default(), &RetryPolicy::none())
        .await?;
    Ok(value)
}

fn render_recommendations(value: &Value) -> String {
    let items: String = value["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|i| format!("<li>{i}</li>"))
                .collect()
        })
        .unwrap_or_default();

    format!(r#"<section data-section="recommendations"><h2>Recommended</h2><ul>{items}</ul></section>"#)
}

fn render_reviews(payload: &ReviewsPayload) -> String {
    let reviews: String = payload
        .reviews
        .iter()
        .map(|r| {
            format!(
                r#"<article class="review"><strong>{}</strong> ({}/5): {}</article>"#,
                r.author, r.rating, r.text,
            )
        })
        .collect();

    format!(r#"<section data-section="reviews"><h2>Reviews</h2>{reviews}</section>"#)
}
