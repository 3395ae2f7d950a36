//! Concurrent boundary execution.
//!
//! Boundaries resolve concurrently; the streaming path consumes events in
//! completion order so a fast boundary never waits on a slow sibling,
//! while the buffered (crawler) path waits for everything and re-orders
//! by document position.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use rill_core::RenderError;

use crate::page::{Page, ResolvedBoundary};

/// One boundary's resolution outcome.
pub struct ResolutionEvent {
    /// Boundary position in document order (0-based).
    pub index: usize,
    /// Boundary name.
    pub name: String,
    /// Resolution result.
    pub result: Result<ResolvedBoundary, RenderError>,
}

/// Start every boundary of the page; yields events in completion order.
pub fn resolution_stream(page: &Page) -> FuturesUnordered<BoxFuture<'static, ResolutionEvent>> {
    let stream = FuturesUnordered::new();

    for (index, spec) in page.boundaries().enumerate() {
        let name = spec.name.clone();
        let fut = spec.resolve();
        stream.push(Box::pin(async move {
            ResolutionEvent {
                index,
                name,
                result: fut.await,
            }
        }) as BoxFuture<'static, ResolutionEvent>);
    }

    stream
}

/// Resolve every boundary and return outcomes in document order.
pub async fn resolve_to_completion(page: &Page) -> Vec<ResolutionEvent> {
    let mut events: Vec<ResolutionEvent> = resolution_stream(page).collect().await;
    events.sort_by_key(|e| e.index);
    events
}
