//! Page model and rendering for the rill pipeline.
//!
//! - `Page` / `PagePart` / `Head` - what a route renders
//! - `BoundarySpec` - a named suspense boundary with fallback and resolver
//! - boundary executor - concurrent resolution in completion order
//! - inline state scripts and flight payloads

mod executor;
mod flight;
mod hydrate;
mod inline;
mod page;

pub use executor::*;
pub use flight::*;
pub use hydrate::*;
pub use inline::*;
pub use page::*;
