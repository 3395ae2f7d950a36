//! The rill pipeline.
//!
//! Takes a `RequestContext` and a registered `Page`, classifies the
//! user-agent, and produces either a streaming shell-first response, a
//! single-flush buffered response (crawlers), or a flight payload.

mod etag;
mod pipeline;
mod response;

pub use etag::*;
pub use pipeline::*;
pub use response::*;
