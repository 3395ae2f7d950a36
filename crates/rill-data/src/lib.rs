//! Async data sources for boundary resolution.
//!
//! Boundaries resolve through a `DataSource`, wrapped in explicit timeout
//! and retry policies so a slow dependency degrades one boundary instead
//! of the whole response.

mod error;
mod retry;
mod source;
mod timeout;

pub use error::*;
pub use retry::*;
pub use source::*;
pub use timeout::*;
