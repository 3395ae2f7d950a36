//! Streaming primitives for shell-first SSR responses.
//!
//! This crate enforces the shell-first streaming discipline:
//! - `ChunkSink` - Ordered chunk emission with flush accounting
//! - `Shell` - Document template whose closing chunk terminates the stream
//! - `BoundaryState` - Per-boundary pending/resolved state machine
//! - `FlushPolicy` - Explicit flush control

mod boundary;
mod flush;
mod shell;
mod sink;

pub use boundary::*;
pub use flush::*;
pub use shell::*;
pub use sink::*;
