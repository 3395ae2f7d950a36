//! Core abstractions for the rill streaming SSR pipeline.
//!
//! This crate provides the fundamental types:
//! - `RequestContext` - Typed request parameters
//! - `RillConfig` / `RuntimeMode` - Runtime configuration
//! - `LifecyclePhase` / `TimingContext` - Request lifecycle tracking
//! - `RenderError` - Pipeline error type

mod config;
mod context;
mod error;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
