//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through the `tracing` macros everywhere
//! - Subscriber setup lives in the binaries, never in library code paths

pub mod logging;
