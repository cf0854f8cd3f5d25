//! Analysis dataflow graph
//!
//! A three-stage graph turns a sample buffer into raw tracking results:
//! a [`source::SignalSource`] feeds the configured beat tracker, whose
//! outputs are collected into a keyed [`pool::Pool`], and the
//! [`runner`] drives the whole thing to completion synchronously.
//!
//! Each call constructs its own graph; nothing here is shared between calls.

pub mod pool;
pub mod runner;
pub mod source;

pub use pool::Pool;
pub use runner::{run, RunOutcome};
pub use source::SignalSource;
