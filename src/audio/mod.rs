//! Audio decoding
//!
//! File-based entry points decode through here; the in-memory entry points
//! never touch this module.

pub mod decoder;

pub use decoder::decode;
