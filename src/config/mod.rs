//! Consumed configuration documents.
//!
//! `runtime.rs` reads the per-app/per-framework runtime config;
//! `global.rs` reads the `sdk` object of a `global.json`.

pub mod global;
pub mod runtime;
