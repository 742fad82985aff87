//! gonew-core: Core abstractions for source rewriting
//!
//! This crate provides:
//! - `Edit`: A byte-offset addressed replacement or insertion
//! - `EditBuffer`: Collects edits against an immutable source and materializes them once

mod edit;

pub use edit::{Edit, EditBuffer, EditError};
