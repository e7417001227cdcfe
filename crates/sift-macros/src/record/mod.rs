//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates named attribute access and attribute-name constants for plain
//! structs, driven by optional `#[record(...)]` field attributes.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
