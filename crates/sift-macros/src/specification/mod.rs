//! Implementation of the `#[derive(Specification)]` macro.

mod attrs;
mod derive;

pub use derive::specification_derive_impl;
