//! The self-hosted grammar-description DSL (spec §4.6): a small language
//! for declaring tokens and rules that lowers directly to the same
//! combinator graphs a grammar assembled by hand in Rust would produce.
mod bootstrap;
mod lower;
mod tokens;

pub use lower::compile;
