//! Crate-level end-to-end scenarios spanning more than one module (grammar
//! assembly plus the DSL frontend), mirroring the teacher's own
//! `examples/__tests__/` / `production/__tests__/` placement rather than a
//! cargo-convention top-level `tests/` directory.
mod dsl_compile;
mod grammar_assembly;
