//! CSS value types and the computed-style record consumed by `webbox-layout`.
//!
//! This crate owns the *shape* of a resolved style, not the cascade that
//! produces one — parsing and specificity resolution are external
//! collaborators (see the workspace `SPEC_FULL.md`).

pub mod style;
pub mod values;

pub use style::*;
pub use values::*;
