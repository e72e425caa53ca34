//! Block Blast (workspace facade crate).
//!
//! Re-exports `block_blast::{core, engine, adapter, types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use block_blast_adapter as adapter;
pub use block_blast_core as core;
pub use block_blast_engine as engine;
pub use block_blast_types as types;
