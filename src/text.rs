//! Pure text utilities: no I/O, no shared state.

pub mod chunking;
