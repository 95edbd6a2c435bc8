//! Filesystem utilities for brigade.
//!
//! Config files are written atomically so an interrupted `init` never leaves
//! a half-written config behind.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
