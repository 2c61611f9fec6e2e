//! Filesystem utilities for jiradraft.

pub mod atomic;

pub use atomic::atomic_write_file;
