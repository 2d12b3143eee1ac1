//! Infrastructure adapters for IO, configuration, and the terminal host.

pub mod buffer;
pub mod config;
pub mod lines;
pub mod terminal;
