//! Core types shared by the offset pipeline.

pub mod encoding;
pub mod errors;
pub mod model;
