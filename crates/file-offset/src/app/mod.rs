//! Application layer: the selection-to-offset pipeline and the host seams it runs against.

pub mod command;
pub mod host;
pub mod offsets;
pub mod present;
pub mod report;
pub mod selection;
