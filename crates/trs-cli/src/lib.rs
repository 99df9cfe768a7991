//! CLI library components for Template Review Studio.

pub mod logging;
