//! Adapter implementations for intern directory ports.

pub mod memory;
pub mod postgres;
