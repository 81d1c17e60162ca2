//! Adapter implementations for task lifecycle ports.

pub mod memory;
pub mod notify;
pub mod postgres;
pub mod upload;
