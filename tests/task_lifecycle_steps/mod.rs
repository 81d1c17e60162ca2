//! Step definitions for task lifecycle behaviour tests.

mod given;
mod then;
mod when;
pub mod world;
