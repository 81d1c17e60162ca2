//! Application services for the intern directory.

mod directory;

pub use directory::{InternDirectoryError, InternDirectoryResult, InternDirectoryService};
