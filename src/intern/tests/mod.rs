//! Unit tests for the intern directory.
