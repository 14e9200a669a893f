//! Unit tests for the graph module.
