//! Common types and utilities for the typarg inference engine.
//!
//! This crate provides foundational types used across all typarg crates:
//! - String interning (`Atom`, `Interner`) for type and parameter names
//! - Centralized limits for graph construction

// String interning for type name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
