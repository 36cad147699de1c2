//! Common types and utilities for the tsguard validator compiler.
//!
//! This crate provides foundational pieces used across all tsguard crates:
//! - Compiler limits and thresholds
//! - JavaScript identifier helpers (validity checks, reserved words, escaping)

// Centralized limits and thresholds
pub mod limits;

// JavaScript identifier helpers shared by the printer and the naming engine
pub mod identifiers;
pub use identifiers::{escape_identifier_segment, is_reserved_word, is_valid_identifier};
