//! Utility functions and helpers.

pub mod alignment;

pub use alignment::Alignment;
