//! Reconciliation module containing the shift arithmetic

pub mod calculator;

pub use calculator::*;
