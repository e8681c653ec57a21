//! Reports module containing report lifecycle, aggregation and orchestration

pub mod aggregate;
pub mod core;
pub mod report;

pub use aggregate::*;
pub use core::*;
pub use report::*;
