//! Implementations that are useful across the whole project
//!
//! Money, entries, colors and error reporting

pub mod amount;
pub mod color;
pub mod entry;
pub mod error;
pub mod month;
