//! Everything that turns parsed data into text for the terminal

pub mod report;
pub mod usage;
