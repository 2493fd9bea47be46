//! Terminal front end for the income-tax regime comparison engine.

pub mod commands;
pub mod logging;
pub mod report;
