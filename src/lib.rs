//! Monthly attendance library
//!
//! Reads work days from a calendar, writes them into a sheet per month of each
//! attendance spreadsheet, fills a document template for the month and saves
//! everything as PDF.

pub mod config;
pub mod document;
pub mod error;
pub mod helpers;
pub mod models;
pub mod month;
pub mod ports;
pub mod prompt;
pub mod service;
pub mod spreadsheet;
pub mod workdays;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{AttendanceError, AttendanceResult};
pub use month::TargetMonth;
pub use service::{AttendanceReport, AttendanceService};
