//! Error type shared by every operation in the crate.
//!
//! Every variant is fatal: the run stops at the first one that is returned.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google API returned status {status} while trying to {action}: {body}")]
    Api {
        action: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid target month '{0}', expected YYYYMM")]
    InvalidMonth(String),

    #[error("Failed to parse calendar date '{value}': {source}")]
    EventDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Calendar event {0} has neither a start time nor a start date")]
    MissingEventStart(String),

    #[error("No sheet titled {previous} in spreadsheet {spreadsheet_id} to copy into {target}")]
    NoSheetToCopy {
        spreadsheet_id: String,
        previous: String,
        target: String,
    },

    #[error("Template {0} has no parent folder")]
    TemplateWithoutParent(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;
