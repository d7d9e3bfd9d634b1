//! Capabilities the attendance engine needs from the outside world.
//!
//! The engine only ever talks to these traits. `helpers` provides the Google
//! implementations; tests use in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::error::AttendanceResult;

/// A calendar item, already expanded to a single occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventStart,
}

/// Raw start of an event. Timed events carry `date_time` (RFC 3339), all-day
/// events carry `date` (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStart {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Non-deleted, single-instance events starting at or after `since`,
    /// ordered by start time, at most `max_results` of them.
    async fn list_events(
        &self,
        calendar_id: &str,
        since: DateTime<FixedOffset>,
        max_results: u32,
    ) -> AttendanceResult<Vec<CalendarEvent>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPage {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetInfo {
    pub title: String,
    pub pages: Vec<SheetPage>,
}

#[async_trait]
pub trait TabularDocumentStore: Send + Sync {
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> AttendanceResult<SpreadsheetInfo>;

    /// Copies a page within the same spreadsheet and returns the new page id.
    async fn duplicate_page(&self, spreadsheet_id: &str, page_id: i64) -> AttendanceResult<i64>;

    async fn rename_and_reorder_page(
        &self,
        spreadsheet_id: &str,
        page_id: i64,
        title: &str,
        index: u32,
    ) -> AttendanceResult<()>;

    /// Writes `rows` into an A1 range such as `202402!D7:D37`.
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> AttendanceResult<()>;

    async fn export_page_as_pdf(&self, spreadsheet_id: &str, page_id: i64)
    -> AttendanceResult<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
}

/// One page of a folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePage {
    pub files: Vec<FileEntry>,
    pub next_page_token: Option<String>,
}

/// A single find/replace pair applied to every occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub find: String,
    pub replace: String,
}

impl Replacement {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_file_metadata(&self, file_id: &str) -> AttendanceResult<FileMetadata>;

    async fn list_files_in_folder(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> AttendanceResult<FilePage>;

    async fn delete_file(&self, file_id: &str) -> AttendanceResult<()>;

    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_folder_id: &str,
    ) -> AttendanceResult<FileEntry>;

    async fn replace_all_text(
        &self,
        file_id: &str,
        replacements: &[Replacement],
    ) -> AttendanceResult<()>;

    async fn export_file_as_pdf(&self, file_id: &str) -> AttendanceResult<Vec<u8>>;
}
