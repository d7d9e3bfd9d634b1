//! In-memory stand-ins for the ports, used by unit tests.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AttendanceError, AttendanceResult};
use crate::ports::{
    CalendarEvent, DocumentStore, EventSource, EventStart, FileEntry, FileMetadata, FilePage,
    Replacement, SheetPage, SpreadsheetInfo, TabularDocumentStore,
};

fn api_error(action: &str) -> AttendanceError {
    AttendanceError::Api {
        action: action.to_string(),
        status: 500,
        body: "fake failure".to_string(),
    }
}

pub fn timed_event(id: &str, summary: &str, date_time: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: summary.to_string(),
        start: EventStart {
            date_time: Some(date_time.to_string()),
            date: None,
        },
    }
}

pub fn all_day_event(id: &str, summary: &str, date: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: summary.to_string(),
        start: EventStart {
            date_time: None,
            date: Some(date.to_string()),
        },
    }
}

#[derive(Default)]
pub struct FakeCalendar {
    pub events: Vec<CalendarEvent>,
    pub queries: Mutex<Vec<(String, DateTime<FixedOffset>, u32)>>,
}

impl FakeCalendar {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }
}

#[async_trait]
impl EventSource for FakeCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        since: DateTime<FixedOffset>,
        max_results: u32,
    ) -> AttendanceResult<Vec<CalendarEvent>> {
        self.queries
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), since, max_results));
        Ok(self.events.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeSpreadsheet {
    pub title: String,
    pub pages: Vec<SheetPage>,
    pub ranges: HashMap<String, Vec<Vec<String>>>,
}

#[derive(Default)]
pub struct FakeSheets {
    pub spreadsheets: Mutex<HashMap<String, FakeSpreadsheet>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_on: Option<&'static str>,
    next_page_id: Mutex<i64>,
}

impl FakeSheets {
    pub fn new() -> Self {
        Self {
            next_page_id: Mutex::new(1000),
            ..Default::default()
        }
    }

    pub fn with_spreadsheet(self, id: &str, title: &str, page_titles: &[&str]) -> Self {
        let pages = page_titles
            .iter()
            .enumerate()
            .map(|(i, title)| SheetPage {
                id: i as i64 + 1,
                title: title.to_string(),
            })
            .collect();
        self.spreadsheets.lock().unwrap().insert(
            id.to_string(),
            FakeSpreadsheet {
                title: title.to_string(),
                pages,
                ranges: HashMap::new(),
            },
        );
        self
    }

    pub fn failing_on(mut self, action: &'static str) -> Self {
        self.fail_on = Some(action);
        self
    }

    pub fn snapshot(&self, id: &str) -> FakeSpreadsheet {
        self.spreadsheets.lock().unwrap()[id].clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, action: &'static str, detail: String) -> AttendanceResult<()> {
        self.calls.lock().unwrap().push(format!("{action} {detail}"));
        if self.fail_on == Some(action) {
            return Err(api_error(action));
        }
        Ok(())
    }
}

#[async_trait]
impl TabularDocumentStore for FakeSheets {
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> AttendanceResult<SpreadsheetInfo> {
        self.record("get", spreadsheet_id.to_string())?;
        let sheets = self.spreadsheets.lock().unwrap();
        let sheet = sheets
            .get(spreadsheet_id)
            .ok_or_else(|| api_error("get unknown spreadsheet"))?;
        Ok(SpreadsheetInfo {
            title: sheet.title.clone(),
            pages: sheet.pages.clone(),
        })
    }

    async fn duplicate_page(&self, spreadsheet_id: &str, page_id: i64) -> AttendanceResult<i64> {
        self.record("duplicate", format!("{spreadsheet_id} {page_id}"))?;
        let mut next = self.next_page_id.lock().unwrap();
        *next += 1;
        let new_id = *next;

        let mut sheets = self.spreadsheets.lock().unwrap();
        let sheet = sheets
            .get_mut(spreadsheet_id)
            .ok_or_else(|| api_error("duplicate in unknown spreadsheet"))?;
        let source = sheet
            .pages
            .iter()
            .find(|p| p.id == page_id)
            .cloned()
            .ok_or_else(|| api_error("duplicate unknown page"))?;
        sheet.pages.push(SheetPage {
            id: new_id,
            title: format!("Copy of {}", source.title),
        });
        Ok(new_id)
    }

    async fn rename_and_reorder_page(
        &self,
        spreadsheet_id: &str,
        page_id: i64,
        title: &str,
        index: u32,
    ) -> AttendanceResult<()> {
        self.record("rename", format!("{spreadsheet_id} {page_id} {title} {index}"))?;
        let mut sheets = self.spreadsheets.lock().unwrap();
        let sheet = sheets
            .get_mut(spreadsheet_id)
            .ok_or_else(|| api_error("rename in unknown spreadsheet"))?;
        let position = sheet
            .pages
            .iter()
            .position(|p| p.id == page_id)
            .ok_or_else(|| api_error("rename unknown page"))?;
        let mut page = sheet.pages.remove(position);
        page.title = title.to_string();
        sheet.pages.insert(index as usize, page);
        Ok(())
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> AttendanceResult<()> {
        self.record("write", format!("{spreadsheet_id} {range}"))?;
        let mut sheets = self.spreadsheets.lock().unwrap();
        let sheet = sheets
            .get_mut(spreadsheet_id)
            .ok_or_else(|| api_error("write to unknown spreadsheet"))?;
        sheet.ranges.insert(range.to_string(), rows);
        Ok(())
    }

    async fn export_page_as_pdf(
        &self,
        spreadsheet_id: &str,
        page_id: i64,
    ) -> AttendanceResult<Vec<u8>> {
        self.record("export", format!("{spreadsheet_id} {page_id}"))?;
        Ok(format!("%PDF sheet {spreadsheet_id} {page_id}").into_bytes())
    }
}

#[derive(Default)]
pub struct FakeDrive {
    pub files: Mutex<Vec<FileMetadata>>,
    pub replaced: Mutex<Vec<(String, Vec<Replacement>)>>,
    pub deleted: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_on: Option<&'static str>,
    /// Folder listings are split into pages of this many files.
    pub page_size: usize,
}

impl FakeDrive {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    pub fn with_file(self, id: &str, name: &str, parents: &[&str]) -> Self {
        self.files.lock().unwrap().push(FileMetadata {
            id: id.to_string(),
            name: name.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn failing_on(mut self, action: &'static str) -> Self {
        self.fail_on = Some(action);
        self
    }

    pub fn names_in(&self, folder_id: &str) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.parents.iter().any(|p| p == folder_id))
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, action: &'static str, detail: String) -> AttendanceResult<()> {
        self.calls.lock().unwrap().push(format!("{action} {detail}"));
        if self.fail_on == Some(action) {
            return Err(api_error(action));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FakeDrive {
    async fn get_file_metadata(&self, file_id: &str) -> AttendanceResult<FileMetadata> {
        self.record("get", file_id.to_string())?;
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == file_id)
            .cloned()
            .ok_or_else(|| api_error("get unknown file"))
    }

    async fn list_files_in_folder(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> AttendanceResult<FilePage> {
        self.record("list", format!("{folder_id} {page_token:?}"))?;
        let start = page_token.map_or(0, |t| t.parse::<usize>().unwrap());
        let in_folder: Vec<FileEntry> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.parents.iter().any(|p| p == folder_id))
            .map(|f| FileEntry {
                id: f.id.clone(),
                name: f.name.clone(),
            })
            .collect();
        let end = (start + self.page_size).min(in_folder.len());
        Ok(FilePage {
            files: in_folder[start..end].to_vec(),
            next_page_token: (end < in_folder.len()).then(|| end.to_string()),
        })
    }

    async fn delete_file(&self, file_id: &str) -> AttendanceResult<()> {
        self.record("delete", file_id.to_string())?;
        self.files.lock().unwrap().retain(|f| f.id != file_id);
        self.deleted.lock().unwrap().push(file_id.to_string());
        Ok(())
    }

    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_folder_id: &str,
    ) -> AttendanceResult<FileEntry> {
        self.record("copy", format!("{file_id} {new_name} {parent_folder_id}"))?;
        let mut files = self.files.lock().unwrap();
        let new_id = format!("copy-{}", files.len() + 1);
        files.push(FileMetadata {
            id: new_id.clone(),
            name: new_name.to_string(),
            parents: vec![parent_folder_id.to_string()],
        });
        Ok(FileEntry {
            id: new_id,
            name: new_name.to_string(),
        })
    }

    async fn replace_all_text(
        &self,
        file_id: &str,
        replacements: &[Replacement],
    ) -> AttendanceResult<()> {
        self.record("replace", file_id.to_string())?;
        self.replaced
            .lock()
            .unwrap()
            .push((file_id.to_string(), replacements.to_vec()));
        Ok(())
    }

    async fn export_file_as_pdf(&self, file_id: &str) -> AttendanceResult<Vec<u8>> {
        self.record("export", file_id.to_string())?;
        Ok(format!("%PDF document {file_id}").into_bytes())
    }
}
