use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::{AttendanceError, AttendanceResult};
use crate::month::TargetMonth;
use crate::ports::TabularDocumentStore;

/// Cell holding the first day of the month.
pub const MONTH_CELL: &str = "M3:M3";
/// One row per possible day of month, day 1 on row 7.
pub const ATTENDANCE_RANGE: &str = "D7:D37";
pub const ATTENDANCE_ROWS: u32 = 31;

/// Sheet of a spreadsheet that holds one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSheet {
    pub spreadsheet_id: String,
    pub spreadsheet_title: String,
    pub sheet_id: i64,
    pub title: String,
}

/// Keeps one sheet per month in each spreadsheet and fills its attendance
/// column.
pub struct SpreadsheetSynchronizer<'a, S: TabularDocumentStore> {
    store: &'a S,
    work_start_time: &'a str,
    output_dir: &'a Path,
}

impl<'a, S: TabularDocumentStore> SpreadsheetSynchronizer<'a, S> {
    pub fn new(store: &'a S, work_start_time: &'a str, output_dir: &'a Path) -> Self {
        Self {
            store,
            work_start_time,
            output_dir,
        }
    }

    /// Syncs and exports each spreadsheet in turn, stopping at the first
    /// failure. Returns the written PDF paths.
    pub async fn sync_all(
        &self,
        month: &TargetMonth,
        work_days: &BTreeSet<NaiveDate>,
        spreadsheet_ids: &[String],
    ) -> AttendanceResult<Vec<PathBuf>> {
        let mut exported = Vec::with_capacity(spreadsheet_ids.len());
        for spreadsheet_id in spreadsheet_ids {
            let sheet = self.sync(spreadsheet_id, month, work_days).await?;
            exported.push(self.export(&sheet).await?);
        }
        Ok(exported)
    }

    /// Makes sure the month's sheet exists and overwrites its date cell and
    /// attendance column.
    pub async fn sync(
        &self,
        spreadsheet_id: &str,
        month: &TargetMonth,
        work_days: &BTreeSet<NaiveDate>,
    ) -> AttendanceResult<MonthSheet> {
        let sheet = self.ensure_month_sheet(spreadsheet_id, month).await?;

        info!("Setting work month {} on sheet {}", month.slash_date(), sheet.title);
        self.store
            .write_range(
                spreadsheet_id,
                &format!("{}!{}", sheet.title, MONTH_CELL),
                vec![vec![month.slash_date()]],
            )
            .await?;

        let column = attendance_column(month, work_days, self.work_start_time);
        info!(
            "Writing {} attendance rows to sheet {}",
            column.len(),
            sheet.title
        );
        self.store
            .write_range(
                spreadsheet_id,
                &format!("{}!{}", sheet.title, ATTENDANCE_RANGE),
                column,
            )
            .await?;

        Ok(sheet)
    }

    /// Finds the sheet titled after `month`, or clones last month's sheet to
    /// the front of the spreadsheet under that title.
    pub async fn ensure_month_sheet(
        &self,
        spreadsheet_id: &str,
        month: &TargetMonth,
    ) -> AttendanceResult<MonthSheet> {
        let spreadsheet = self.store.get_spreadsheet(spreadsheet_id).await?;
        let title = month.compact();

        if let Some(page) = spreadsheet.pages.iter().find(|p| p.title == title) {
            info!(
                "Sheet {} already exists in {} with id {}",
                title, spreadsheet.title, page.id
            );
            return Ok(MonthSheet {
                spreadsheet_id: spreadsheet_id.to_string(),
                spreadsheet_title: spreadsheet.title,
                sheet_id: page.id,
                title,
            });
        }

        let previous = month.previous()?.compact();
        let Some(source) = spreadsheet.pages.iter().find(|p| p.title == previous) else {
            error!(
                "Neither {} nor {} exists in spreadsheet {}",
                title, previous, spreadsheet_id
            );
            return Err(AttendanceError::NoSheetToCopy {
                spreadsheet_id: spreadsheet_id.to_string(),
                previous,
                target: title,
            });
        };

        info!("Copying sheet {} to create {}", previous, title);
        let sheet_id = self.store.duplicate_page(spreadsheet_id, source.id).await?;
        self.store
            .rename_and_reorder_page(spreadsheet_id, sheet_id, &title, 0)
            .await?;
        info!("Created sheet {} with id {}", title, sheet_id);

        Ok(MonthSheet {
            spreadsheet_id: spreadsheet_id.to_string(),
            spreadsheet_title: spreadsheet.title,
            sheet_id,
            title,
        })
    }

    pub async fn export(&self, sheet: &MonthSheet) -> AttendanceResult<PathBuf> {
        let pdf = self
            .store
            .export_page_as_pdf(&sheet.spreadsheet_id, sheet.sheet_id)
            .await?;
        info!(
            "Exported sheet {} of {}, size: {} bytes",
            sheet.title,
            sheet.spreadsheet_title,
            pdf.len()
        );

        let path = self
            .output_dir
            .join(format!("{}{}.pdf", sheet.title, sheet.spreadsheet_title));
        tokio::fs::write(&path, pdf).await?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}

/// Single-column rows for days 1..=31: `work_start_time` on work days of
/// `month`, empty otherwise.
pub fn attendance_column(
    month: &TargetMonth,
    work_days: &BTreeSet<NaiveDate>,
    work_start_time: &str,
) -> Vec<Vec<String>> {
    let worked: BTreeSet<u32> = work_days
        .iter()
        .filter(|d| month.contains(**d))
        .map(|d| d.day())
        .collect();

    (1..=ATTENDANCE_ROWS)
        .map(|day| {
            let value = if worked.contains(&day) {
                work_start_time.to_string()
            } else {
                String::new()
            };
            vec![value]
        })
        .collect()
}
