use chrono::NaiveDate;
use reqwest::Client;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{error, info};

use crate::{
    AttendanceResult, Config, TargetMonth,
    document::DocumentTemplater,
    helpers::{calendar::GoogleCalendar, drive::GoogleDrive, sheets::GoogleSheets},
    ports::{DocumentStore, EventSource, TabularDocumentStore},
    spreadsheet::SpreadsheetSynchronizer,
    workdays::{WorkDayExtractor, title_is},
};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReport {
    pub month: TargetMonth,
    pub work_days: BTreeSet<NaiveDate>,
    pub spreadsheet_pdfs: Vec<PathBuf>,
    pub document_pdf: PathBuf,
}

/// Runs the monthly pipeline: calendar, then every spreadsheet, then the
/// document. Stops at the first error.
pub struct AttendanceService<E, S, D> {
    pub calendar: E,
    pub sheets: S,
    pub drive: D,
    pub config: Config,
}

impl AttendanceService<GoogleCalendar, GoogleSheets, GoogleDrive> {
    /// Service talking to the Google APIs through an authenticated client.
    pub fn google(client: Client, config: Config) -> Self {
        Self::new(
            GoogleCalendar::new(client.clone()),
            GoogleSheets::new(client.clone()),
            GoogleDrive::new(client),
            config,
        )
    }
}

impl<E, S, D> AttendanceService<E, S, D>
where
    E: EventSource,
    S: TabularDocumentStore,
    D: DocumentStore,
{
    pub fn new(calendar: E, sheets: S, drive: D, config: Config) -> Self {
        info!("Creating new AttendanceService instance");
        Self {
            calendar,
            sheets,
            drive,
            config,
        }
    }

    pub async fn process_month(&self, month: TargetMonth) -> AttendanceResult<AttendanceReport> {
        info!("Processing attendance for {}", month);

        let work_days = match WorkDayExtractor::new(&self.calendar, &self.config.calendar_id)
            .extract(&month, title_is(&self.config.work_day_title))
            .await
        {
            Ok(days) => {
                info!("Found {} work days", days.len());
                days
            }
            Err(e) => {
                error!("Failed to collect work days: {}", e);
                return Err(e);
            }
        };

        let output_dir = self.config.output_dir.as_path();

        let spreadsheet_pdfs = match SpreadsheetSynchronizer::new(
            &self.sheets,
            &self.config.work_start_time,
            output_dir,
        )
        .sync_all(&month, &work_days, &self.config.work_spreadsheet_ids)
        .await
        {
            Ok(paths) => {
                info!("Exported {} spreadsheets", paths.len());
                paths
            }
            Err(e) => {
                error!("Failed to update spreadsheets: {}", e);
                return Err(e);
            }
        };

        let document_pdf = match DocumentTemplater::new(&self.drive, output_dir)
            .run(&month, &self.config.work_document_template_id)
            .await
        {
            Ok(path) => {
                info!("Exported document to {}", path.display());
                path
            }
            Err(e) => {
                error!("Failed to update document: {}", e);
                return Err(e);
            }
        };

        Ok(AttendanceReport {
            month,
            work_days,
            spreadsheet_pdfs,
            document_pdf,
        })
    }
}
