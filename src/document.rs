use chrono::{Datelike, NaiveDate, Weekday};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{AttendanceError, AttendanceResult};
use crate::month::TargetMonth;
use crate::ports::{DocumentStore, FileEntry, Replacement};

/// Token in the template's name that is replaced by `YYYYMM`.
pub const MONTH_TOKEN: &str = "yyyymm";
/// The template has room for this many dated rows.
pub const SLOT_CAPACITY: usize = 12;
pub const HOURS_PER_SLOT: usize = 8;

const SLOT_WEEKDAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

/// Copies the document template for a month, fills its placeholders and
/// exports the copy.
pub struct DocumentTemplater<'a, D: DocumentStore> {
    store: &'a D,
    output_dir: &'a Path,
}

impl<'a, D: DocumentStore> DocumentTemplater<'a, D> {
    pub fn new(store: &'a D, output_dir: &'a Path) -> Self {
        Self { store, output_dir }
    }

    /// Creates the month's document, fills it and saves it as PDF.
    pub async fn run(&self, month: &TargetMonth, template_id: &str) -> AttendanceResult<PathBuf> {
        let document = self.template(month, template_id).await?;
        self.export(&document).await
    }

    /// Replaces any earlier copy for `month` with a fresh, filled one.
    pub async fn template(
        &self,
        month: &TargetMonth,
        template_id: &str,
    ) -> AttendanceResult<FileEntry> {
        let template = self.store.get_file_metadata(template_id).await?;
        let Some(folder_id) = template.parents.first() else {
            return Err(AttendanceError::TemplateWithoutParent(template.id));
        };

        let name = target_name(&template.name, month);
        info!("Preparing document {} in folder {}", name, folder_id);

        self.remove_existing(folder_id, &name).await?;

        let document = self.store.copy_file(template_id, &name, folder_id).await?;
        info!("Copied template to {} ({})", document.name, document.id);

        let replacements = placeholder_replacements(month);
        self.store
            .replace_all_text(&document.id, &replacements)
            .await?;
        info!(
            "Replaced {} placeholders in {}",
            replacements.len(),
            document.name
        );

        Ok(document)
    }

    /// Deletes every file in `folder_id` named exactly `name`. The whole
    /// listing is read before anything is deleted. Returns how many were
    /// removed.
    pub async fn remove_existing(&self, folder_id: &str, name: &str) -> AttendanceResult<usize> {
        let mut matches = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .store
                .list_files_in_folder(folder_id, page_token.as_deref())
                .await?;

            matches.extend(page.files.into_iter().filter(|f| f.name == name));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        for file in &matches {
            warn!("Deleting existing document {} ({})", file.name, file.id);
            self.store.delete_file(&file.id).await?;
        }

        Ok(matches.len())
    }

    pub async fn export(&self, document: &FileEntry) -> AttendanceResult<PathBuf> {
        let pdf = self.store.export_file_as_pdf(&document.id).await?;
        info!("Exported document {}, size: {} bytes", document.name, pdf.len());

        let path = self.output_dir.join(format!("{}.pdf", document.name));
        tokio::fs::write(&path, pdf).await?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}

/// Template name with its first [`MONTH_TOKEN`] replaced by `YYYYMM`.
pub fn target_name(template_name: &str, month: &TargetMonth) -> String {
    template_name.replacen(MONTH_TOKEN, &month.compact(), 1)
}

/// Mondays, Wednesdays and Fridays of `month` in order, at most
/// [`SLOT_CAPACITY`] of them.
pub fn attendance_slots(month: &TargetMonth) -> Vec<NaiveDate> {
    month
        .days()
        .filter(|d| SLOT_WEEKDAYS.contains(&d.weekday()))
        .take(SLOT_CAPACITY)
        .collect()
}

/// The full replacement batch. Every slot placeholder appears exactly once,
/// filled or blank.
pub fn placeholder_replacements(month: &TargetMonth) -> Vec<Replacement> {
    fill_placeholders(month, &attendance_slots(month))
}

/// Builds the batch for the given slot dates; slots past `slots.len()` are
/// blanked.
pub fn fill_placeholders(month: &TargetMonth, slots: &[NaiveDate]) -> Vec<Replacement> {
    let mut replacements = vec![
        Replacement::new("{{year}}", month.year().to_string()),
        Replacement::new("{{month}}", month.month().to_string()),
        Replacement::new("{{day}}", month.last_day().day().to_string()),
    ];

    let slots = &slots[..slots.len().min(SLOT_CAPACITY)];
    for (i, date) in slots.iter().enumerate() {
        let slot = i + 1;
        replacements.push(Replacement::new(
            format!("{{{{day{slot}}}}}"),
            format!("{}/{}", date.month(), date.day()),
        ));
        replacements.push(Replacement::new(
            format!("{{{{day{slot}Hours}}}}"),
            HOURS_PER_SLOT.to_string(),
        ));
    }

    replacements.push(Replacement::new(
        "{{totalHours}}",
        (slots.len() * HOURS_PER_SLOT).to_string(),
    ));

    for slot in slots.len() + 1..=SLOT_CAPACITY {
        replacements.push(Replacement::new(format!("{{{{day{slot}}}}}"), ""));
        replacements.push(Replacement::new(format!("{{{{day{slot}Hours}}}}"), ""));
    }

    replacements
}
