use chrono::{DateTime, NaiveDate};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::{AttendanceError, AttendanceResult};
use crate::month::TargetMonth;
use crate::ports::{CalendarEvent, EventSource};

/// Upper bound on events fetched per run.
pub const MAX_EVENTS: u32 = 999;

/// Reduces calendar events to the set of work days inside a month.
pub struct WorkDayExtractor<'a, E: EventSource> {
    source: &'a E,
    calendar_id: &'a str,
}

impl<'a, E: EventSource> WorkDayExtractor<'a, E> {
    pub fn new(source: &'a E, calendar_id: &'a str) -> Self {
        Self {
            source,
            calendar_id,
        }
    }

    /// Dates in `month` that carry at least one event accepted by `is_work_day`.
    ///
    /// Every fetched event must have a parseable start, even those that are
    /// later filtered out.
    pub async fn extract<F>(
        &self,
        month: &TargetMonth,
        is_work_day: F,
    ) -> AttendanceResult<BTreeSet<NaiveDate>>
    where
        F: Fn(&CalendarEvent) -> bool,
    {
        let since = month.query_lower_bound();
        info!(
            "Fetching events of calendar {} since {}",
            self.calendar_id,
            since.to_rfc3339()
        );

        let events = self
            .source
            .list_events(self.calendar_id, since, MAX_EVENTS)
            .await?;
        info!("Received {} calendar events", events.len());

        let mut work_days = BTreeSet::new();
        for event in &events {
            let date = event_date(event)?;
            if !month.contains(date) {
                continue;
            }
            if is_work_day(event) {
                debug!("Event {} marks {} as a work day", event.id, date);
                work_days.insert(date);
            }
        }

        info!("Found {} work days in {}", work_days.len(), month);
        Ok(work_days)
    }
}

/// Predicate matching events whose summary equals `title` exactly.
pub fn title_is(title: &str) -> impl Fn(&CalendarEvent) -> bool + '_ {
    move |event| event.summary == title
}

/// Calendar date an event starts on. Timed events use the offset of their
/// own timestamp.
pub fn event_date(event: &CalendarEvent) -> AttendanceResult<NaiveDate> {
    match (&event.start.date_time, &event.start.date) {
        (Some(date_time), _) if !date_time.is_empty() => DateTime::parse_from_rfc3339(date_time)
            .map(|d| d.date_naive())
            .map_err(|source| AttendanceError::EventDate {
                value: date_time.clone(),
                source,
            }),
        (_, Some(date)) => NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| {
            AttendanceError::EventDate {
                value: date.clone(),
                source,
            }
        }),
        _ => Err(AttendanceError::MissingEventStart(event.id.clone())),
    }
}
