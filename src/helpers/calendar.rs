use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, RequestBuilder};
use tracing::info;

use crate::error::AttendanceResult;
use crate::helpers::google::{endpoint, send_json};
use crate::models::calendar::EventsResponse;
use crate::ports::{CalendarEvent, EventSource};

const CALENDARS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Google Calendar v3 backed [`EventSource`].
#[derive(Clone)]
pub struct GoogleCalendar {
    client: Client,
}

impl GoogleCalendar {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn list_events_request(
    client: &Client,
    calendar_id: &str,
    since: DateTime<FixedOffset>,
    max_results: u32,
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(CALENDARS_URL, &[calendar_id, "events"])?;
    Ok(client.get(url).query(&[
        ("showDeleted", "false".to_string()),
        ("singleEvents", "true".to_string()),
        ("timeMin", since.to_rfc3339()),
        ("maxResults", max_results.to_string()),
        ("orderBy", "startTime".to_string()),
    ]))
}

#[async_trait]
impl EventSource for GoogleCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        since: DateTime<FixedOffset>,
        max_results: u32,
    ) -> AttendanceResult<Vec<CalendarEvent>> {
        let request = list_events_request(&self.client, calendar_id, since, max_results)?;

        let response: EventsResponse = send_json(request, "list calendar events").await?;
        info!(
            "Successfully parsed calendar response with {} events (time zone {})",
            response.items.len(),
            response.time_zone.as_deref().unwrap_or("unknown")
        );
        Ok(response.items.into_iter().map(Into::into).collect())
    }
}
