use serde::{Deserialize, Serialize};

use crate::ports::{CalendarEvent, EventStart};

// Response structs for the Calendar v3 events.list endpoint
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<Event>,
    pub time_zone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start: EventDateTime,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date: Option<String>,
    pub date_time: Option<String>,
}

impl From<Event> for CalendarEvent {
    fn from(event: Event) -> Self {
        CalendarEvent {
            id: event.id,
            summary: event.summary,
            start: EventStart {
                date_time: event.start.date_time,
                date: event.start.date,
            },
        }
    }
}
