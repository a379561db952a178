//! Conflict search against the remote calendar.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use icalendar::{Calendar, CalendarComponent, Component};
use tracing::{debug, warn};

use eml2cal_core::{Event, EventTime};

use crate::client::CaldavClient;
use crate::error::{CaldavError, CaldavResult};
use crate::xml::{calendar_query_body, parse_report_response};

/// A VEVENT found on the remote calendar.
#[derive(Debug, Clone)]
pub struct RemoteEvent {
    pub uid: Option<String>,
    pub summary: Option<String>,
}

/// Computes the `(start, end)` window used to search for conflicts.
///
/// All-day starts widen to the whole day; all-day ends become the midnight
/// after (end-exclusive). An event with a datetime start and no end is
/// searched as `(start - 1s, start + 1s)`, since servers treat the start
/// bound as exclusive for zero-length windows.
pub fn search_window(event: &Event) -> CaldavResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = event.start.ok_or(CaldavError::MissingStart)?;
    let mut end = event.end;

    let mut window_start = start.to_utc_datetime();
    if let EventTime::AllDay(date) = start {
        window_start = midnight(date);
        if end.is_none() {
            return Ok((window_start, window_start + Duration::days(1)));
        }
    }
    let window_end = match end.take() {
        Some(EventTime::AllDay(date)) => midnight(date) + Duration::days(1),
        Some(EventTime::DateTime(dt)) => dt,
        None => {
            let end = window_start + Duration::seconds(1);
            window_start -= Duration::seconds(1);
            end
        }
    };
    Ok((window_start, window_end))
}

/// Searches the calendar for events overlapping the candidate's window.
pub async fn find_conflicts(
    client: &CaldavClient,
    event: &Event,
) -> CaldavResult<Vec<RemoteEvent>> {
    let (start, end) = search_window(event)?;
    debug!(start = %start, end = %end, "searching for conflicts");
    let response = client.report(&calendar_query_body(start, end)).await?;

    let mut conflicts = Vec::new();
    for (href, ics) in parse_report_response(&response) {
        match ics.parse::<Calendar>() {
            Ok(calendar) => {
                for component in &calendar.components {
                    if let CalendarComponent::Event(vevent) = component {
                        conflicts.push(RemoteEvent {
                            uid: vevent.get_uid().map(ToOwned::to_owned),
                            summary: vevent.get_summary().map(ToOwned::to_owned),
                        });
                    }
                }
            }
            Err(error) => {
                warn!(href = %href, error = %error, "skipping unparseable calendar data");
            }
        }
    }
    Ok(conflicts)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).expect("valid time").and_utc()
}
