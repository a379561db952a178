//! The calendar event model produced by the converters.

use chrono::Duration;
use icalendar::{
    Alarm, Calendar, Component, Event as IcalEvent, EventLike, Property, Trigger,
};

use crate::time::{format_ical_duration, EventTime};

/// A calendar event draft.
///
/// Converters produce one of these per reservation; the augmenter returns a
/// new value with the configured additions applied. Alarm offsets are stored
/// as negative durations relative to the event start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub summary: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub duration: Option<Duration>,
    pub location: Option<String>,
    pub geo: Option<(f64, f64)>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub attendees: Vec<String>,
    pub alarms: Vec<Duration>,
}

impl Event {
    /// An event is usable only with both a summary and a start time.
    pub fn is_valid(&self) -> bool {
        self.summary.is_some() && self.start.is_some()
    }

    /// The `(start, end)` pair used for duplicate detection.
    pub fn time_key(&self) -> (Option<EventTime>, Option<EventTime>) {
        (self.start, self.end)
    }

    /// Serializes the event as a VCALENDAR containing a single VEVENT.
    pub fn to_ics(&self, uid: &str) -> String {
        let mut vevent = IcalEvent::new();
        vevent.uid(uid);
        if let Some(summary) = &self.summary {
            vevent.summary(summary);
        }
        if let Some(start) = &self.start {
            match start {
                EventTime::DateTime(dt) => vevent.starts(*dt),
                EventTime::AllDay(date) => vevent.starts(*date),
            };
        }
        if let Some(end) = &self.end {
            match end {
                EventTime::DateTime(dt) => vevent.ends(*dt),
                EventTime::AllDay(date) => vevent.ends(*date),
            };
        }
        if let Some(duration) = self.duration {
            vevent.append_property(Property::new(
                "DURATION",
                format_ical_duration(duration),
            ));
        }
        if let Some(location) = &self.location {
            vevent.location(location);
        }
        if let Some((lat, lon)) = self.geo {
            vevent.append_property(Property::new("GEO", format!("{lat};{lon}")));
        }
        if let Some(description) = &self.description {
            vevent.description(description);
        }
        if !self.categories.is_empty() {
            vevent.append_property(Property::new("CATEGORIES", self.categories.join(",")));
        }
        for attendee in &self.attendees {
            vevent.append_property(
                Property::new("ATTENDEE", format!("mailto:{attendee}"))
                    .add_parameter("ROLE", "REQ-PARTICIPANT")
                    .done(),
            );
        }
        for offset in &self.alarms {
            // Offsets are stored negative; before_start expects the positive
            // lead time and serializes the trigger with a minus sign.
            vevent.alarm(Alarm::audio(Trigger::before_start(-*offset)));
        }
        let mut calendar = Calendar::new();
        calendar.push(vevent.done());
        calendar.to_string()
    }
}
