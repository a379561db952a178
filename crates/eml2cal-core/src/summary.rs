//! Run summary accounting and plain-text report rendering.

use chrono::{DateTime, Utc};

use crate::event::Event;
use crate::time::EventTime;

/// Header facts of a processed (or attempted) email.
#[derive(Debug, Clone, Default)]
pub struct EmailSummary {
    pub date: Option<String>,
    pub from: Option<String>,
    pub subject: Option<String>,
}

/// Processing outcome for one email that yielded events.
#[derive(Debug, Clone)]
pub struct EventEmailSummary {
    pub email: EmailSummary,
    pub total_events: usize,
    pub unique_events: usize,
}

/// A skipped event and how many calendar entries it clashed with.
#[derive(Debug, Clone)]
pub struct EventSummary {
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub name: String,
    pub conflicts: usize,
}

impl EventSummary {
    pub fn from_event(event: &Event, conflicts: usize) -> Self {
        Self {
            start: event.start,
            end: event.end,
            name: event
                .summary
                .clone()
                .unwrap_or_else(|| "[no summary]".to_string()),
            conflicts,
        }
    }
}

/// Everything that happened during one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub checked: Vec<EmailSummary>,
    pub extracted: Vec<EventEmailSummary>,
    pub errors: Vec<EmailSummary>,
    pub conflicts: Vec<EventSummary>,
}

impl RunSummary {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: None,
            checked: Vec::new(),
            extracted: Vec::new(),
            errors: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn finish(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
    }

    /// Whether the run produced anything worth reporting.
    pub fn has_findings(&self) -> bool {
        !self.extracted.is_empty() || !self.errors.is_empty() || !self.conflicts.is_empty()
    }

    /// Renders the report body sent by email.
    pub fn to_text(&self) -> String {
        let total_events: usize = self.extracted.iter().map(|e| e.total_events).sum();
        let unique_events: usize = self.extracted.iter().map(|e| e.unique_events).sum();
        let mut lines = Vec::new();
        lines.push("eml2cal summary".to_string());
        lines.push(String::new());
        match self.end_time {
            Some(end) => lines.push(format!(
                "Running time: {} to {} ({})",
                self.start_time.format("%Y-%m-%d %H:%M:%S"),
                end.format("%Y-%m-%d %H:%M:%S"),
                format_elapsed(end - self.start_time),
            )),
            None => lines.push(format!(
                "Running time: {} (unfinished)",
                self.start_time.format("%Y-%m-%d %H:%M:%S"),
            )),
        }
        lines.push(String::new());
        lines.push(format!("Checked {} emails.", self.checked.len()));
        lines.push(format!(
            "Found {} events ({} unique) in {} emails.",
            total_events,
            unique_events,
            self.extracted.len(),
        ));
        lines.push(format!(
            "Encountered {} errors when trying to process emails.",
            self.errors.len(),
        ));
        lines.push(format!(
            "{} events not added due to conflicts in calendar.",
            self.conflicts.len(),
        ));
        lines.push(String::new());
        lines.push("Event emails:".to_string());
        for (i, entry) in self.extracted.iter().enumerate() {
            lines.push(format!("  {i}:"));
            lines.push(format!("    Received: {}", or_dash(&entry.email.date)));
            lines.push(format!("    From: {}", or_dash(&entry.email.from)));
            lines.push(format!("    Subject: {}", or_dash(&entry.email.subject)));
            lines.push(format!("    Total events: {}", entry.total_events));
            lines.push(format!("    Unique events: {}", entry.unique_events));
        }
        lines.push(String::new());
        lines.push("Conflicts:".to_string());
        for (i, event) in self.conflicts.iter().enumerate() {
            lines.push(format!("  {i}:"));
            lines.push(format!(
                "    Time: {} to {}",
                event
                    .start
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                event
                    .end
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ));
            lines.push(format!("    Name: {}", event.name));
            lines.push(format!("    Conflicts: {}", event.conflicts));
        }
        lines.join("\n")
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, h, min, s).unwrap()
    }

    fn sample() -> RunSummary {
        let mut summary = RunSummary::new(utc(9, 0, 0));
        summary.checked.push(EmailSummary::default());
        summary.checked.push(EmailSummary {
            date: Some("Fri, 1 May 2026 08:55:00 +0000".into()),
            from: Some("Airline <noreply@airline.example>".into()),
            subject: Some("Your booking".into()),
        });
        summary.extracted.push(EventEmailSummary {
            email: summary.checked[1].clone(),
            total_events: 2,
            unique_events: 1,
        });
        summary.conflicts.push(EventSummary {
            start: Some(EventTime::from_utc(utc(10, 0, 0))),
            end: None,
            name: "Flight BA123: Heathrow (LHR) to JFK".into(),
            conflicts: 1,
        });
        summary.finish(utc(9, 1, 30));
        summary
    }

    #[test]
    fn findings_gate() {
        let mut empty = RunSummary::new(utc(9, 0, 0));
        empty.checked.push(EmailSummary::default());
        assert!(!empty.has_findings());
        assert!(sample().has_findings());
    }

    #[test]
    fn text_report_layout() {
        let text = sample().to_text();
        assert!(text.starts_with("eml2cal summary\n"));
        assert!(text.contains(
            "Running time: 2026-05-01 09:00:00 to 2026-05-01 09:01:30 (0:01:30)"
        ));
        assert!(text.contains("Checked 2 emails."));
        assert!(text.contains("Found 2 events (1 unique) in 1 emails."));
        assert!(text.contains("Encountered 0 errors when trying to process emails."));
        assert!(text.contains("1 events not added due to conflicts in calendar."));
        assert!(text.contains("From: Airline <noreply@airline.example>"));
        assert!(text.contains("    Total events: 2"));
        assert!(text.contains("    Time: 2026-05-01 10:00:00 UTC to -"));
        assert!(text.contains("    Name: Flight BA123: Heathrow (LHR) to JFK"));
        assert!(text.contains("    Conflicts: 1"));
    }

    #[test]
    fn missing_headers_render_as_dash() {
        let mut summary = RunSummary::new(utc(9, 0, 0));
        summary.extracted.push(EventEmailSummary {
            email: EmailSummary::default(),
            total_events: 1,
            unique_events: 1,
        });
        summary.finish(utc(9, 0, 5));
        let text = summary.to_text();
        assert!(text.contains("    Received: -"));
        assert!(text.contains("    From: -"));
        assert!(text.contains("    Subject: -"));
    }
}
