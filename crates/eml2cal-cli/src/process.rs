//! The per-email processing pipeline: extract, convert, augment, dedup.

use tracing::{debug, error};

use eml2cal_core::{augment, convert, Deduplicator, Event, EventEmailSummary, RunSummary};

use crate::config::Config;
use crate::error::RunResult;
use crate::extractor::{build_cmd, extract};
use crate::mailbox::RawMessage;
use crate::preprocess::preprocess_email;

/// Processes one email into valid calendar events.
///
/// Reservations that cannot become valid events are dropped and counted;
/// extractor or conversion failures bubble up as a per-email error.
pub async fn process_email(cmd: &str, raw: &[u8], config: &Config) -> RunResult<Vec<Event>> {
    let reservations = extract(cmd, raw).await?;
    if !reservations.is_empty() {
        debug!(count = reservations.len(), "found reservation objects");
    }

    let mut events = Vec::new();
    let mut rejected = 0usize;
    for reservation in &reservations {
        let res_type = reservation.type_name.as_deref().unwrap_or_default();
        match convert(reservation)? {
            Some(event) => {
                let event = augment(event, &config.postprocess, res_type);
                if event.is_valid() {
                    events.push(event);
                } else {
                    rejected += 1;
                }
            }
            None => rejected += 1,
        }
    }
    if rejected > 0 {
        debug!(rejected, "reservations could not become valid events");
    }
    Ok(events)
}

/// Processes every message, deduplicating events across the whole run.
pub async fn process_emails(
    messages: &[RawMessage],
    config: &Config,
    summary: &mut RunSummary,
) -> RunResult<Vec<Event>> {
    let cmd = build_cmd(&config.extractor)?;
    let mut events = Vec::new();
    let mut dedup = Deduplicator::new();
    for message in messages {
        let email_summary = message.summary();
        summary.checked.push(email_summary.clone());
        debug!(subject = ?email_summary.subject, "processing email");

        let raw = preprocess_email(&message.raw, &config.preprocess.headers);
        let new_events = match process_email(&cmd, &raw, config).await {
            Ok(events) => events,
            Err(e) => {
                error!(error = %e, subject = ?email_summary.subject, "failed to process email");
                summary.errors.push(email_summary);
                continue;
            }
        };

        let total = new_events.len();
        let mut uniques = 0usize;
        for event in new_events {
            if dedup.insert(&event) {
                events.push(event);
                uniques += 1;
            }
        }
        if total > 0 {
            summary.extracted.push(EventEmailSummary {
                email: email_summary,
                total_events: total,
                unique_events: uniques,
            });
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn config_with_extractor(json: &str) -> (Config, String) {
        let config = Config::default();
        let cmd = format!("printf '%s' '{}'", json.replace('\n', " "));
        (config, cmd)
    }

    fn message(raw: &[u8]) -> RawMessage {
        RawMessage {
            raw: raw.to_vec(),
            path: None,
        }
    }

    const FLIGHT_JSON: &str = r#"[{
        "@type": "FlightReservation",
        "reservationFor": {
            "flightNumber": "123",
            "airline": { "iataCode": "BA" },
            "departureTime": "2026-06-01T08:00:00Z",
            "arrivalAirport": { "iataCode": "JFK" }
        }
    }]"#;

    #[tokio::test]
    async fn single_email_yields_event() {
        let (config, cmd) = config_with_extractor(FLIGHT_JSON);
        let events = process_email(&cmd, b"raw", &config).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].summary.as_deref(),
            Some("Flight BA123: to JFK")
        );
        assert_eq!(
            events[0].start.map(|t| t.to_utc_datetime()),
            Some(Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn invalid_events_are_dropped() {
        // An event reservation with no time at all fails the validity gate.
        let (config, cmd) = config_with_extractor(
            r#"[{ "@type": "EventReservation", "reservationFor": { "name": "Thing" } }]"#,
        );
        let events = process_email(&cmd, b"raw", &config).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn duplicate_events_across_emails_collapse() {
        let mut config = Config::default();
        config.extractor.command = Some(format!(
            "printf '%s' '{}'",
            FLIGHT_JSON.replace('\n', " ")
        ));
        let messages = vec![message(b"Subject: a\r\n\r\n1"), message(b"Subject: b\r\n\r\n2")];
        let mut summary = eml2cal_core::RunSummary::new(Utc::now());
        let events = process_emails(&messages, &config, &mut summary)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(summary.checked.len(), 2);
        assert_eq!(summary.extracted.len(), 2);
        assert_eq!(summary.extracted[0].unique_events, 1);
        assert_eq!(summary.extracted[1].unique_events, 0);
    }

    #[tokio::test]
    async fn extractor_failure_records_error_and_continues() {
        let mut config = Config::default();
        config.extractor.command = Some("exit 2".to_string());
        let messages = vec![message(b"Subject: broken\r\n\r\nx")];
        let mut summary = eml2cal_core::RunSummary::new(Utc::now());
        let events = process_emails(&messages, &config, &mut summary)
            .await
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.checked.len(), 1);
    }
}
