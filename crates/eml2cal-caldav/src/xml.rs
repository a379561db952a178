//! XML bodies and response parsing for the CalDAV REPORT operation.

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// DAV namespace
pub const DAV_NS: &str = "DAV:";
/// CalDAV namespace
pub const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";

/// Generates a REPORT request body for a calendar-query with a time-range
/// filter on VEVENT components.
pub fn calendar_query_body(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut query = BytesStart::new("c:calendar-query");
    query.push_attribute(("xmlns:d", DAV_NS));
    query.push_attribute(("xmlns:c", CALDAV_NS));
    writer.write_event(Event::Start(query)).unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("d:prop")))
        .unwrap();
    write_empty_element(&mut writer, "c:calendar-data");
    writer
        .write_event(Event::End(BytesEnd::new("d:prop")))
        .unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("c:filter")))
        .unwrap();

    let mut vcal_filter = BytesStart::new("c:comp-filter");
    vcal_filter.push_attribute(("name", "VCALENDAR"));
    writer.write_event(Event::Start(vcal_filter)).unwrap();

    let mut vevent_filter = BytesStart::new("c:comp-filter");
    vevent_filter.push_attribute(("name", "VEVENT"));
    writer.write_event(Event::Start(vevent_filter)).unwrap();

    let mut time_range = BytesStart::new("c:time-range");
    time_range.push_attribute(("start", format_time_range(start).as_str()));
    time_range.push_attribute(("end", format_time_range(end).as_str()));
    writer.write_event(Event::Empty(time_range)).unwrap();

    writer
        .write_event(Event::End(BytesEnd::new("c:comp-filter")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("c:comp-filter")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("c:filter")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("c:calendar-query")))
        .unwrap();

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

/// Parses a REPORT multistatus response into `(href, ics)` pairs.
pub fn parse_report_response(xml: &str) -> Vec<(String, String)> {
    let mut results = Vec::new();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current_href: Option<String> = None;
    let mut current_data: Option<String> = None;
    let mut in_response = false;
    let mut current_element: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match local_name(&name) {
                    "response" => {
                        in_response = true;
                        current_href = None;
                        current_data = None;
                    }
                    local @ ("href" | "calendar-data") => {
                        current_element = Some(local.to_string());
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if local_name(&name) == "response" && in_response {
                    if let (Some(href), Some(data)) = (current_href.take(), current_data.take()) {
                        results.push((href, data));
                    }
                    in_response = false;
                }
                current_element = None;
            }
            Ok(Event::Text(e)) => {
                if let Some(ref elem) = current_element {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match elem.as_str() {
                        "href" => current_href = Some(text),
                        "calendar-data" => current_data = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref elem) = current_element {
                    let text = String::from_utf8_lossy(&e).to_string();
                    match elem.as_str() {
                        "href" => current_href = Some(text),
                        "calendar-data" => current_data = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    results
}

fn write_empty_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) {
    writer
        .write_event(Event::Empty(BytesStart::new(name)))
        .unwrap();
}

/// Extracts the local name from a potentially namespaced element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn format_time_range(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn calendar_query_body_generation() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 1, 16, 0, 0).unwrap();

        let body = calendar_query_body(start, end);

        assert!(body.contains("calendar-query"));
        assert!(body.contains("calendar-data"));
        assert!(body.contains("time-range"));
        assert!(body.contains("20260601T080000Z"));
        assert!(body.contains("20260601T160000Z"));
        assert!(body.contains("VCALENDAR"));
        assert!(body.contains("VEVENT"));
    }

    #[test]
    fn parse_report_events() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<multistatus xmlns="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <response>
    <href>/cal/event1.ics</href>
    <propstat>
      <prop>
        <C:calendar-data>BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:event1@example.com
DTSTART:20260601T080000Z
DTEND:20260601T160000Z
SUMMARY:Existing flight
END:VEVENT
END:VCALENDAR</C:calendar-data>
      </prop>
      <status>HTTP/1.1 200 OK</status>
    </propstat>
  </response>
</multistatus>"#;

        let results = parse_report_response(xml);
        assert_eq!(results.len(), 1);
        let (href, data) = &results[0];
        assert_eq!(href, "/cal/event1.ics");
        assert!(data.contains("Existing flight"));
    }

    #[test]
    fn parse_empty_multistatus() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<multistatus xmlns="DAV:"/>"#;
        assert!(parse_report_response(xml).is_empty());
    }
}
