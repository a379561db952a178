//! Typed view over the extractor's schema.org JSON-LD output.
//!
//! Every field the converters touch is modelled as an `Option` so that a
//! sparsely-populated reservation deserializes without error and missing
//! links resolve to `None` instead of panicking.

use serde::Deserialize;

use crate::time::{EventTime, TimeParseError};

/// A time value as emitted by the extractor.
///
/// Either a plain ISO-8601 string, or an object carrying the value plus an
/// IANA timezone name to interpret naive values in.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Plain(String),
    Tagged {
        #[serde(rename = "@value")]
        value: String,
        timezone: Option<String>,
    },
}

impl TimeValue {
    /// Resolves this value to an [`EventTime`].
    pub fn to_event_time(&self) -> Result<EventTime, TimeParseError> {
        match self {
            Self::Plain(value) => EventTime::parse(value, None),
            Self::Tagged { value, timezone } => EventTime::parse(value, timezone.as_deref()),
        }
    }
}

/// Geographic coordinates.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A postal address.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street_address: Option<String>,
    pub address_locality: Option<String>,
    pub postal_code: Option<String>,
    pub address_country: Option<String>,
}

impl PostalAddress {
    /// Joins the present address parts with `". "`.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.street_address.as_deref(),
            self.address_locality.as_deref(),
            self.postal_code.as_deref(),
            self.address_country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(". "))
        }
    }
}

/// A place with an optional address and coordinates.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub address: Option<PostalAddress>,
    pub geo: Option<GeoCoordinates>,
}

/// An airline, of which only the IATA code is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airline {
    pub iata_code: Option<String>,
}

/// An airport with its label fields, coordinates, and address.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub name: Option<String>,
    pub iata_code: Option<String>,
    pub geo: Option<GeoCoordinates>,
    pub address: Option<PostalAddress>,
}

/// A schema.org action attached to a reservation (check-in link etc.).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialAction {
    #[serde(rename = "@type")]
    pub type_name: Option<String>,
    pub target: Option<String>,
}

/// The thing a reservation is for (a flight, a hotel stay, an event).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedEvent {
    pub name: Option<String>,
    pub start_time: Option<TimeValue>,
    pub start_date: Option<TimeValue>,
    pub end_time: Option<TimeValue>,
    pub end_date: Option<TimeValue>,
    pub departure_time: Option<TimeValue>,
    pub departure_day: Option<String>,
    pub arrival_time: Option<TimeValue>,
    pub airline: Option<Airline>,
    pub flight_number: Option<String>,
    pub departure_airport: Option<Airport>,
    pub arrival_airport: Option<Airport>,
    pub departure_terminal: Option<String>,
    pub address: Option<PostalAddress>,
    pub location: Option<Place>,
    pub geo: Option<GeoCoordinates>,
}

/// A top-level reservation record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(rename = "@type")]
    pub type_name: Option<String>,
    pub reservation_for: Option<ReservedEvent>,
    pub reservation_number: Option<String>,
    #[serde(default)]
    pub potential_action: Vec<PotentialAction>,
    pub start_time: Option<TimeValue>,
    pub start_date: Option<TimeValue>,
    pub end_time: Option<TimeValue>,
    pub end_date: Option<TimeValue>,
    pub checkin_time: Option<TimeValue>,
    pub checkout_time: Option<TimeValue>,
}

impl Reservation {
    /// Resolves the reservation's start time.
    ///
    /// Resolution order: own `startTime`, own `startDate`, then the
    /// reserved event's `startTime` and `startDate`. The first present
    /// candidate wins.
    pub fn start(&self) -> Result<Option<EventTime>, TimeParseError> {
        let candidates = [
            self.start_time.as_ref(),
            self.start_date.as_ref(),
            self.reservation_for
                .as_ref()
                .and_then(|r| r.start_time.as_ref()),
            self.reservation_for
                .as_ref()
                .and_then(|r| r.start_date.as_ref()),
        ];
        resolve_first(candidates)
    }

    /// Resolves the reservation's end time, symmetric to [`Self::start`].
    pub fn end(&self) -> Result<Option<EventTime>, TimeParseError> {
        let candidates = [
            self.end_time.as_ref(),
            self.end_date.as_ref(),
            self.reservation_for
                .as_ref()
                .and_then(|r| r.end_time.as_ref()),
            self.reservation_for
                .as_ref()
                .and_then(|r| r.end_date.as_ref()),
        ];
        resolve_first(candidates)
    }

    /// Resolves a display location from the reserved event's address, or
    /// the address of its nested location.
    pub fn location(&self) -> Option<String> {
        let reserved = self.reservation_for.as_ref()?;
        let address = reserved
            .address
            .as_ref()
            .or_else(|| reserved.location.as_ref().and_then(|p| p.address.as_ref()))?;
        address.display()
    }

    /// Resolves geographic coordinates from the reserved event or its
    /// nested location.
    pub fn geo(&self) -> Option<(f64, f64)> {
        let reserved = self.reservation_for.as_ref()?;
        reserved
            .geo
            .as_ref()
            .or_else(|| reserved.location.as_ref().and_then(|p| p.geo.as_ref()))
            .map(|g| (g.latitude, g.longitude))
    }
}

fn resolve_first(
    candidates: [Option<&TimeValue>; 4],
) -> Result<Option<EventTime>, TimeParseError> {
    for value in candidates.into_iter().flatten() {
        return value.to_event_time().map(Some);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn parse(json: &str) -> Reservation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserialize_flight_reservation() {
        let res = parse(
            r#"{
                "@type": "FlightReservation",
                "reservationNumber": "ABC123",
                "reservationFor": {
                    "@type": "Flight",
                    "flightNumber": "123",
                    "airline": { "@type": "Airline", "iataCode": "BA" },
                    "departureAirport": {
                        "@type": "Airport",
                        "name": "Heathrow",
                        "iataCode": "LHR"
                    },
                    "departureTime": {
                        "@type": "QDateTime",
                        "@value": "2026-06-01T09:00:00+01:00",
                        "timezone": "Europe/London"
                    }
                }
            }"#,
        );
        assert_eq!(res.type_name.as_deref(), Some("FlightReservation"));
        let reserved = res.reservation_for.unwrap();
        assert_eq!(reserved.flight_number.as_deref(), Some("123"));
        assert_eq!(
            reserved.airline.unwrap().iata_code.as_deref(),
            Some("BA")
        );
        let departure = reserved.departure_time.unwrap().to_event_time().unwrap();
        assert_eq!(
            departure.to_utc_datetime(),
            Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn start_prefers_own_time_over_reserved_event() {
        let res = parse(
            r#"{
                "@type": "EventReservation",
                "startTime": "2026-03-10T18:00:00Z",
                "reservationFor": {
                    "name": "Concert",
                    "startTime": "2026-03-10T19:00:00Z"
                }
            }"#,
        );
        let start = res.start().unwrap().unwrap();
        assert_eq!(
            start.to_utc_datetime(),
            Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn start_falls_back_to_reserved_event_date() {
        let res = parse(
            r#"{
                "@type": "EventReservation",
                "reservationFor": {
                    "name": "Festival",
                    "startDate": "2026-07-04"
                }
            }"#,
        );
        let start = res.start().unwrap().unwrap();
        assert_eq!(
            start.as_date(),
            Some(&NaiveDate::from_ymd_opt(2026, 7, 4).unwrap())
        );
    }

    #[test]
    fn absent_times_resolve_to_none() {
        let res = parse(r#"{ "@type": "EventReservation", "reservationFor": {} }"#);
        assert!(res.start().unwrap().is_none());
        assert!(res.end().unwrap().is_none());
    }

    #[test]
    fn location_joins_present_parts() {
        let res = parse(
            r#"{
                "reservationFor": {
                    "address": {
                        "streetAddress": "1 Main St",
                        "addressLocality": "Springfield",
                        "addressCountry": "US"
                    }
                }
            }"#,
        );
        assert_eq!(
            res.location().as_deref(),
            Some("1 Main St. Springfield. US")
        );
    }

    #[test]
    fn location_falls_back_to_nested_place() {
        let res = parse(
            r#"{
                "reservationFor": {
                    "location": {
                        "address": { "addressLocality": "Lyon" },
                        "geo": { "latitude": 45.76, "longitude": 4.84 }
                    }
                }
            }"#,
        );
        assert_eq!(res.location().as_deref(), Some("Lyon"));
        assert_eq!(res.geo(), Some((45.76, 4.84)));
    }

    #[test]
    fn empty_address_yields_no_location() {
        let res = parse(r#"{ "reservationFor": { "address": {} } }"#);
        assert!(res.location().is_none());
    }

    #[test]
    fn tagged_time_value_uses_timezone() {
        let res = parse(
            r#"{
                "startTime": {
                    "@value": "2026-05-01T10:00:00",
                    "timezone": "Europe/Paris"
                }
            }"#,
        );
        let start = res.start().unwrap().unwrap();
        assert_eq!(
            start.to_utc_datetime(),
            Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
        );
    }
}
