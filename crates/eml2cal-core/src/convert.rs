//! Reservation-to-event converters, dispatched on the reservation type.

use thiserror::Error;
use tracing::debug;

use crate::event::Event;
use crate::schema::{Airport, Reservation};
use crate::time::TimeParseError;

/// Errors from converting a reservation into an event.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The reservation carries no `reservationFor` payload.
    #[error("reservation has no reservationFor")]
    MissingReservationFor,
    /// A date/time field could not be parsed.
    #[error(transparent)]
    Time(#[from] TimeParseError),
}

/// The converter selected for a reservation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationKind {
    Flight,
    Lodging,
    Generic,
}

impl ReservationKind {
    /// Maps a schema.org `@type` to a converter, falling back to generic.
    pub fn from_type(type_name: Option<&str>) -> Self {
        match type_name {
            Some("FlightReservation") => Self::Flight,
            Some("LodgingReservation") => Self::Lodging,
            _ => Self::Generic,
        }
    }
}

/// Converts a reservation into a calendar event draft.
///
/// Returns `Ok(None)` when the reservation cannot yield a usable event
/// (e.g. a flight with no departure time at all).
pub fn convert(reservation: &Reservation) -> Result<Option<Event>, ConvertError> {
    let kind = ReservationKind::from_type(reservation.type_name.as_deref());
    debug!(kind = ?kind, "converting reservation");
    match kind {
        ReservationKind::Flight => convert_flight(reservation),
        ReservationKind::Lodging => convert_lodging(reservation),
        ReservationKind::Generic => convert_generic(reservation).map(Some),
    }
}

/// Builds a display label for an airport from its name and IATA code.
pub fn airport_repr(name: Option<&str>, iata: Option<&str>) -> Option<String> {
    match (name, iata) {
        (Some(name), Some(code)) => Some(format!("{name} ({code})")),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(code)) => Some(code.to_string()),
        (None, None) => None,
    }
}

fn convert_generic(reservation: &Reservation) -> Result<Event, ConvertError> {
    let reserved = reservation
        .reservation_for
        .as_ref()
        .ok_or(ConvertError::MissingReservationFor)?;

    let mut description_lines = Vec::new();
    if let Some(number) = &reservation.reservation_number {
        description_lines.push(format!("Reservation number: {number}"));
    }
    for action in &reservation.potential_action {
        if let (Some(type_name), Some(target)) = (&action.type_name, &action.target) {
            let label = type_name.strip_suffix("Action").unwrap_or(type_name);
            description_lines.push(format!("{label}: {target}"));
        }
    }

    Ok(Event {
        summary: reserved.name.clone(),
        start: reservation.start()?,
        end: reservation.end()?,
        location: reservation.location(),
        geo: reservation.geo(),
        description: if description_lines.is_empty() {
            None
        } else {
            Some(description_lines.join("\n"))
        },
        ..Default::default()
    })
}

fn convert_flight(reservation: &Reservation) -> Result<Option<Event>, ConvertError> {
    let mut event = convert_generic(reservation)?;
    let reserved = reservation
        .reservation_for
        .as_ref()
        .ok_or(ConvertError::MissingReservationFor)?;

    if event.start.is_none() {
        event.start = match &reserved.departure_time {
            Some(value) => Some(value.to_event_time()?),
            None => reserved
                .departure_day
                .as_deref()
                .and_then(|day| chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .map(crate::time::EventTime::from_date),
        };
    }
    if event.start.is_none() {
        debug!("flight reservation has no departure time, skipping");
        return Ok(None);
    }
    if event.end.is_none() {
        if let Some(value) = &reserved.arrival_time {
            event.end = Some(value.to_event_time()?);
        }
    }

    let airline_iata = reserved
        .airline
        .as_ref()
        .and_then(|a| a.iata_code.as_deref())
        .unwrap_or_default();
    let flight_number = reserved.flight_number.as_deref().unwrap_or_default();
    let flight_id = format!("{airline_iata}{flight_number}");

    if let Some(departure) = &reserved.departure_airport {
        if let Some(location) = departure_location(reserved.departure_terminal.as_deref(), departure)
        {
            event.location = Some(location);
        }
        if let Some(geo) = &departure.geo {
            event.geo = Some((geo.latitude, geo.longitude));
        }
    }

    let origin = reserved
        .departure_airport
        .as_ref()
        .and_then(|a| airport_repr(a.name.as_deref(), a.iata_code.as_deref()));
    let destination = reserved
        .arrival_airport
        .as_ref()
        .and_then(|a| airport_repr(a.name.as_deref(), a.iata_code.as_deref()))
        .unwrap_or_else(|| "[unknown]".to_string());
    let mut summary = String::from("Flight");
    if !flight_id.is_empty() {
        summary.push_str(&format!(" {flight_id}"));
    }
    summary.push(':');
    if let Some(origin) = &origin {
        summary.push_str(&format!(" {origin}"));
    }
    summary.push_str(&format!(" to {destination}"));
    event.summary = Some(summary.clone());

    if let Some(number) = &reservation.reservation_number {
        event.description = Some(format!("{summary}\nReservation number: {number}"));
    }

    Ok(Some(event))
}

fn departure_location(terminal: Option<&str>, airport: &Airport) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(terminal) = terminal {
        parts.push(format!("Terminal {terminal}"));
    }
    if let Some(label) = airport_repr(airport.name.as_deref(), airport.iata_code.as_deref()) {
        parts.push(label);
    }
    if let Some(country) = airport
        .address
        .as_ref()
        .and_then(|a| a.address_country.as_deref())
    {
        parts.push(country.to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn convert_lodging(reservation: &Reservation) -> Result<Option<Event>, ConvertError> {
    let mut event = convert_generic(reservation)?;

    if event.start.is_none() {
        match &reservation.checkin_time {
            Some(value) => event.start = Some(value.to_event_time()?),
            None => {
                debug!("lodging reservation has no checkin time, skipping");
                return Ok(None);
            }
        }
    }
    if event.end.is_none() {
        if let Some(value) = &reservation.checkout_time {
            event.end = Some(value.to_event_time()?);
        }
    }

    Ok(Some(event))
}
