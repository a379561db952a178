//! Core types: reservation schema, event model, converters, augmenter,
//! deduplication, run summary

pub mod augment;
pub mod convert;
pub mod dedup;
pub mod event;
pub mod schema;
pub mod summary;
pub mod time;

pub use augment::{augment, AugmentConfig, AugmentOptions};
pub use convert::{airport_repr, convert, ConvertError, ReservationKind};
pub use dedup::{dedup_events, Deduplicator};
pub use event::Event;
pub use schema::{Reservation, ReservedEvent, TimeValue};
pub use summary::{EmailSummary, EventEmailSummary, EventSummary, RunSummary};
pub use time::{format_ical_duration, parse_hms_duration, EventTime, TimeParseError};
