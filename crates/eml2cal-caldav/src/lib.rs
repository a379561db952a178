//! CalDAV client: conflict search and event upload

pub mod client;
pub mod config;
pub mod conflict;
pub mod error;
pub mod upload;
pub mod xml;

pub use client::CaldavClient;
pub use config::CaldavConfig;
pub use conflict::{find_conflicts, search_window, RemoteEvent};
pub use error::{CaldavError, CaldavResult};
pub use upload::upload_events;
