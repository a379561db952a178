//! Invocation of the external reservation extractor.
//!
//! The extractor (kitinerary-extractor or compatible) reads a raw email on
//! stdin and writes a JSON array of schema.org objects to stdout.

use serde_json::Value;
use tracing::debug;

use eml2cal_core::Reservation;

use crate::command::run_command;
use crate::config::ExtractorSettings;
use crate::error::{RunError, RunResult};

/// Builds the extractor command line from the configuration.
pub fn build_cmd(settings: &ExtractorSettings) -> RunResult<String> {
    let mut cmd = settings
        .command
        .clone()
        .ok_or_else(|| RunError::Config("extractor command not configured".to_string()))?;
    if let Some(path) = &settings.additional_extractors {
        cmd.push_str(" --additional-search-path ");
        cmd.push_str(path);
    }
    Ok(cmd)
}

/// Runs the extractor on a raw email and returns the reservations found.
///
/// Output items without a `reservationFor` key are not reservations (the
/// extractor also emits airports, trips and the like) and are filtered out.
pub async fn extract(cmd: &str, email: &[u8]) -> RunResult<Vec<Reservation>> {
    let output = run_command(cmd, email).await?;
    let things: Vec<Value> = serde_json::from_slice(&output)?;
    let total = things.len();
    let reservations = things
        .into_iter()
        .filter(is_reservation)
        .map(serde_json::from_value)
        .collect::<Result<Vec<Reservation>, _>>()?;
    debug!(
        reservations = reservations.len(),
        total, "extractor returned objects"
    );
    Ok(reservations)
}

fn is_reservation(value: &Value) -> bool {
    value.get("reservationFor").is_some()
}
