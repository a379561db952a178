//! Conflict-aware event upload.

use tracing::{debug, error, info};
use uuid::Uuid;

use eml2cal_core::{Event, EventSummary, RunSummary};

use crate::client::CaldavClient;
use crate::conflict::find_conflicts;
use crate::error::CaldavResult;

/// Uploads events one at a time, skipping any that conflict with events
/// already on the calendar.
///
/// Conflicting events are recorded in the summary; a transport or
/// credential failure aborts the run with already-uploaded events left in
/// place. Returns the events that were uploaded.
pub async fn upload_events(
    client: &CaldavClient,
    events: Vec<Event>,
    summary: &mut RunSummary,
) -> CaldavResult<Vec<Event>> {
    let pacing = client.config().pacing;
    let mut added = Vec::new();
    for event in events {
        let name = event.summary.as_deref().unwrap_or("[no summary]");
        let conflicts = find_conflicts(client, &event).await?;
        if conflicts.is_empty() {
            let uid = Uuid::new_v4().to_string();
            client.put_event(&uid, &event.to_ics(&uid)).await?;
            debug!(event = %name, uid = %uid, "added event to calendar");
            added.push(event);
        } else {
            error!(
                event = %name,
                conflicts = conflicts.len(),
                "event conflicts with calendar entries, not adding"
            );
            summary
                .conflicts
                .push(EventSummary::from_event(&event, conflicts.len()));
        }
        tokio::time::sleep(pacing).await;
    }
    info!(
        added = added.len(),
        conflicts = summary.conflicts.len(),
        url = %client.config().url_str(),
        "finished saving events"
    );
    Ok(added)
}
