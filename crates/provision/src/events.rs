//! Failure-reason extraction from a stack's event stream
//!
//! A terminal failed status on its own ("CREATE_FAILED") is rarely
//! actionable; the per-resource events carry the real causes. Events
//! arrive in chronological order and are processed in return order, which
//! also settles ties between simultaneous timestamps.

use indexmap::IndexMap;
use strata_core::{ResourceFailure, StackEvent};

/// Distil the failure-class events into one reason per resource.
///
/// The most recent failure event wins for each resource, and the result
/// is ordered by when each resource last failed, oldest first — so the
/// final entry is the most recently failed resource, the headline reason
/// for diagnostics.
#[must_use]
pub fn failure_reasons(events: &[StackEvent]) -> Vec<ResourceFailure> {
    let mut latest: IndexMap<&str, ResourceFailure> = IndexMap::new();
    for event in events {
        if !event.status.is_failure() {
            continue;
        }
        let failure = ResourceFailure {
            resource_id: event.resource_id.clone(),
            status: event.status,
            reason: event
                .reason
                .clone()
                .unwrap_or_else(|| "no reason reported".to_owned()),
        };
        // Re-insert so the map order tracks each resource's latest failure
        latest.shift_remove(event.resource_id.as_str());
        latest.insert(event.resource_id.as_str(), failure);
    }
    latest.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use strata_core::ResourceEventStatus;

    fn event(resource: &str, status: ResourceEventStatus, reason: Option<&str>, t: i64) -> StackEvent {
        StackEvent::new(
            resource,
            status,
            reason.map(str::to_owned),
            Utc.timestamp_opt(t, 0).unwrap(),
        )
    }

    #[test]
    fn keeps_latest_failure_per_resource() {
        let events = vec![
            event("ResA", ResourceEventStatus::CreateInProgress, None, 1),
            event(
                "ResA",
                ResourceEventStatus::CreateFailed,
                Some("quota exceeded"),
                2,
            ),
            event("ResB", ResourceEventStatus::CreateFailed, Some("dependency"), 3),
            event(
                "ResA",
                ResourceEventStatus::CreateFailed,
                Some("still over quota"),
                4,
            ),
        ];
        let reasons = failure_reasons(&events);
        assert_eq!(reasons.len(), 2);
        // ResB failed before ResA's latest failure
        assert_eq!(reasons[0].resource_id, "ResB");
        assert_eq!(reasons[1].resource_id, "ResA");
        assert_eq!(reasons[1].reason, "still over quota");
    }

    #[test]
    fn ties_break_by_return_order() {
        let events = vec![
            event("ResA", ResourceEventStatus::DeleteFailed, Some("in use"), 5),
            event("ResB", ResourceEventStatus::DeleteFailed, Some("in use"), 5),
        ];
        let reasons = failure_reasons(&events);
        assert_eq!(reasons.last().unwrap().resource_id, "ResB");
    }

    #[test]
    fn non_failure_events_are_ignored() {
        let events = vec![
            event("ResA", ResourceEventStatus::CreateInProgress, None, 1),
            event("ResA", ResourceEventStatus::CreateComplete, None, 2),
        ];
        assert!(failure_reasons(&events).is_empty());
    }

    #[test]
    fn missing_reason_gets_a_placeholder() {
        let events = vec![event("ResA", ResourceEventStatus::CreateFailed, None, 1)];
        assert_eq!(failure_reasons(&events)[0].reason, "no reason reported");
    }
}
