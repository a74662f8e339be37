use std::collections::HashMap;

use rating_ledger_shared::types::{LedgerEvent, RatedTarget};

/// Groups events by target, counting them.
///
/// Events without a target are skipped. The result is ordered by count
/// descending, then by the lowest event id of each group.
pub(crate) fn group_by_target(events: &[LedgerEvent]) -> Vec<RatedTarget> {
    let mut groups: HashMap<&str, RatedTarget> = HashMap::new();

    for event in events {
        let Some(target) = event.target.as_deref() else {
            continue;
        };
        let group = groups.entry(target).or_insert_with(|| RatedTarget {
            target: target.to_string(),
            score: 0,
            first_event_id: event.id,
        });
        group.score += 1;
        group.first_event_id = group.first_event_id.min(event.id);
    }

    let mut rated: Vec<RatedTarget> = groups.into_values().collect();
    rated.sort_by(RatedTarget::rank_order);
    rated
}
