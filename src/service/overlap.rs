use std::collections::BTreeMap;

use crate::model::vacation::Vacation;

/// Closed intervals `[start, end]` intersect; touching ends count.
pub fn overlaps(a: &Vacation, b: &Vacation) -> bool {
    a.start_date <= b.end_date && a.end_date >= b.start_date
}

/// Every request that overlaps at least one other request, once each,
/// ordered by id. Requests sharing an id are treated as the same request.
pub fn find_overlapping(requests: &[Vacation]) -> Vec<Vacation> {
    let mut overlapping: BTreeMap<u64, &Vacation> = BTreeMap::new();

    for (i, request) in requests.iter().enumerate() {
        for other in &requests[i + 1..] {
            if request.id != other.id && overlaps(request, other) {
                overlapping.insert(request.id, request);
                overlapping.insert(other.id, other);
            }
        }
    }

    overlapping.into_values().cloned().collect()
}
