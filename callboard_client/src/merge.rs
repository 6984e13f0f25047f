use std::collections::HashSet;

use crate::models::CallRecord;

/// Combines a freshly fetched page with the records already held.
///
/// With `append == false` the page replaces what was held. With
/// `append == true` the page is added after the held records. Either way
/// the result holds each id once: the first occurrence wins and relative
/// order of first occurrences is preserved.
pub fn merge_records(
    existing: Vec<CallRecord>,
    incoming: Vec<CallRecord>,
    append: bool,
) -> Vec<CallRecord> {
    let combined = if append {
        let mut combined = existing;
        combined.extend(incoming);
        combined
    } else {
        incoming
    };
    dedup_first_seen(combined)
}

fn dedup_first_seen(records: Vec<CallRecord>) -> Vec<CallRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: i64, status: &str) -> CallRecord {
        CallRecord {
            id,
            call_sid: None,
            session_id: None,
            caller_name: None,
            from_number: None,
            to_number: None,
            forwarded_from: None,
            started_at: None,
            ended_at: None,
            created_at: None,
            updated_at: None,
            is_starred: false,
            status: status.to_string(),
            recording_url: None,
            summary: None,
            transcript_messages: Vec::new(),
            transcript_text: None,
            duration_seconds: None,
        }
    }

    fn ids(records: &[CallRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn replace_discards_existing() {
        let existing = vec![record(1, "a"), record(2, "a")];
        let merged = merge_records(existing, vec![record(3, "b"), record(4, "b")], false);
        assert_eq!(ids(&merged), vec![3, 4]);
    }

    #[test]
    fn replace_still_dedups_page() {
        let merged = merge_records(
            Vec::new(),
            vec![record(5, "first"), record(5, "second"), record(6, "x")],
            false,
        );
        assert_eq!(ids(&merged), vec![5, 6]);
        assert_eq!(merged[0].status, "first");
    }

    #[test]
    fn append_keeps_first_seen_copy() {
        let existing = vec![record(1, "old"), record(2, "old")];
        let incoming = vec![record(2, "new"), record(3, "new")];
        let merged = merge_records(existing, incoming, true);
        assert_eq!(ids(&merged), vec![1, 2, 3]);
        assert_eq!(merged[1].status, "old");
    }

    #[test]
    fn append_onto_empty() {
        let merged = merge_records(Vec::new(), vec![record(9, "x")], true);
        assert_eq!(ids(&merged), vec![9]);
    }
}
