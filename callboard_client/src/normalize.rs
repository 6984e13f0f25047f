use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{CallRecord, ServerCallRecord, TranscriptMessage};

/// Maps a wire record into the client shape. Never fails: absent optional
/// fields become `None`, and a missing transcript becomes an empty list.
pub fn map_record(record: ServerCallRecord) -> CallRecord {
    CallRecord {
        id: record.id,
        call_sid: record.call_sid,
        session_id: record.session_id,
        caller_name: record.caller_name,
        from_number: record.from_number,
        to_number: record.to_number,
        forwarded_from: record.forwarded_from,
        started_at: record.started_at,
        ended_at: record.ended_at,
        created_at: record.created_at,
        updated_at: record.updated_at,
        is_starred: record.is_starred,
        status: record.status,
        recording_url: record.recording_url,
        summary: record.summary,
        transcript_messages: record.transcript_messages,
        transcript_text: record.transcript_text,
        duration_seconds: record.duration_seconds,
    }
}

/// Normalizes the raw `data` array of a page. Only entries without an
/// integer `id` are skipped; everything else in a record is defaulted field
/// by field.
pub fn map_records(raw: Vec<Value>) -> Vec<CallRecord> {
    raw.into_iter()
        .filter_map(|item| match serde_json::from_value::<ServerCallRecord>(item) {
            Ok(record) => Some(map_record(record)),
            Err(err) => {
                tracing::warn!(error = %err, "skipping call record without a usable id");
                None
            }
        })
        .collect()
}

/// Reads a field, falling back to `T::default()` when the value is `null`
/// or has an unexpected type.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Accepts anything for `transcript_messages`; only a sequence produces
/// messages. `null`, objects and scalars all collapse to an empty list.
pub(crate) fn lenient_transcript<'de, D>(
    deserializer: D,
) -> Result<Vec<TranscriptMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let Value::Array(items) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(message) => Some(message),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable transcript entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> ServerCallRecord {
        serde_json::from_value(value).expect("server record")
    }

    #[test]
    fn missing_transcript_becomes_empty() {
        let record = map_record(decode(json!({"id": 7, "status": "completed"})));
        assert!(record.transcript_messages.is_empty());
        assert_eq!(record.status, "completed");
        assert_eq!(record.caller_name, None);
        assert!(!record.is_starred);
    }

    #[test]
    fn non_sequence_transcript_becomes_empty() {
        for raw in [json!(null), json!("hello"), json!({"0": "x"}), json!(3)] {
            let record = map_record(decode(json!({"id": 1, "transcript_messages": raw})));
            assert!(record.transcript_messages.is_empty());
        }
    }

    #[test]
    fn null_and_mistyped_fields_fall_back() {
        let record = map_record(decode(json!({
            "id": 2,
            "status": null,
            "is_starred": 1,
            "caller_name": 42,
            "duration_seconds": "95",
            "summary": "text",
            "started_at": ["2024"],
            "recording_url": null,
            "transcript_messages": [{"id": 1, "speaker": 9, "content": "hi"}]
        })));
        assert_eq!(record.id, 2);
        assert_eq!(record.status, "");
        assert!(!record.is_starred);
        assert_eq!(record.caller_name, None);
        assert_eq!(record.duration_seconds, None);
        assert_eq!(record.summary, None);
        assert_eq!(record.started_at, None);
        assert_eq!(record.recording_url, None);
        assert_eq!(record.transcript_messages.len(), 1);
        assert_eq!(record.transcript_messages[0].speaker, None);
        assert_eq!(record.transcript_messages[0].content.as_deref(), Some("hi"));
    }

    #[test]
    fn bad_records_do_not_sink_good_ones() {
        let records = map_records(vec![
            json!({"id": 1, "status": "completed"}),
            json!({"id": 2, "status": null, "is_starred": null}),
            json!({"id": 3, "summary": "text", "duration_seconds": "95"}),
            json!({"status": "completed"}),
            json!("junk"),
        ]);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(records[0].status, "completed");
    }

    #[test]
    fn copies_fields_verbatim() {
        let record = map_record(decode(json!({
            "id": 42,
            "call_sid": "CA123",
            "session_id": "s-9",
            "caller_name": "Robin",
            "from_number": "+15550001",
            "to_number": "+15550002",
            "forwarded_from": "+15550003",
            "started_at": "2024-03-01T10:00:00Z",
            "ended_at": "not a timestamp",
            "is_starred": true,
            "status": "voicemail",
            "recording_url": "https://cdn.example/r.mp3",
            "summary": {"caller_name": "Robin", "reason": "refund", "notes": null, "urgency": 2},
            "transcript_messages": [
                {"id": 1, "speaker": "caller", "content": "hi", "captured_at": "t0"},
                {"id": "m-2", "speaker": "agent", "content": "hello", "capturedAt": "t1"}
            ],
            "transcript_text": "caller: hi",
            "duration_seconds": 95
        })));

        assert_eq!(record.id, 42);
        assert_eq!(record.call_sid.as_deref(), Some("CA123"));
        assert_eq!(record.ended_at.as_deref(), Some("not a timestamp"));
        assert!(record.is_starred);
        assert_eq!(record.duration_seconds, Some(95));
        assert_eq!(record.transcript_messages.len(), 2);
        assert_eq!(record.transcript_messages[1].id, json!("m-2"));
        assert_eq!(
            record.transcript_messages[1].captured_at.as_deref(),
            Some("t1")
        );
        let summary = record.summary.expect("summary");
        assert_eq!(summary.reason.as_deref(), Some("refund"));
        assert_eq!(summary.extra.get("urgency"), Some(&json!(2)));
    }

    #[test]
    fn accepts_camel_case_records() {
        let record = map_record(decode(json!({
            "id": 3,
            "callerName": "Ari",
            "toNumber": "+1555",
            "isStarred": true,
            "transcriptMessages": [{"id": 1, "speaker": "agent", "content": "ok"}]
        })));
        assert_eq!(record.caller_name.as_deref(), Some("Ari"));
        assert_eq!(record.to_number.as_deref(), Some("+1555"));
        assert!(record.is_starred);
        assert_eq!(record.transcript_messages.len(), 1);
    }
}
