use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::{lenient, lenient_transcript};

/// A phone call as held by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub id: i64,
    pub call_sid: Option<String>,
    pub session_id: Option<String>,
    pub caller_name: Option<String>,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
    pub forwarded_from: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub is_starred: bool,
    pub status: String,
    pub recording_url: Option<String>,
    pub summary: Option<CallSummary>,
    pub transcript_messages: Vec<TranscriptMessage>,
    pub transcript_text: Option<String>,
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CallSummary {
    #[serde(default, alias = "callerName", deserialize_with = "lenient")]
    pub caller_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub notes: Option<String>,
    /// Anything else the summarizer produced.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptMessage {
    /// Identifier as sent by the server (numeric or string).
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub speaker: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, alias = "capturedAt", deserialize_with = "lenient")]
    pub captured_at: Option<String>,
}

/// A call record in the shape the `/calls` endpoint returns it.
///
/// Only `id` is required. Every other field falls back to its default when
/// it is missing, `null` or of an unexpected type.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCallRecord {
    pub id: i64,
    #[serde(default, alias = "callSid", deserialize_with = "lenient")]
    pub call_sid: Option<String>,
    #[serde(default, alias = "sessionId", deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(default, alias = "callerName", deserialize_with = "lenient")]
    pub caller_name: Option<String>,
    #[serde(default, alias = "fromNumber", deserialize_with = "lenient")]
    pub from_number: Option<String>,
    #[serde(default, alias = "toNumber", deserialize_with = "lenient")]
    pub to_number: Option<String>,
    #[serde(default, alias = "forwardedFrom", deserialize_with = "lenient")]
    pub forwarded_from: Option<String>,
    #[serde(default, alias = "startedAt", deserialize_with = "lenient")]
    pub started_at: Option<String>,
    #[serde(default, alias = "endedAt", deserialize_with = "lenient")]
    pub ended_at: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt", deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    #[serde(default, alias = "isStarred", deserialize_with = "lenient")]
    pub is_starred: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub status: String,
    #[serde(default, alias = "recordingUrl", deserialize_with = "lenient")]
    pub recording_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<CallSummary>,
    #[serde(
        default,
        alias = "transcriptMessages",
        deserialize_with = "lenient_transcript"
    )]
    pub transcript_messages: Vec<TranscriptMessage>,
    #[serde(default, alias = "transcriptText", deserialize_with = "lenient")]
    pub transcript_text: Option<String>,
    #[serde(default, alias = "durationSeconds", deserialize_with = "lenient")]
    pub duration_seconds: Option<i64>,
}

/// Pagination metadata attached to every `/calls` page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(alias = "per_page")]
    pub per_page: u32,
    #[serde(default, alias = "has_more")]
    pub has_more: bool,
    /// `None` marks the end of the stream.
    #[serde(default, alias = "next_cursor")]
    pub next_cursor: Option<String>,
    #[serde(default, alias = "prev_cursor")]
    pub prev_cursor: Option<String>,
}

/// One `/calls` page. Records stay raw here so that a single unreadable
/// record cannot fail the whole page; see [`crate::normalize::map_records`].
#[derive(Debug, Clone, Deserialize)]
pub struct CallPage {
    #[serde(default)]
    pub data: Vec<Value>,
    pub meta: PageMeta,
}

/// Saved ordering and collapsed state of the call detail sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPreferences {
    #[serde(alias = "sectionOrder")]
    pub section_order: Vec<String>,
    #[serde(alias = "collapsedSections")]
    pub collapsed_sections: BTreeMap<String, bool>,
}
