use std::collections::BTreeMap;

use serde_json::Value;

/// Filters accepted by the `/calls` endpoint. Every field is optional;
/// `starred` is tri-state so `Some(false)` is a real filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub status: Option<String>,
    pub starred: Option<bool>,
    pub search: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub to_number: Option<String>,
}

impl FilterSet {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_starred(mut self, starred: bool) -> Self {
        self.starred = Some(starred);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_to_number(mut self, to_number: impl Into<String>) -> Self {
        self.to_number = Some(to_number.into());
        self
    }

    /// Text filters in wire order, paired with their camelCase key name and
    /// snake_case wire name. Empty strings count as unset.
    fn text_fields(&self) -> [(&'static str, &'static str, Option<&str>); 5] {
        [
            ("status", "status", present(&self.status)),
            ("search", "search", present(&self.search)),
            ("after", "after", present(&self.after)),
            ("before", "before", present(&self.before)),
            ("toNumber", "to_number", present(&self.to_number)),
        ]
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Canonical key for a filter set, used to index stored cursors.
///
/// Keys are sorted and unset fields are left out, so two filter sets that
/// set the same values always produce the same key no matter how they were
/// built. `{status: "completed"}` becomes `{"status":"completed"}`.
pub fn build_filter_key(filters: &FilterSet) -> String {
    let mut fields: BTreeMap<&str, Value> = BTreeMap::new();
    for (key, _, value) in filters.text_fields() {
        if let Some(value) = value {
            fields.insert(key, Value::String(value.to_string()));
        }
    }
    if let Some(starred) = filters.starred {
        fields.insert("starred", Value::Bool(starred));
    }

    let mut out = String::from("{");
    for (index, (key, value)) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&Value::String((*key).to_string()).to_string());
        out.push(':');
        out.push_str(&value.to_string());
    }
    out.push('}');
    out
}

/// Builds the query string for `GET /calls`. Returns `""` when nothing
/// applies, otherwise a string starting with `?`.
pub fn build_query_string(filters: &FilterSet, cursor: Option<&str>, limit: Option<u32>) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(limit) = limit.filter(|l| *l != 0) {
        params.push(("limit", limit.to_string()));
    }
    if let Some(cursor) = cursor {
        params.push(("cursor", cursor.to_string()));
    }

    for (_, name, value) in filters.text_fields() {
        if let Some(value) = value {
            params.push((name, value.to_string()));
        }
    }
    if let Some(starred) = filters.starred {
        params.push(("starred", if starred { "1" } else { "0" }.to_string()));
    }

    if params.is_empty() {
        return String::new();
    }
    let joined = params
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}
