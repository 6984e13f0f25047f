use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::api::AuthenticatedTransport;
use crate::error::FetchError;
use crate::merge::merge_records;
use crate::models::{CallPage, CallRecord, PageMeta};
use crate::normalize::map_records;
use crate::query::{build_filter_key, build_query_string, FilterSet};

pub const DEFAULT_PAGE_SIZE: u32 = 25;

const CALLS_PATH: &str = "/calls";

/// Client-held view of the call list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncState {
    pub items: Vec<CallRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub meta: Option<PageMeta>,
    /// Last resume cursor seen per filter key. `None` means the stream ended.
    pub cursor_by_filter: HashMap<String, Option<String>>,
}

pub enum SyncEvent {
    Started,
    Succeeded {
        filter_key: String,
        append: bool,
        records: Vec<CallRecord>,
        meta: PageMeta,
    },
    Failed(String),
    Starred {
        id: i64,
        starred: bool,
    },
}

impl SyncState {
    pub fn apply(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Started => {
                self.loading = true;
                self.error = None;
            }
            SyncEvent::Succeeded {
                filter_key,
                append,
                records,
                meta,
            } => {
                let existing = std::mem::take(&mut self.items);
                self.items = merge_records(existing, records, append);
                self.cursor_by_filter.insert(filter_key, meta.next_cursor.clone());
                self.meta = Some(meta);
                self.loading = false;
                self.error = None;
            }
            SyncEvent::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            SyncEvent::Starred { id, starred } => {
                if let Some(record) = self.items.iter_mut().find(|record| record.id == id) {
                    record.is_starred = starred;
                }
            }
        }
    }

    pub fn stored_cursor(&self, filters: &FilterSet) -> Option<String> {
        self.cursor_by_filter
            .get(&build_filter_key(filters))
            .cloned()
            .flatten()
    }

    pub fn has_more(&self) -> bool {
        self.meta.as_ref().map(|meta| meta.has_more).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    pub filters: FilterSet,
    /// Resume point. `None` fetches the first page and replaces held records.
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl LoadRequest {
    pub fn first_page(filters: FilterSet) -> Self {
        Self {
            filters,
            cursor: None,
            limit: None,
        }
    }

    pub fn after(filters: FilterSet, cursor: impl Into<String>) -> Self {
        Self {
            filters,
            cursor: Some(cursor.into()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub page_size: u32,
    pub discard_stale_responses: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            discard_stale_responses: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestTag {
    sequence: u64,
    filter_key: String,
    cursor: Option<String>,
}

#[derive(Default)]
struct Inner {
    state: SyncState,
    issued: u64,
    active: Option<RequestTag>,
}

/// Keeps a [`SyncState`] in step with the `/calls` endpoint.
///
/// Transitions happen under a lock that is never held across a request, so
/// readers only ever see whole transitions. Overlapping loads are allowed;
/// by default the last one to resolve wins.
pub struct CallListSync {
    transport: Arc<dyn AuthenticatedTransport>,
    options: SyncOptions,
    inner: Mutex<Inner>,
}

impl CallListSync {
    pub fn new(transport: Arc<dyn AuthenticatedTransport>, options: SyncOptions) -> Self {
        Self {
            transport,
            options,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn snapshot(&self) -> SyncState {
        self.lock().state.clone()
    }

    pub fn get_stored_cursor(&self, filters: &FilterSet) -> Option<String> {
        self.lock().state.stored_cursor(filters)
    }

    /// Fetches one page and folds it into the held state. Failures end up in
    /// [`SyncState::error`]; nothing is returned to the caller.
    pub async fn load(&self, request: LoadRequest) {
        let LoadRequest {
            filters,
            cursor,
            limit,
        } = request;
        let limit = limit.unwrap_or(self.options.page_size);
        let filter_key = build_filter_key(&filters);
        let query = build_query_string(&filters, cursor.as_deref(), Some(limit));
        let append = cursor.is_some();

        let tag = {
            let mut inner = self.lock();
            inner.issued += 1;
            let tag = RequestTag {
                sequence: inner.issued,
                filter_key: filter_key.clone(),
                cursor,
            };
            inner.active = Some(tag.clone());
            inner.state.apply(SyncEvent::Started);
            tag
        };
        debug!(
            sequence = tag.sequence,
            filter = %tag.filter_key,
            cursor = ?tag.cursor,
            limit,
            "loading calls"
        );

        let event = match self.fetch_page(&query).await {
            Ok(page) => {
                let sent = page.data.len();
                let records = map_records(page.data);
                info!(
                    sequence = tag.sequence,
                    received = sent,
                    kept = records.len(),
                    append,
                    next_cursor = ?page.meta.next_cursor,
                    "calls page loaded"
                );
                SyncEvent::Succeeded {
                    filter_key,
                    append,
                    records,
                    meta: page.meta,
                }
            }
            Err(err) => {
                warn!(sequence = tag.sequence, error = %err, "failed to load calls");
                SyncEvent::Failed(err.to_string())
            }
        };

        let mut inner = self.lock();
        if self.options.discard_stale_responses && inner.active.as_ref() != Some(&tag) {
            debug!(
                sequence = tag.sequence,
                filter = %tag.filter_key,
                "discarding stale calls response"
            );
            return;
        }
        inner.state.apply(event);
        if inner.active.as_ref() == Some(&tag) {
            inner.active = None;
        }
    }

    /// Continues pagination for `filters` from its stored cursor. Returns
    /// `false` without issuing a request when there is nothing to resume.
    pub async fn load_more(&self, filters: FilterSet, limit: Option<u32>) -> bool {
        let Some(cursor) = self.get_stored_cursor(&filters) else {
            debug!(filter = %build_filter_key(&filters), "no stored cursor, nothing more to load");
            return false;
        };
        self.load(LoadRequest {
            filters,
            cursor: Some(cursor),
            limit,
        })
        .await;
        true
    }

    /// Patches the starred flag of a held record. Returns whether the record
    /// was found.
    pub fn set_starred(&self, id: i64, starred: bool) -> bool {
        let mut inner = self.lock();
        let found = inner.state.items.iter().any(|record| record.id == id);
        inner.state.apply(SyncEvent::Starred { id, starred });
        found
    }

    async fn fetch_page(&self, query: &str) -> Result<CallPage, FetchError> {
        let response = self.transport.get(&format!("{CALLS_PATH}{query}")).await?;
        if !response.is_success() {
            return Err(FetchError::Request {
                status: response.status,
            });
        }
        Ok(response.json::<CallPage>()?)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
