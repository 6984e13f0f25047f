pub mod api;
pub mod config;
pub mod error;
pub mod layout;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod query;
pub mod sync;
pub mod telemetry;

pub use api::{
    ApiClient, ApiResponse, AuthenticatedTransport, BearerToken, HttpMethod, RequestSigner,
};
pub use config::ClientConfig;
pub use error::{FetchError, LayoutError, TransportError};
pub use layout::LayoutGateway;
pub use models::{CallRecord, CallSummary, LayoutPreferences, PageMeta, TranscriptMessage};
pub use query::{build_filter_key, build_query_string, FilterSet};
pub use sync::{CallListSync, LoadRequest, SyncOptions, SyncState};
