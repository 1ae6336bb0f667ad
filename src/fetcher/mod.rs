//! The acquisition core: HTTP fetching with retry, payload models, source
//! selection, and schema reconciliation.

pub mod http;
pub mod models;
pub mod reconcile;
pub mod selector;

pub use http::{bootstrap_url, create_http_client, element_summary_url, event_live_url, fetch_json};
pub use models::Bootstrap;
pub use reconcile::{CanonicalRow, MetadataIndex, reconcile};
pub use selector::{SourceDecision, gameweeks_to_fetch, select_source};
