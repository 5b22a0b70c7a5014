//! Release prep items: catalog, persisted overrides, and the state machine.
//!
//! ```text
//! incomplete --toggle (automated, check passes)------> completed
//! incomplete --toggle (manual, or check fails)-------> pending confirmation
//! pending    --confirm_manual------------------------> completed
//! completed  --toggle--------------------------------> incomplete
//! ```
//!
//! `at_risk` is derived: `!completed && (manual_at_risk || deadline < now + 1 day)`.

mod catalog;
mod record;
mod repository;
mod sqlite_repository;
mod store;
mod ticker;
mod types;

pub use catalog::PrepCatalog;
pub use record::{encode_record, merge_record};
pub use repository::{InMemoryPrepRepository, PrepRecordRepository, RepositoryError};
pub use sqlite_repository::SqlitePrepRepository;
pub use store::PrepItemStore;
pub use ticker::ReviewTicker;
pub use types::{
    AutomatedCheck, CheckConfig, CheckKind, ConfirmationReason, PrepError, PrepItem,
    PrepItemDefinition, PrepNotification, PrepSummary, Resolver, ResolverType, ToggleOutcome,
    AT_RISK_WINDOW_HOURS,
};
