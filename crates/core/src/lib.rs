//! Release readiness and risk scoring engine.
//!
//! - [`prep`]: release checklist items, their persisted state, and the
//!   toggle/confirm state machine.
//! - [`resolver`]: automated checks against ticket and status collaborators.
//! - [`tickets`]: external ticket model, attribute extraction, grouping.
//! - [`readiness`]: progress, risk, and combined readiness scores.
//! - [`view`]: a release detail view session owning the review ticker.

pub mod clock;
pub mod config;
pub mod metrics;
pub mod prep;
pub mod readiness;
pub mod resolver;
pub mod testing;
pub mod tickets;
pub mod view;

pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    GroupingConfig, JiraConfig, ReadinessConfig, SanitizedConfig, ServerConfig, StatusCheckConfig,
};
pub use prep::{
    AutomatedCheck, CheckKind, ConfirmationReason, InMemoryPrepRepository, PrepCatalog, PrepError,
    PrepItem, PrepItemDefinition, PrepItemStore, PrepNotification, PrepRecordRepository,
    PrepSummary, Resolver, ResolverType, ReviewTicker, SqlitePrepRepository, ToggleOutcome,
};
pub use readiness::{
    combined_readiness_score, group_progress, group_risk_score, ReadinessBand, ReleaseReadiness,
    StatusTone,
};
pub use resolver::{
    CheckVerdict, HttpStatusChecker, JiraClient, ResolverEngine, StatusCheckClient,
    TicketQueryClient,
};
pub use tickets::{sort_groups, ExternalTicket, GroupMode, Severity, TicketGroup, TicketGrouper};
pub use view::ReleaseView;
