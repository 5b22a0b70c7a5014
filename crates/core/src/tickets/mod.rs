//! External ticket model, attribute extraction, and grouping.

pub mod extract;
mod grouper;
mod types;

pub use extract::{NO_EPIC, OTHER_SERVICE};
pub use grouper::{sort_groups, GroupMode, TicketGroup, TicketGrouper};
pub use types::{status_is_done, ExternalTicket, Severity, DONE_STATUS_MARKERS, STALE_AFTER_DAYS};
