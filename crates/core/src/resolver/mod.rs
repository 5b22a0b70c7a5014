//! Automated check resolution for prep items.
//!
//! The [`ResolverEngine`] interprets the `automated_check` descriptor of a
//! prep item against two narrow collaborator contracts: a ticket query
//! ([`TicketQueryClient`]) and a generic status endpoint ([`StatusCheckClient`]).

mod engine;
mod jira;
mod status_api;
mod types;

pub use engine::ResolverEngine;
pub use jira::JiraClient;
pub use status_api::HttpStatusChecker;
pub use types::{
    CheckVerdict, StatusCheckClient, StatusCheckError, StatusReport, TicketQuery,
    TicketQueryClient, TicketQueryError,
};
