//! Prep item data types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An incomplete item whose deadline is closer than this is at risk.
pub const AT_RISK_WINDOW_HOURS: i64 = 24;

/// Which strategy decides whether an item may be completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolverType {
    Automated,
    Manual,
}

/// Kind of automated check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// At least one ticket matching the query is done/closed.
    JiraTicket,
    /// A status endpoint reports the expected status.
    ApiCheck,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::JiraTicket => "jira_ticket",
            CheckKind::ApiCheck => "api_check",
        }
    }
}

/// Parameters of an automated check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CheckConfig {
    /// Ticket query (JQL) for `jira_ticket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Status endpoint for `api_check`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Status the endpoint must report for `api_check`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<String>,
}

/// Automated check descriptor, interpreted by the resolver engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutomatedCheck {
    pub kind: CheckKind,
    #[serde(default)]
    pub config: CheckConfig,
}

impl AutomatedCheck {
    pub fn jira_ticket(query: impl Into<String>) -> Self {
        Self {
            kind: CheckKind::JiraTicket,
            config: CheckConfig {
                query: Some(query.into()),
                ..Default::default()
            },
        }
    }

    pub fn api_check(endpoint: impl Into<String>, expected_status: impl Into<String>) -> Self {
        Self {
            kind: CheckKind::ApiCheck,
            config: CheckConfig {
                endpoint: Some(endpoint.into()),
                expected_status: Some(expected_status.into()),
                ..Default::default()
            },
        }
    }
}

/// Resolver strategy for a prep item.
///
/// Serialized flat next to the item fields:
/// `{"resolver_type": "automated", "automated_check": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "resolver_type", rename_all = "snake_case")]
pub enum Resolver {
    Automated { automated_check: AutomatedCheck },
    Manual,
}

impl Resolver {
    pub fn resolver_type(&self) -> ResolverType {
        match self {
            Resolver::Automated { .. } => ResolverType::Automated,
            Resolver::Manual => ResolverType::Manual,
        }
    }

    pub fn automated_check(&self) -> Option<&AutomatedCheck> {
        match self {
            Resolver::Automated { automated_check } => Some(automated_check),
            Resolver::Manual => None,
        }
    }
}

/// Static catalog entry for a prep item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrepItemDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub resolver: Resolver,
    /// Default deadline, overridable per release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// A release checklist item with its current state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrepItem {
    pub id: String,
    pub label: String,
    pub description: String,
    pub completed: bool,
    /// User-set risk flag.
    pub manual_at_risk: bool,
    /// Derived, see [`PrepItem::derive_at_risk`].
    pub at_risk: bool,
    #[serde(flatten)]
    pub resolver: Resolver,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl PrepItem {
    /// Item in its catalog default state.
    pub fn from_definition(def: &PrepItemDefinition) -> Self {
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            description: def.description.clone(),
            completed: false,
            manual_at_risk: false,
            at_risk: false,
            resolver: def.resolver.clone(),
            deadline: def.deadline,
        }
    }

    pub fn resolver_type(&self) -> ResolverType {
        self.resolver.resolver_type()
    }

    /// True when incomplete with a deadline less than a day away (or passed).
    pub fn deadline_at_risk(&self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        match self.deadline {
            Some(deadline) => deadline - now < Duration::hours(AT_RISK_WINDOW_HOURS),
            None => false,
        }
    }

    /// `manual_at_risk OR deadline rule`, never set on a completed item.
    pub fn derive_at_risk(&self, now: DateTime<Utc>) -> bool {
        !self.completed && (self.manual_at_risk || self.deadline_at_risk(now))
    }

    /// Recompute `at_risk`. Returns true if it changed.
    pub fn refresh_at_risk(&mut self, now: DateTime<Utc>) -> bool {
        let at_risk = self.derive_at_risk(now);
        let changed = at_risk != self.at_risk;
        self.at_risk = at_risk;
        changed
    }

    /// Completion transition shared by automatic and manual completion.
    pub(crate) fn mark_complete(&mut self) {
        self.completed = true;
        self.at_risk = false;
        self.manual_at_risk = false;
    }
}

/// Counts feeding the combined readiness score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PrepSummary {
    pub completed: usize,
    pub total: usize,
    pub at_risk: usize,
}

impl PrepSummary {
    pub fn from_items(items: &[PrepItem]) -> Self {
        Self {
            completed: items.iter().filter(|i| i.completed).count(),
            total: items.len(),
            at_risk: items.iter().filter(|i| i.at_risk).count(),
        }
    }
}

/// Why an item is waiting for manual confirmation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationReason {
    /// Manual items always require confirmation.
    ManualResolver,
    /// The automated check failed or could not be evaluated.
    AutomatedCheckFailed,
}

/// Result of toggling an item's completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The item was completed and is now incomplete.
    Uncompleted,
    /// The automated check passed and the item was completed.
    CompletedAutomatically,
    /// Nothing changed; `confirm_manual` must be called to complete the item.
    NeedsConfirmation { reason: ConfirmationReason },
    /// The item was completed by another action while its check ran.
    AlreadyCompleted,
}

/// User-facing notifications published by the prep item store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrepNotification {
    CompletedAutomatically {
        id: String,
        label: String,
    },
    MarkedComplete {
        id: String,
        label: String,
    },
    ConfirmationRequired {
        id: String,
        label: String,
        reason: ConfirmationReason,
    },
    /// Changes are kept in memory but will not survive a reload.
    PersistFailed {
        reason: String,
    },
}

/// Error type for prep item operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepError {
    /// Item id is not part of the catalog.
    #[error("prep item not found: {0}")]
    NotFound(String),
}
