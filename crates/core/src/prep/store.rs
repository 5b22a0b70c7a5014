//! Prep item store: the canonical, persisted list of prep items.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::metrics;
use crate::resolver::ResolverEngine;

use super::catalog::PrepCatalog;
use super::record::{encode_record, merge_record};
use super::repository::{PrepRecordRepository, RepositoryError};
use super::types::{
    ConfirmationReason, PrepError, PrepItem, PrepNotification, PrepSummary, Resolver,
    ToggleOutcome,
};

/// Capacity of the notification channel.
const NOTIFICATION_BUFFER: usize = 64;

struct StoreState {
    items: Vec<PrepItem>,
    /// Ids waiting for `confirm_manual`.
    pending: HashSet<String>,
}

/// Owns the prep item list and every mutation of it.
///
/// Each mutation saves the whole list through the repository. Save failures
/// are logged and published as [`PrepNotification::PersistFailed`]; the
/// in-memory list stays authoritative for the session.
///
/// No lock is held while an automated check is running, so concurrent toggles
/// of different items are independent and a re-entrant toggle of the same
/// item is last-write-wins.
pub struct PrepItemStore {
    catalog: PrepCatalog,
    repository: Arc<dyn PrepRecordRepository>,
    resolver: ResolverEngine,
    clock: Arc<dyn Clock>,
    state: RwLock<StoreState>,
    notifications: broadcast::Sender<PrepNotification>,
}

impl PrepItemStore {
    /// Store holding catalog defaults; call [`load`](Self::load) to apply the
    /// persisted record.
    pub fn new(
        catalog: PrepCatalog,
        repository: Arc<dyn PrepRecordRepository>,
        resolver: ResolverEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let items = merge_record(&catalog, None, clock.now());
        let (notifications, _) = broadcast::channel(NOTIFICATION_BUFFER);
        Self {
            catalog,
            repository,
            resolver,
            clock,
            state: RwLock::new(StoreState {
                items,
                pending: HashSet::new(),
            }),
            notifications,
        }
    }

    /// Create a store and load the persisted record.
    pub async fn open(
        catalog: PrepCatalog,
        repository: Arc<dyn PrepRecordRepository>,
        resolver: ResolverEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Self::new(catalog, repository, resolver, clock);
        store.load().await;
        store
    }

    /// Merge the persisted overrides onto the catalog and recompute `at_risk`.
    pub async fn load(&self) -> Vec<PrepItem> {
        let record = match self.repository.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to read prep record, using catalog defaults");
                None
            }
        };
        let items = merge_record(&self.catalog, record.as_deref(), self.clock.now());
        info!(
            items = items.len(),
            completed = items.iter().filter(|i| i.completed).count(),
            "Prep items loaded"
        );

        let mut state = self.state.write().await;
        state.items = items.clone();
        state.pending.clear();
        items
    }

    pub fn catalog(&self) -> &PrepCatalog {
        &self.catalog
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Receive notifications published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PrepNotification> {
        self.notifications.subscribe()
    }

    pub async fn items(&self) -> Vec<PrepItem> {
        self.state.read().await.items.clone()
    }

    pub async fn get(&self, id: &str) -> Option<PrepItem> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    pub async fn summary(&self) -> PrepSummary {
        PrepSummary::from_items(&self.state.read().await.items)
    }

    /// Ids awaiting manual confirmation, sorted.
    pub async fn pending_confirmations(&self) -> Vec<String> {
        let mut pending: Vec<String> = self.state.read().await.pending.iter().cloned().collect();
        pending.sort();
        pending
    }

    /// Toggle completion of an item.
    ///
    /// Completed items are un-completed directly. Incomplete manual items,
    /// and automated items whose check does not pass, move to pending
    /// confirmation without changing the item.
    pub async fn toggle_complete(&self, id: &str) -> Result<ToggleOutcome, PrepError> {
        let item = self
            .get(id)
            .await
            .ok_or_else(|| PrepError::NotFound(id.to_string()))?;

        if item.completed {
            let now = self.clock.now();
            self.mutate(id, |item| {
                item.completed = false;
                item.refresh_at_risk(now);
            })
            .await?;
            metrics::PREP_TRANSITIONS
                .with_label_values(&["uncompleted"])
                .inc();
            debug!(item_id = id, "Prep item un-completed");
            return Ok(ToggleOutcome::Uncompleted);
        }

        match &item.resolver {
            Resolver::Manual => {
                self.require_confirmation(&item, ConfirmationReason::ManualResolver)
                    .await
            }
            Resolver::Automated { .. } => {
                let verdict = self.resolver.check(&item).await;
                if !verdict.complete {
                    return self
                        .require_confirmation(&item, ConfirmationReason::AutomatedCheckFailed)
                        .await;
                }

                let updated = self.mutate(id, PrepItem::mark_complete).await?;
                metrics::PREP_TRANSITIONS
                    .with_label_values(&["completed_auto"])
                    .inc();
                info!(item_id = id, "Prep item completed automatically");
                self.notify(PrepNotification::CompletedAutomatically {
                    id: updated.id,
                    label: updated.label,
                });
                Ok(ToggleOutcome::CompletedAutomatically)
            }
        }
    }

    /// Complete an item on the user's word. Valid whether or not a
    /// confirmation was pending.
    pub async fn confirm_manual(&self, id: &str) -> Result<PrepItem, PrepError> {
        let updated = self.mutate(id, PrepItem::mark_complete).await?;
        metrics::PREP_TRANSITIONS
            .with_label_values(&["confirmed_manual"])
            .inc();
        info!(item_id = id, "Prep item marked complete");
        self.notify(PrepNotification::MarkedComplete {
            id: updated.id.clone(),
            label: updated.label.clone(),
        });
        Ok(updated)
    }

    /// Flip the user-set risk flag.
    pub async fn toggle_at_risk(&self, id: &str) -> Result<PrepItem, PrepError> {
        let now = self.clock.now();
        let updated = self
            .mutate(id, |item| {
                item.manual_at_risk = !item.manual_at_risk;
                item.refresh_at_risk(now);
            })
            .await?;
        metrics::PREP_TRANSITIONS
            .with_label_values(&["at_risk_toggled"])
            .inc();
        Ok(updated)
    }

    /// Set or clear an item's deadline.
    pub async fn set_deadline(
        &self,
        id: &str,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<PrepItem, PrepError> {
        let now = self.clock.now();
        self.mutate(id, |item| {
            item.deadline = deadline;
            item.refresh_at_risk(now);
        })
        .await
    }

    /// Re-derive deadline risk for every item. Persists only when something
    /// changed; returns whether it did.
    pub async fn review_at_risk(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let mut changed = false;
        for item in state.items.iter_mut() {
            changed |= item.refresh_at_risk(now);
        }
        if changed {
            debug!("At-risk review changed prep items");
            self.persist(&state.items);
        }
        metrics::REVIEW_RUNS
            .with_label_values(&[if changed { "true" } else { "false" }])
            .inc();
        changed
    }

    async fn require_confirmation(
        &self,
        item: &PrepItem,
        reason: ConfirmationReason,
    ) -> Result<ToggleOutcome, PrepError> {
        {
            let mut state = self.state.write().await;
            let current = state
                .items
                .iter()
                .find(|i| i.id == item.id)
                .ok_or_else(|| PrepError::NotFound(item.id.clone()))?;
            if current.completed {
                debug!(item_id = %item.id, "Prep item completed while its check ran");
                return Ok(ToggleOutcome::AlreadyCompleted);
            }
            state.pending.insert(item.id.clone());
        }
        metrics::PREP_TRANSITIONS
            .with_label_values(&["needs_confirmation"])
            .inc();
        debug!(item_id = %item.id, reason = ?reason, "Prep item needs manual confirmation");
        self.notify(PrepNotification::ConfirmationRequired {
            id: item.id.clone(),
            label: item.label.clone(),
            reason,
        });
        Ok(ToggleOutcome::NeedsConfirmation { reason })
    }

    /// Apply `f` to one item, clear its pending confirmation, and persist.
    async fn mutate<F>(&self, id: &str, f: F) -> Result<PrepItem, PrepError>
    where
        F: FnOnce(&mut PrepItem),
    {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| PrepError::NotFound(id.to_string()))?;
        f(item);
        let updated = item.clone();
        state.pending.remove(id);
        self.persist(&state.items);
        Ok(updated)
    }

    fn persist(&self, items: &[PrepItem]) {
        let result = encode_record(items)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
            .and_then(|record| self.repository.save(&record));

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist prep items, changes will not survive a reload");
            metrics::PREP_PERSIST_FAILURES.inc();
            self.notify(PrepNotification::PersistFailed {
                reason: e.to_string(),
            });
        }
    }

    fn notify(&self, notification: PrepNotification) {
        // No subscribers is fine.
        let _ = self.notifications.send(notification);
    }
}
