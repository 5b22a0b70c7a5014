//! Release detail view session.
//!
//! A view pulls scores on demand from whatever ticket set it currently holds
//! and owns the review ticker for as long as it is open.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::prep::{PrepItemStore, ReviewTicker};
use crate::readiness::ReleaseReadiness;
use crate::tickets::{ExternalTicket, GroupMode, TicketGroup, TicketGrouper};

pub struct ReleaseView {
    store: Arc<PrepItemStore>,
    grouper: TicketGrouper,
    ticker: Option<ReviewTicker>,
}

impl ReleaseView {
    /// Open the view and start periodic at-risk review.
    pub fn open(
        store: Arc<PrepItemStore>,
        grouper: TicketGrouper,
        review_interval: Duration,
    ) -> Self {
        let ticker = ReviewTicker::start(Arc::clone(&store), review_interval);
        debug!("Release view opened");
        Self {
            store,
            grouper,
            ticker: Some(ticker),
        }
    }

    pub fn store(&self) -> &Arc<PrepItemStore> {
        &self.store
    }

    pub fn is_open(&self) -> bool {
        self.ticker.as_ref().map(|t| t.is_running()).unwrap_or(false)
    }

    /// Combined readiness for the current checklist and `tickets`.
    pub async fn readiness(&self, tickets: &[ExternalTicket]) -> ReleaseReadiness {
        ReleaseReadiness::evaluate(self.store.summary().await, tickets)
    }

    /// Sorted groups of `tickets`.
    pub fn groups(&self, tickets: &[ExternalTicket], mode: GroupMode) -> Vec<TicketGroup> {
        self.grouper.group(tickets, mode, self.store.now())
    }

    /// Close the view, stopping its ticker.
    pub async fn close(mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel().await;
        }
        debug!("Release view closed");
    }
}
