use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use shipready_core::{Config, PrepItemStore, ReleaseView, SanitizedConfig, TicketGrouper};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<PrepItemStore>,
    grouper: TicketGrouper,
    /// Open release detail views by id.
    views: RwLock<HashMap<String, ReleaseView>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<PrepItemStore>) -> Self {
        let grouper = TicketGrouper::new(config.grouping.clone());
        Self {
            config,
            store,
            grouper,
            views: RwLock::new(HashMap::new()),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn store(&self) -> &Arc<PrepItemStore> {
        &self.store
    }

    pub fn grouper(&self) -> &TicketGrouper {
        &self.grouper
    }

    pub fn review_interval(&self) -> Duration {
        Duration::from_secs(self.config.readiness.review_interval_secs)
    }

    /// Open a release view with its own review ticker. Returns the view id.
    pub async fn open_view(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let view = ReleaseView::open(
            Arc::clone(&self.store),
            self.grouper.clone(),
            self.review_interval(),
        );
        self.views.write().await.insert(id.clone(), view);
        info!(view_id = %id, "Release view opened");
        id
    }

    /// Close a view. Returns false if no such view is open.
    pub async fn close_view(&self, id: &str) -> bool {
        let view = self.views.write().await.remove(id);
        match view {
            Some(view) => {
                view.close().await;
                info!(view_id = %id, "Release view closed");
                true
            }
            None => false,
        }
    }

    pub async fn open_view_count(&self) -> usize {
        self.views.read().await.len()
    }

    /// Close every open view, stopping their tickers.
    pub async fn close_all_views(&self) {
        let views: Vec<ReleaseView> = self.views.write().await.drain().map(|(_, v)| v).collect();
        for view in views {
            view.close().await;
        }
    }
}
