use std::sync::Arc;

use chrono::Utc;
use postforge_core::types::CalendarDate;
use postforge_events::CampaignNotifier;

use crate::cache::CampaignCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: postforge_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Tag-invalidated cache of stored campaign data behind list/detail views.
    pub cache: Arc<CampaignCache>,
    /// Outbound notifier for campaign events (webhook or disabled).
    pub notifier: Arc<dyn CampaignNotifier>,
    /// Date source for derived campaign status.
    pub clock: Clock,
}

/// Source of the current calendar date.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> CalendarDate + Send + Sync>);

impl Clock {
    /// Today's UTC date.
    pub fn system() -> Self {
        Self(Arc::new(|| Utc::now().date_naive()))
    }

    pub fn from_fn(today: impl Fn() -> CalendarDate + Send + Sync + 'static) -> Self {
        Self(Arc::new(today))
    }

    pub fn today(&self) -> CalendarDate {
        (self.0)()
    }
}
