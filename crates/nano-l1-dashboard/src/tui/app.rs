/*
[INPUT]:  Endpoint, latest snapshot and feed status from the session, log buffer
[OUTPUT]: DashboardApp view state consumed by the draw functions
[POS]:    TUI app state
[UPDATE]: When adding tabs or view-level state
*/

use std::sync::Arc;

use crate::session::FeedStatus;
use crate::snapshot::DashboardSnapshot;

use super::logging::LogBufferHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Logs,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Logs,
            Tab::Logs => Tab::Dashboard,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Logs => 1,
        }
    }
}

/// Read-only view state. Holds a shared snapshot, never the reducer state.
pub struct DashboardApp {
    pub endpoint: String,
    pub current_tab: Tab,
    pub snapshot: Arc<DashboardSnapshot>,
    pub feed_status: FeedStatus,
    pub log_buffer: Option<LogBufferHandle>,
    pub status_message: String,
}

impl DashboardApp {
    pub fn new(endpoint: impl Into<String>, log_buffer: Option<LogBufferHandle>) -> Self {
        Self {
            endpoint: endpoint.into(),
            current_tab: Tab::Dashboard,
            snapshot: Arc::new(DashboardSnapshot::default()),
            feed_status: FeedStatus::Idle,
            log_buffer,
            status_message: "Ready".to_string(),
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
    }

    pub fn set_feed_status(&mut self, status: FeedStatus) {
        self.status_message = format!("feed {}", status.label());
        self.feed_status = status;
    }
}
