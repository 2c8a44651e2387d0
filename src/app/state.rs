//! Application state shared across routes

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::game::MatchHandle;

/// A live WebSocket connection
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    pub connected_at: u64,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Handle into the authoritative match task
    pub match_handle: MatchHandle,
    /// Live WebSocket connections (not necessarily joined players)
    pub connections: Arc<DashMap<Uuid, ConnectedClient>>,
}

impl AppState {
    pub fn new(config: Config, match_handle: MatchHandle) -> Self {
        Self {
            config: Arc::new(config),
            match_handle,
            connections: Arc::new(DashMap::new()),
        }
    }
}
