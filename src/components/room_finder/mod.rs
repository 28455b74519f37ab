mod actor;
pub mod cache;
pub mod extractor;
pub mod fetcher;
mod handle;
pub mod models;
pub mod query;
pub mod registry;
pub mod request;
mod scheduler;
pub mod time;

pub use handle::RoomFinderHandle;
pub use scheduler::RoomRefreshScheduler;

use crate::config::Config;
use crate::error::BotResult;
use crate::utils::scheduler::Scheduler;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Room Finder component: answers "which room is free" from the class schedule
#[derive(Default)]
pub struct RoomFinder {
    handle: RwLock<Option<RoomFinderHandle>>,
}

impl RoomFinder {
    /// Create a new Room Finder component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<RoomFinderHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for RoomFinder {
    fn name(&self) -> &'static str {
        "room_finder"
    }

    async fn init(&self, config: Arc<RwLock<Config>>) -> BotResult<()> {
        // Create a new handle if one doesn't exist
        let handle = {
            let mut handle_lock = self.handle.write().await;
            match &*handle_lock {
                Some(handle) => handle.clone(),
                None => {
                    let handle = RoomFinderHandle::from_config(&*config.read().await)?;
                    *handle_lock = Some(handle.clone());
                    handle
                }
            }
        };

        info!("Starting Room Finder refresh scheduler");
        if let Err(e) = RoomRefreshScheduler::start(config, handle).await {
            error!("Failed to start Room Finder scheduler: {}", e);
        }

        Ok(())
    }

    async fn shutdown(&self) -> BotResult<()> {
        // Stop the scheduler
        RoomRefreshScheduler.stop().await?;

        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
