use super::actor::{RoomFinderActor, RoomFinderActorHandle};
use super::cache::{JsonFileStore, RoomStore};
use super::fetcher::{RoomSource, ScheduleFetcher};
use super::query::{QueryOutcome, QueryParams};
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the Room Finder actor
#[derive(Clone)]
pub struct RoomFinderHandle {
    actor_handle: RoomFinderActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl RoomFinderHandle {
    /// Create a new RoomFinderHandle and spawn the actor
    pub fn new(source: Arc<dyn RoomSource>, store: Arc<dyn RoomStore>) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = RoomFinderActor::new(source, store);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Scrape the configured website and cache to the configured file
    pub fn from_config(config: &Config) -> BotResult<Self> {
        let source = ScheduleFetcher::from_config(config)?;
        let store = JsonFileStore::new(&config.rooms_cache_path);
        Ok(Self::new(Arc::new(source), Arc::new(store)))
    }

    /// Find open rooms
    pub async fn find_rooms(&self, params: QueryParams) -> BotResult<QueryOutcome> {
        self.actor_handle.find_rooms(params).await
    }

    /// Whether answering the next query means scraping first
    pub async fn needs_scrape(&self) -> BotResult<bool> {
        self.actor_handle.needs_scrape().await
    }

    /// Scrape the schedule again
    pub async fn refresh(&self) -> BotResult<usize> {
        self.actor_handle.refresh().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
