use super::cache::{load_or_rebuild, RegistrySource, RoomStore};
use super::fetcher::RoomSource;
use super::query::{query, QueryOutcome, QueryParams};
use super::registry::Registry;
use crate::error::{component_error, BotResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// The Room Finder actor; sole owner of the registry
pub struct RoomFinderActor {
    source: Arc<dyn RoomSource>,
    store: Arc<dyn RoomStore>,
    registry: Option<Registry>,
    command_rx: mpsc::Receiver<RoomFinderCommand>,
}

/// Commands that can be sent to the Room Finder actor
pub enum RoomFinderCommand {
    FindRooms(QueryParams, mpsc::Sender<BotResult<QueryOutcome>>),
    NeedsScrape(mpsc::Sender<bool>),
    Refresh(mpsc::Sender<BotResult<usize>>),
    Shutdown,
}

/// Handle for communicating with the Room Finder actor
#[derive(Clone)]
pub struct RoomFinderActorHandle {
    command_tx: mpsc::Sender<RoomFinderCommand>,
}

impl RoomFinderActorHandle {
    /// Answer a room query, loading or scraping the rooms first if needed
    pub async fn find_rooms(&self, params: QueryParams) -> BotResult<QueryOutcome> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RoomFinderCommand::FindRooms(params, response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// True when the next query will have to scrape the website
    pub async fn needs_scrape(&self) -> BotResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RoomFinderCommand::NeedsScrape(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    /// Scrape again and replace the rooms; returns the new room count
    pub async fn refresh(&self) -> BotResult<usize> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RoomFinderCommand::Refresh(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(RoomFinderCommand::Shutdown).await;
        Ok(())
    }
}

impl RoomFinderActor {
    /// Create a new actor and return its handle
    pub fn new(
        source: Arc<dyn RoomSource>,
        store: Arc<dyn RoomStore>,
    ) -> (Self, RoomFinderActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            source,
            store,
            registry: None,
            command_rx,
        };

        let handle = RoomFinderActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Room Finder actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RoomFinderCommand::FindRooms(params, response_tx) => {
                    let result = self.find_rooms(&params).await;
                    let _ = response_tx.send(result).await;
                }
                RoomFinderCommand::NeedsScrape(response_tx) => {
                    let needs_scrape = self.needs_scrape().await;
                    let _ = response_tx.send(needs_scrape).await;
                }
                RoomFinderCommand::Refresh(response_tx) => {
                    let result = self.refresh().await;
                    let _ = response_tx.send(result).await;
                }
                RoomFinderCommand::Shutdown => {
                    info!("Room Finder actor shutting down");
                    break;
                }
            }
        }

        info!("Room Finder actor shut down");
    }

    async fn find_rooms(&mut self, params: &QueryParams) -> BotResult<QueryOutcome> {
        let registry = self.registry().await?;
        info!(
            "Finding open rooms for {} at {} (filter: {:?})",
            params.day, params.instant, params.filter
        );
        Ok(query(registry, params))
    }

    /// The loaded registry, reading the cache or scraping on first use
    async fn registry(&mut self) -> BotResult<&Registry> {
        if self.registry.is_none() {
            let source = Arc::clone(&self.source);
            let (registry, origin) =
                load_or_rebuild(self.store.as_ref(), || async move { source.scrape().await })
                    .await?;
            if origin == RegistrySource::Scrape {
                info!("Built room registry from a fresh scrape");
            }
            self.registry = Some(registry);
        }

        self.registry
            .as_ref()
            .ok_or_else(|| component_error("Room registry missing after load"))
    }

    async fn needs_scrape(&mut self) -> bool {
        if self.registry.is_none() {
            self.registry = self.store.load().await;
        }
        self.registry.is_none()
    }

    /// Rooms are only replaced once a scrape has succeeded
    async fn refresh(&mut self) -> BotResult<usize> {
        let registry = match self.source.scrape().await {
            Ok(registry) => registry,
            Err(e) => {
                error!("Room refresh failed, keeping the current rooms: {}", e);
                return Err(e);
            }
        };

        self.store.save(&registry).await?;
        let count = registry.len();
        self.registry = Some(registry);

        info!("Room registry refreshed with {} rooms", count);
        Ok(count)
    }
}
