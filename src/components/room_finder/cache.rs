use super::registry::Registry;
use crate::error::{cache_error, BotResult};
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Somewhere a scraped registry can be kept between runs
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// The stored registry, or `None` when nothing usable is stored
    async fn load(&self) -> Option<Registry>;

    /// Replace whatever is stored with `registry`
    async fn save(&self, registry: &Registry) -> BotResult<()>;
}

/// Stores the registry as the JSON array of rooms on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RoomStore for JsonFileStore {
    async fn load(&self) -> Option<Registry> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read room cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match Registry::from_json(&content) {
            Ok(registry) => Some(registry),
            Err(e) => {
                warn!("Ignoring corrupt room cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn save(&self, registry: &Registry) -> BotResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = registry.to_json()?;

        // Write next to the target and rename so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            cache_error(&format!(
                "Failed to move room cache into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        info!(
            "Saved {} rooms to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Where a loaded registry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    Cache,
    Scrape,
}

/// Use the stored registry if there is a usable one; otherwise run `rebuild`
/// and store its result.
pub async fn load_or_rebuild<F, Fut>(
    store: &dyn RoomStore,
    rebuild: F,
) -> BotResult<(Registry, RegistrySource)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = BotResult<Registry>>,
{
    if let Some(registry) = store.load().await {
        info!("Loaded {} rooms from the room cache", registry.len());
        return Ok((registry, RegistrySource::Cache));
    }

    info!("No usable room cache, scraping the class schedule");
    let registry = rebuild().await?;
    store.save(&registry).await?;

    Ok((registry, RegistrySource::Scrape))
}
