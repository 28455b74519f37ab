use chrono::Utc;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{error, info, warn};

use super::handle::RoomFinderHandle;
use crate::config::Config;
use crate::error::BotResult;
use crate::utils::scheduler::Scheduler;
use crate::utils::time::{calculate_wait_duration, next_weekly_time, parse_timezone};

lazy_static! {
    static ref REFRESH_TASK: Mutex<Option<JoinHandle<()>>> = Mutex::new(None);
}

/// Rescrapes the class schedule every Monday so room changes are picked up
pub struct RoomRefreshScheduler;

impl Scheduler for RoomRefreshScheduler {
    type Handle = RoomFinderHandle;

    fn start(
        config: Arc<RwLock<Config>>,
        handle: Self::Handle,
    ) -> Pin<Box<dyn Future<Output = BotResult<()>> + Send>> {
        Box::pin(async move {
            let (refresh_time, timezone) = {
                let config_read = config.read().await;
                (
                    config_read.rooms_refresh_time.clone(),
                    parse_timezone(&config_read.timezone)?,
                )
            };

            let mut task = REFRESH_TASK.lock().await;
            if task.is_some() {
                warn!("Room refresh task is already running, skipping initialization");
                return Ok(());
            }

            info!(
                "Starting weekly room refresh at {} {} on Mondays",
                refresh_time, timezone
            );
            *task = Some(tokio::spawn(run_refresh_loop(refresh_time, timezone, handle)));

            Ok(())
        })
    }

    fn stop(&self) -> Pin<Box<dyn Future<Output = BotResult<()>> + Send>> {
        Box::pin(async move {
            if let Some(task) = REFRESH_TASK.lock().await.take() {
                task.abort();
                info!("Room refresh task stopped");
            }
            Ok(())
        })
    }
}

/// Sleep until the next Monday refresh time, rescrape, repeat
async fn run_refresh_loop(refresh_time: String, timezone: Tz, handle: RoomFinderHandle) {
    loop {
        let now = Utc::now().with_timezone(&timezone);

        let Some(next_time) = next_weekly_time(&now, &refresh_time) else {
            error!(
                "Invalid room refresh time '{}', weekly refresh disabled",
                refresh_time
            );
            return;
        };

        info!("Next room refresh scheduled for {}", next_time);

        let wait_seconds = match calculate_wait_duration(&now, &next_time) {
            Ok(seconds) => seconds,
            Err(e) => {
                error!("Error calculating wait duration: {}", e);
                3600 // Default to an hour if we can't calculate
            }
        };

        sleep(TokioDuration::from_secs(wait_seconds as u64)).await;

        match handle.refresh().await {
            Ok(count) => info!("Weekly room refresh finished with {} rooms", count),
            Err(e) => error!("Weekly room refresh failed: {}", e),
        }
    }
}
