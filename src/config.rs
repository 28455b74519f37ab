use crate::error::{config_error, env_error, BotResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default activity text for the bot
pub const DEFAULT_ACTIVITY: &str = "Looking for an empty room";

/// Class schedule index the room finder scrapes
pub const DEFAULT_COURSE_SCHEDULE_URL: &str =
    "https://web.csulb.edu/depts/enrollment/registration/class_schedule/Spring_2024/By_Subject/";

/// Where the scraped rooms are cached between runs
pub const DEFAULT_ROOMS_CACHE_PATH: &str = "rooms_data.json";

/// Components file merged over the defaults
pub const COMPONENTS_FILE: &str = "config/components.toml";

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Guild to register slash commands in; global registration when absent
    pub guild_id: Option<u64>,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
    /// Timezone used to resolve "now" for room queries
    pub timezone: String,
    /// Bot activity status text
    pub activity: String,
    /// Locale for bot messages
    pub bot_locale: String,
    /// Index page listing every subject
    pub course_schedule_url: String,
    /// JSON file holding the scraped rooms
    pub rooms_cache_path: String,
    /// Weekly (Monday) time for rescraping the schedule, HH:MM
    pub rooms_refresh_time: String,
    /// Per-request timeout while scraping
    pub request_timeout_secs: u64,
    /// Upper bound on subject pages fetched at once
    pub max_concurrent_requests: usize,
}

impl Default for Config {
    fn default() -> Self {
        let mut components = HashMap::new();
        components.insert("room_finder".to_string(), true);

        Self {
            discord_token: String::new(),
            guild_id: None,
            components,
            timezone: String::from("America/Los_Angeles"),
            activity: String::from(DEFAULT_ACTIVITY),
            bot_locale: String::from("en"),
            course_schedule_url: String::from(DEFAULT_COURSE_SCHEDULE_URL),
            rooms_cache_path: String::from(DEFAULT_ROOMS_CACHE_PATH),
            rooms_refresh_time: String::from("04:00"),
            request_timeout_secs: 20,
            max_concurrent_requests: 8,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        // Required environment variables
        let discord_token = env::var("DISCORD_TOKEN").map_err(|_| env_error("DISCORD_TOKEN"))?;

        let guild_id = match env::var("GUILD_ID") {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| config_error("Invalid GUILD_ID format"))?,
            ),
            Err(_) => None,
        };

        let request_timeout_secs = parse_or_default(
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout_secs,
        )?;
        let max_concurrent_requests = parse_or_default(
            "MAX_CONCURRENT_REQUESTS",
            defaults.max_concurrent_requests,
        )?;
        if max_concurrent_requests == 0 {
            return Err(config_error("MAX_CONCURRENT_REQUESTS must be at least 1"));
        }

        let mut components = defaults.components;

        // Load components configuration from file if it exists
        if Path::new(COMPONENTS_FILE).exists() {
            let content = fs::read_to_string(COMPONENTS_FILE)?;
            let file_components = toml::from_str::<HashMap<String, bool>>(&content)?;
            // Merge with defaults
            for (key, value) in file_components {
                components.insert(key, value);
            }
        }

        Ok(Config {
            discord_token,
            guild_id,
            components,
            timezone: env::var("TIMEZONE").unwrap_or(defaults.timezone),
            activity: env::var("BOT_ACTIVITY").unwrap_or(defaults.activity),
            bot_locale: env::var("BOT_LOCALE").unwrap_or(defaults.bot_locale),
            course_schedule_url: env::var("COURSE_SCHEDULE_URL")
                .unwrap_or(defaults.course_schedule_url),
            rooms_cache_path: env::var("ROOMS_CACHE_PATH").unwrap_or(defaults.rooms_cache_path),
            rooms_refresh_time: env::var("ROOMS_REFRESH_TIME")
                .unwrap_or(defaults.rooms_refresh_time),
            request_timeout_secs,
            max_concurrent_requests,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }
}

/// Parse an optional numeric environment variable
fn parse_or_default<T: std::str::FromStr>(var: &str, default: T) -> BotResult<T> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| config_error(&format!("Invalid {} format", var))),
        Err(_) => Ok(default),
    }
}
