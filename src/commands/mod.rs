use crate::components::ComponentManager;
use crate::config::Config;
use crate::error::BotResult;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::sync::RwLock;

// Export submodules
pub mod rooms;
pub mod util;

/// Longest message Discord accepts
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Shared context for all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: Arc<RwLock<Config>>,
    pub component_manager: Option<Arc<ComponentManager>>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            component_manager: None,
        }
    }

    /// Set the component manager
    pub fn with_component_manager(mut self, component_manager: Arc<ComponentManager>) -> Self {
        self.component_manager = Some(component_manager);
        self
    }
}

/// Type alias for command result
pub type CommandResult = BotResult<()>;

/// Type alias for poise context
pub type Context<'a> = poise::Context<'a, CommandContext, crate::error::Error>;

/// All application commands and event listeners
pub fn get_all_application_commands() -> Vec<poise::Command<CommandContext, crate::error::Error>> {
    vec![
        // Utility commands
        util::ping(),
        // Room finder commands
        rooms::findroom(),
        rooms::refreshrooms(),
    ]
}

/// Green embed for successful operations
pub fn create_success_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0x00_CC_66)
}

/// Red embed for errors
pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0xDD_33_33)
}

/// Split text into messages no longer than `limit` characters, breaking on lines where possible
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let mut line = line;

        // Lines that cannot fit in any message are cut up
        while line.chars().count() > limit {
            if !current.is_empty() {
                messages.push(std::mem::take(&mut current));
            }
            let cut = line
                .char_indices()
                .nth(limit)
                .map(|(index, _)| index)
                .unwrap_or(line.len());
            messages.push(line[..cut].to_string());
            line = &line[cut..];
        }

        let needed = if current.is_empty() {
            line.chars().count()
        } else {
            current.chars().count() + 1 + line.chars().count()
        };
        if needed > limit {
            messages.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.trim().is_empty() {
        messages.push(current);
    }

    messages
}
