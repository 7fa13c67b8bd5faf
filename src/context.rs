//! Invocation context and the module collaborator.
//!
//! A [`CommandContext`] is built by the dispatcher once per matched
//! invocation; the gate only reads it.

use serenity::model::channel::Message;
use serenity::model::id::{GuildId, UserId};
use std::sync::Arc;

/// Per-invocation facts the inhibitor chain is evaluated against.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Whether the invocation originated in a direct-message channel
    pub is_dm: bool,
    /// The originating guild, if any
    pub guild: Option<GuildId>,
    /// The invoking user
    pub author: UserId,
}

impl CommandContext {
    pub fn new(is_dm: bool, guild: Option<GuildId>, author: UserId) -> Self {
        CommandContext {
            is_dm,
            guild,
            author,
        }
    }

    /// Derive a context from an incoming Discord message.
    ///
    /// A message without a guild id arrived over a direct message.
    pub fn from_message(msg: &Message) -> Self {
        CommandContext {
            is_dm: msg.guild_id.is_none(),
            guild: msg.guild_id,
            author: msg.author.id,
        }
    }
}

/// Organizational unit that owns commands and serves as their call
/// receiver.
///
/// Handlers and inhibitors get the owning module as an explicit argument
/// when one is set on the command; the gate itself never stores more than
/// this back-reference.
#[derive(Debug)]
pub struct Module {
    /// Unique identifier within the loading system
    pub name: String,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Module { name: name.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dm_context() {
        let ctx = CommandContext::new(true, None, UserId(42));
        assert!(ctx.is_dm);
        assert!(ctx.guild.is_none());
        assert_eq!(ctx.author, UserId(42));
    }

    #[test]
    fn test_guild_context() {
        let ctx = CommandContext::new(false, Some(GuildId(7)), UserId(42));
        assert!(!ctx.is_dm);
        assert_eq!(ctx.guild, Some(GuildId(7)));
    }

    #[test]
    fn test_module_name() {
        let module = Module::new("moderation");
        assert_eq!(module.name, "moderation");
    }
}
