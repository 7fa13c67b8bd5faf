//! # Feature: Inhibitor Decorators
//!
//! Declarative attachment of inhibitors to commands at module-definition
//! time, plus the built-in predicates: `dm_only`, `guild_only` and
//! `rate_limit`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with dm_only, guild_only, rate_limit

use crate::command::Command;
use crate::inhibitor::Inhibitor;
use crate::rate_limiter::RateLimiter;
use anyhow::{anyhow, Result};
use std::any::Any;
use std::time::Duration;

/// Attaches a fixed set of inhibitors to command definitions.
///
/// Modules hold their members as dynamically-typed slots while loading;
/// applying a decorator to a slot that is not a [`Command`] is a
/// configuration error, raised synchronously so loading halts before any
/// invocation can happen.
#[derive(Clone, Debug)]
pub struct InhibitorDecorator {
    inhibitors: Vec<Inhibitor>,
}

impl InhibitorDecorator {
    pub fn new(inhibitors: Vec<Inhibitor>) -> Self {
        InhibitorDecorator { inhibitors }
    }

    /// Attach this decorator's inhibitors to the given module member.
    ///
    /// Returns the command so declarations can keep chaining. Applying
    /// the same decorator twice appends its inhibitors twice.
    pub fn apply<'a>(&self, member: &'a mut dyn Any) -> Result<&'a mut Command> {
        match member.downcast_mut::<Command>() {
            Some(command) => {
                command.use_inhibitor(self.inhibitors.iter().cloned());
                Ok(command)
            }
            None => Err(anyhow!(
                "inhibitor decorators can only be applied to command definitions"
            )),
        }
    }
}

/// Pass only invocations that arrived over a direct message.
pub fn dm_only() -> InhibitorDecorator {
    InhibitorDecorator::new(vec![Inhibitor::sync("dm_only", |_module, ctx| {
        Ok(ctx.is_dm)
    })])
}

/// Pass only invocations carrying a guild reference.
pub fn guild_only() -> InhibitorDecorator {
    InhibitorDecorator::new(vec![Inhibitor::sync("guild_only", |_module, ctx| {
        Ok(ctx.guild.is_some())
    })])
}

/// Pass only while the invoking user stays under `max_requests` per
/// `time_window`.
///
/// Every command the returned decorator is applied to shares one limiter,
/// so the budget spans all of them. The inhibitor itself never waits; a
/// limited invocation is simply inhibited.
pub fn rate_limit(max_requests: usize, time_window: Duration) -> InhibitorDecorator {
    let limiter = RateLimiter::new(max_requests, time_window);
    InhibitorDecorator::new(vec![Inhibitor::sync("rate_limit", move |_module, ctx| {
        Ok(limiter.allow(&ctx.author.to_string()))
    })])
}
