//! # Feature: Gated Commands
//!
//! The command entity and its execution gate. `execute` walks the
//! inhibitor chain in registration order and only invokes the handler when
//! no inhibitor blocks the invocation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with inhibitor chain, enable/disable toggles

use crate::context::{CommandContext, Module};
use crate::inhibitor::Inhibitor;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use log::warn;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type Handler =
    Box<dyn Fn(Option<Arc<Module>>, CommandContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Construction-time options, merged over defaults
/// (`disabled=false`, `aliases=[]`, `inhibitors=[]`, `module=None`).
#[derive(Clone, Default)]
pub struct CommandOptions {
    /// Dispatch-time filter. Dispatchers must skip disabled commands
    /// before calling [`Command::execute`]; execute itself does not
    /// consult this flag.
    pub disabled: bool,
    /// Alternate invocation names the dispatcher may match on
    pub aliases: Vec<String>,
    /// Inhibitors attached at construction time. Drained into the
    /// execution chain when the command is built; entries pushed here
    /// afterwards never run.
    pub inhibitors: Vec<Inhibitor>,
    /// Owning module, passed to handlers and inhibitors as the receiver
    pub module: Option<Arc<Module>>,
}

/// A named, callable unit of behavior gated by an ordered inhibitor chain.
pub struct Command {
    name: String,
    handler: Handler,
    pub options: CommandOptions,
    inhibitors: Vec<Inhibitor>,
}

impl Command {
    /// Create a command with a non-empty name.
    ///
    /// Construction-time inhibitors are moved into the single chain that
    /// [`Command::execute`] walks, ahead of anything attached later, so
    /// both populations run uniformly in append order.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        handler: F,
        options: CommandOptions,
    ) -> Result<Self>
    where
        F: Fn(Option<Arc<Module>>, CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(anyhow!("command name must be a non-empty string"));
        }

        let mut options = options;
        let inhibitors = std::mem::take(&mut options.inhibitors);

        Ok(Command {
            name,
            handler: Box::new(move |module, ctx| Box::pin(handler(module, ctx))),
            options,
            inhibitors,
        })
    }

    /// The command's unique identifier within its owning scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a dispatcher should consider this command at all.
    pub fn is_enabled(&self) -> bool {
        !self.options.disabled
    }

    /// Append inhibitors to the chain in the order given.
    ///
    /// Chainable. Re-adding an inhibitor duplicates it; both copies run.
    /// The chain only grows, nothing removes entries.
    pub fn use_inhibitor(
        &mut self,
        inhibitors: impl IntoIterator<Item = Inhibitor>,
    ) -> &mut Self {
        self.inhibitors.extend(inhibitors);
        self
    }

    /// Mark the command dispatchable again. Returns the resulting
    /// `disabled` value. Idempotent.
    pub fn enable(&mut self) -> bool {
        self.options.disabled = false;
        self.options.disabled
    }

    /// Mark the command non-dispatchable. Returns the resulting `disabled`
    /// value. Idempotent.
    pub fn disable(&mut self) -> bool {
        self.options.disabled = true;
        self.options.disabled
    }

    /// Run the inhibitor chain, then the handler.
    ///
    /// An inhibited invocation returns `Ok(())` without running the
    /// handler and without any feedback of its own; whatever "you can't do
    /// that" messaging exists is the blocking inhibitor's or the
    /// dispatcher's to emit. Handler failures propagate to the caller
    /// untouched.
    pub async fn execute(&self, ctx: CommandContext) -> Result<()> {
        if self.run_inhibitors(&ctx).await {
            return Ok(());
        }

        (self.handler)(self.options.module.clone(), ctx).await
    }

    /// Walk the chain in registration order, each inhibitor fully awaited
    /// before the next. The first blocking inhibitor wins; later ones
    /// never run.
    ///
    /// A failing inhibitor is logged and counted as passing, so evaluation
    /// proceeds past it. Fail-open: a thrown error allows where a `false`
    /// blocks. Surprising, but callers rely on it; do not invert.
    async fn run_inhibitors(&self, ctx: &CommandContext) -> bool {
        let mut is_inhibited = false;

        for inhibitor in &self.inhibitors {
            match inhibitor
                .evaluate(self.options.module.clone(), ctx.clone())
                .await
            {
                Ok(allowed) => is_inhibited = !allowed,
                Err(e) => {
                    warn!(
                        "Inhibitor '{}' failed on command '{}': {}",
                        inhibitor.name(),
                        self.name,
                        e
                    );
                    is_inhibited = false;
                }
            }

            if is_inhibited {
                return true;
            }
        }

        is_inhibited
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("disabled", &self.options.disabled)
            .field("aliases", &self.options.aliases)
            .field("inhibitors", &self.inhibitors.len())
            .finish()
    }
}
