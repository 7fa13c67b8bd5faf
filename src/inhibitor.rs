//! # Feature: Command Inhibitors
//!
//! Named predicates that gate command execution. An inhibitor passes by
//! returning `Ok(true)` and blocks with any falsy result; a failing
//! inhibitor is logged and counted as passing by the chain (see
//! [`crate::command`]).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with sync and async constructors

use crate::context::{CommandContext, Module};
use anyhow::Result;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type CheckFn =
    dyn Fn(Option<Arc<Module>>, CommandContext) -> BoxFuture<'static, Result<bool>> + Send + Sync;

/// A predicate evaluated against the invocation context before a command
/// handler is allowed to run.
///
/// Inhibitors carry an explicit name so a failing one can be identified in
/// the warning log. They are expected to be stateless; nothing enforces
/// that, and the rate-limit built-in deliberately shares limiter state.
#[derive(Clone)]
pub struct Inhibitor {
    name: String,
    check: Arc<CheckFn>,
}

impl Inhibitor {
    /// Create an inhibitor from an asynchronous predicate.
    pub fn new<F, Fut>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<Arc<Module>>, CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Inhibitor {
            name: name.into(),
            check: Arc::new(move |module, ctx| Box::pin(check(module, ctx))),
        }
    }

    /// Create an inhibitor from a synchronous predicate.
    ///
    /// The chain awaits every inhibitor uniformly; a synchronous predicate
    /// is wrapped into an immediately-ready future.
    pub fn sync<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<Arc<Module>>, &CommandContext) -> Result<bool> + Send + Sync + 'static,
    {
        Inhibitor {
            name: name.into(),
            check: Arc::new(move |module, ctx| {
                let result = check(module, &ctx);
                Box::pin(async move { result })
            }),
        }
    }

    /// Identifier reported when this inhibitor fails.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the predicate for one invocation, with the owning module
    /// passed through as the explicit receiver.
    pub async fn evaluate(
        &self,
        module: Option<Arc<Module>>,
        ctx: CommandContext,
    ) -> Result<bool> {
        (self.check.as_ref())(module, ctx).await
    }
}

impl fmt::Debug for Inhibitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inhibitor").field("name", &self.name).finish()
    }
}
