//! Rollback support for the install pipeline
//!
//! A [`RollbackGuard`] is created before the first mutating step and wraps
//! the executor for the rest of the pipeline. Unless it is committed, dropping
//! it undoes service registration and, under force, removes the install root
//! and config directory. This covers early returns and propagated errors
//! alike.
//!
//! ## Usage
//!
//! ```ignore
//! let mut guard = RollbackGuard::new(&mut exec, ctx, &strategy);
//!
//! // Perform operations through guard.executor()...
//!
//! // On success:
//! guard.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```
//!
//! Rollback is declarative: what to remove is derived from the detected init
//! system and the request, not replayed from a log. Every sub-step ignores
//! its own failure.

use crate::exec::{ExecutionAction, Executor};
use crate::service::{self, ServiceContext, ServiceStrategy};
use crate::ui::display;

/// Scoped rollback for one pipeline run
pub struct RollbackGuard<'g, 'a> {
    exec: &'g mut Executor<'a>,
    ctx: ServiceContext<'g>,
    strategy: &'g ServiceStrategy,

    /// Dry-run guards are never armed; there is nothing to undo
    armed: bool,
}

impl<'g, 'a> RollbackGuard<'g, 'a> {
    pub fn new(
        exec: &'g mut Executor<'a>,
        ctx: ServiceContext<'g>,
        strategy: &'g ServiceStrategy,
    ) -> Self {
        let armed = !exec.is_dry_run();
        Self {
            exec,
            ctx,
            strategy,
            armed,
        }
    }

    /// Executor for pipeline steps run under this guard
    pub fn executor(&mut self) -> &mut Executor<'a> {
        &mut *self.exec
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Disarm the guard after a successful run
    pub fn commit(mut self) {
        self.armed = false;
    }

    /// Undo what the failed run may have left behind
    pub fn rollback(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;

        let request = self.ctx.request;
        display::warn("Installation failed; rolling back");
        tracing::debug!(init = self.strategy.descriptor().init_id(), "rollback");

        if request.flags.skip_service {
            tracing::debug!("service registration was skipped; nothing to unregister");
        } else {
            service::remove_service(self.strategy, &self.ctx, &mut *self.exec);
        }

        if request.flags.force {
            for dir in [&request.paths.install_root, &request.paths.config_dir] {
                self.exec.execute_best_effort(ExecutionAction::remove_tree(
                    format!("Remove {}", dir.display()),
                    dir,
                ));
            }
        }
    }
}

impl Drop for RollbackGuard<'_, '_> {
    fn drop(&mut self) {
        if self.armed {
            // Automatic rollback on drop if not committed
            self.rollback();
        }
    }
}

#[cfg(test)]
mod tests;
