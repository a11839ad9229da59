//! Merges freshly synced operations into the cached, UI bound ones.
//!
//! Operations are immutable, so every operation that did not change keeps its
//! `Arc`, and an account where nothing changed comes back as the very same
//! `Arc<Account>`. The frontend relies on that identity to skip re-rendering.

mod builder;
mod patch;
mod same_op;

use opsync_types::Operation;
use tracing::warn;

pub use builder::{OperationsBuilder, minimal_operations_builder, minimal_operations_builder_sync};
pub use patch::{AccountPatcher, patch_account, patch_operations, patch_token_account};
pub use same_op::same_op;

/// Receives diagnostics raised while reconciling
pub trait ReconcileObserver: Send + Sync {
    /// A cached operation differs from its fresh version in a field that never
    /// changes once the operation exists, the cached list is dropped.
    fn operation_mismatch(&self, existing: &Operation, fresh: &Operation);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

pub(crate) static LOG_OBSERVER: LogObserver = LogObserver;

impl ReconcileObserver for LogObserver {
    fn operation_mismatch(&self, existing: &Operation, fresh: &Operation) {
        warn!(
            "op mismatch on {} (cached value {}, fresh value {}), doing a full clear cache",
            fresh.id, existing.value, fresh.value
        );
    }
}
