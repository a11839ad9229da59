//! Where fresh account data comes from, implemented by the chain specific sync layer

use std::sync::Arc;

use opsync_types::{AccountId, AccountRaw, Operation};

use crate::convert::ConvertError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("unable to reach the node: {0}")]
    Network(String),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("account {0} not found")]
    NotFound(AccountId),
}

/// Delivers a complete, freshly synced account
#[async_trait::async_trait]
pub trait AccountSource: Send + Sync {
    async fn fetch_account(&self, id: &AccountId) -> Result<AccountRaw, SourceError>;
}

/// Delivers operations in a chain native form that needs async work to become
/// an [`Operation`], resolving token transfers or contract calls for example
#[async_trait::async_trait]
pub trait OperationSource: Send + Sync {
    type CoreOperation: Send + Sync;

    /// Most recent first
    async fn core_operations(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Self::CoreOperation>, SourceError>;

    /// `None` skips the operation
    async fn build_operation(
        &self,
        account_id: &AccountId,
        core_operation: &Self::CoreOperation,
    ) -> Result<Option<Arc<Operation>>, SourceError>;
}
