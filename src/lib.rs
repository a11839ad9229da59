pub mod account_manager;
pub mod consts;
pub mod convert;
pub mod database;
pub mod reconciliation;

pub(crate) mod logging;
pub(crate) mod task;

#[cfg(test)]
mod fixtures;

pub use opsync_types::{
    Account, AccountId, Amount, Operation, OperationId, OperationList, OperationType,
    TokenAccount, TokenAccountList,
};

uniffi::setup_scaffolding!();
