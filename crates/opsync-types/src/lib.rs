uniffi::setup_scaffolding!();

mod account;
mod amount;
mod id;
mod operation;
mod resources;

pub mod raw;

// export the types
pub use account::{Account, TokenAccount, TokenAccountList};
pub use amount::{Amount, AmountParseError};
pub use id::{AccountId, OperationId};
pub use operation::{Operation, OperationList, OperationType};
pub use raw::{
    AccountRaw, AccountResourcesRaw, OperationRaw, PendingWithdrawalRaw, TokenAccountRaw, VoteRaw,
};
pub use resources::{AccountResources, PendingWithdrawal, Vote, VoteType};
