use std::sync::Arc;

use opsync_macros::shared_list;

use crate::{AccountId, AccountResources, Amount, OperationList};

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct Account {
    pub id: AccountId,
    pub currency_id: String,
    pub name: String,
    pub index: u32,
    pub fresh_address: String,
    pub fresh_address_path: String,
    pub balance: Amount,
    pub block_height: u64,

    /// most recent first
    pub operations: OperationList,
    pub pending_operations: OperationList,

    pub token_accounts: Option<TokenAccountList>,
    pub resources: Option<Arc<AccountResources>>,
    pub last_sync_date: jiff::Timestamp,
}

/// Sub ledger of a single token inside a parent account
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct TokenAccount {
    pub id: AccountId,
    pub parent_id: AccountId,
    pub token_id: String,
    pub balance: Amount,
    pub operations: OperationList,
}

shared_list!(TokenAccountList, TokenAccount);

impl Account {
    pub fn token_account(&self, id: &AccountId) -> Option<&Arc<TokenAccount>> {
        self.token_accounts.as_ref()?.iter().find(|ta| &ta.id == id)
    }
}

#[uniffi::export]
impl Account {
    #[uniffi::method(name = "id")]
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn balance_string(&self) -> String {
        self.balance.to_string()
    }

    pub fn operations_count(&self) -> u64 {
        self.operations.len() as u64
    }

    pub fn pending_operations_count(&self) -> u64 {
        self.pending_operations.len() as u64
    }

    pub fn locked_balance_string(&self) -> Option<String> {
        Some(self.resources.as_ref()?.locked_balance.to_string())
    }

    pub fn nonvoting_locked_balance_string(&self) -> Option<String> {
        Some(self.resources.as_ref()?.nonvoting_locked_balance.to_string())
    }

    /// Amount of the vote for `validator_group` at `index`, what a revoke of it moves
    pub fn vote_amount_string(&self, validator_group: String, index: u32) -> Option<String> {
        let vote = self.resources.as_ref()?.vote(&validator_group, index)?;
        Some(vote.amount.to_string())
    }

    pub fn revokable_votes_count(&self) -> u64 {
        self.resources.as_ref().map_or(0, |r| r.revokable_votes().count() as u64)
    }

    pub fn last_sync_unix_seconds(&self) -> i64 {
        self.last_sync_date.as_second()
    }
}

#[uniffi::export]
impl TokenAccount {
    pub fn token(&self) -> String {
        self.token_id.clone()
    }

    pub fn balance_string(&self) -> String {
        self.balance.to_string()
    }
}
