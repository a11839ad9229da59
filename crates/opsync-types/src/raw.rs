//! Serialized account shapes, as delivered by the sync layer and stored in the cache

use serde::{Deserialize, Serialize};

use crate::{AccountId, OperationId, VoteType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRaw {
    pub id: OperationId,
    pub hash: String,
    #[serde(rename = "type")]
    pub op_type: String,
    pub account_id: AccountId,
    /// RFC 3339
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    pub value: String,
    #[serde(default)]
    pub senders: Vec<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountRaw {
    pub id: AccountId,
    pub parent_id: AccountId,
    pub token_id: String,
    pub balance: String,
    #[serde(default)]
    pub operations: Vec<OperationRaw>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRaw {
    pub id: AccountId,
    pub currency_id: String,
    pub name: String,
    pub index: u32,
    pub fresh_address: String,
    pub fresh_address_path: String,
    pub balance: String,
    pub block_height: u64,
    /// most recent first
    #[serde(default)]
    pub operations: Vec<OperationRaw>,
    #[serde(default)]
    pub pending_operations: Vec<OperationRaw>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_accounts: Option<Vec<TokenAccountRaw>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<AccountResourcesRaw>,
    /// RFC 3339
    pub last_sync_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResourcesRaw {
    pub registration_status: bool,
    pub locked_balance: String,
    pub nonvoting_locked_balance: String,
    #[serde(default)]
    pub pending_withdrawals: Vec<PendingWithdrawalRaw>,
    #[serde(default)]
    pub votes: Vec<VoteRaw>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWithdrawalRaw {
    pub index: u32,
    pub value: String,
    /// RFC 3339
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRaw {
    pub validator_group: String,
    pub amount: String,
    pub activatable: bool,
    pub revokable: bool,
    pub index: u32,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}
