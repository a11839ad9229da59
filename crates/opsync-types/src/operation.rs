use std::sync::Arc;

use opsync_macros::shared_list;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, OperationId};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    uniffi::Enum,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OperationType {
    In,
    Out,
    Fees,
    Reward,

    // staking and governance
    Lock,
    Unlock,
    Withdraw,
    Vote,
    Activate,
    Revoke,
    Register,
}

/// A single blockchain event as seen by one account
///
/// Operations are built once and shared behind an `Arc`, an update is always a
/// new value. Only `block_height` (and with it `block_hash`) may differ between
/// two operations with the same id, anything else is a stale cache.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct Operation {
    pub id: OperationId,
    pub hash: String,
    pub op_type: OperationType,
    pub account_id: AccountId,
    pub date: jiff::Timestamp,
    pub fee: Option<Amount>,
    pub value: Amount,
    pub senders: Vec<String>,
    pub recipients: Vec<String>,
    pub block_height: Option<u64>,
    pub block_hash: Option<String>,

    /// token operations that happened in the same transaction
    pub sub_operations: Vec<Arc<Operation>>,
}

shared_list!(OperationList, Operation);

#[uniffi::export]
impl Operation {
    pub fn is_confirmed(&self) -> bool {
        self.block_height.is_some()
    }

    #[uniffi::method(name = "id")]
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    pub fn tx_hash(&self) -> String {
        self.hash.clone()
    }

    pub fn operation_type(&self) -> OperationType {
        self.op_type
    }

    #[uniffi::method(name = "block_height")]
    pub fn confirmed_height(&self) -> Option<u64> {
        self.block_height
    }

    pub fn value_string(&self) -> String {
        self.value.to_string()
    }

    pub fn fee_string(&self) -> Option<String> {
        self.fee.as_ref().map(ToString::to_string)
    }

    pub fn date_unix_seconds(&self) -> i64 {
        self.date.as_second()
    }
}

impl OperationList {
    /// Position of the first operation with the given id
    pub fn position(&self, id: &OperationId) -> Option<usize> {
        self.iter().position(|op| &op.id == id)
    }
}
