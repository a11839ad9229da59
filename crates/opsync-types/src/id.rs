use opsync_macros::new_type;

use crate::operation::OperationType;

new_type!(AccountId, String, "opsync::AccountId");
new_type!(OperationId, String, "opsync::OperationId");

impl OperationId {
    /// Operation ids carry the account, the transaction hash and the type, so two
    /// operations with the same id are the same event
    pub fn encode(account_id: &AccountId, hash: &str, op_type: OperationType) -> Self {
        let op_type: &'static str = op_type.into();
        Self(format!("{account_id}-{hash}-{op_type}"))
    }
}
