//! Account and operation builders shared by the unit tests

use std::sync::Arc;

use opsync_types::{
    AccountId, AccountRaw, AccountResourcesRaw, Operation, OperationId, OperationRaw,
    OperationType, PendingWithdrawalRaw, TokenAccountRaw, VoteRaw, VoteType,
};

use crate::convert::from_operation_raw;

pub const ACCOUNT_ID: &str = "js:2:celo:0xabc:";

fn timestamp(n: i64) -> String {
    let date = jiff::Timestamp::from_second(1_600_000_000 + n * 3600).expect("valid timestamp");
    date.to_string()
}

/// Confirmed incoming operation, `n` orders operations in time
pub fn op_raw(hash: &str, n: i64) -> OperationRaw {
    let account_id = AccountId::from(ACCOUNT_ID);

    OperationRaw {
        id: OperationId::encode(&account_id, hash, OperationType::In),
        hash: hash.to_string(),
        op_type: "IN".to_string(),
        account_id,
        date: timestamp(n),
        fee: Some("21000".to_string()),
        value: (n * 1000).to_string(),
        senders: vec!["0xdef".to_string()],
        recipients: vec!["0xabc".to_string()],
        block_height: Some(100 + n as u64),
        block_hash: Some(format!("0xblock{n}")),
    }
}

pub fn op(hash: &str, n: i64) -> Arc<Operation> {
    let raw = op_raw(hash, n);
    from_operation_raw(&raw, &raw.account_id, None)
        .expect("valid raw operation")
        .expect("supported operation type")
}

pub fn token_account_raw(token: &str, operations: Vec<OperationRaw>) -> TokenAccountRaw {
    let id = AccountId::from(format!("{ACCOUNT_ID}+{token}"));
    let operations = operations
        .into_iter()
        .map(|mut op| {
            op.id = OperationId::encode(&id, &op.hash, OperationType::In);
            op.account_id = id.clone();
            op
        })
        .collect();

    TokenAccountRaw {
        id,
        parent_id: AccountId::from(ACCOUNT_ID),
        token_id: token.to_string(),
        balance: "500".to_string(),
        operations,
    }
}

pub fn account_raw(operations: Vec<OperationRaw>) -> AccountRaw {
    AccountRaw {
        id: AccountId::from(ACCOUNT_ID),
        currency_id: "celo".to_string(),
        name: "Celo 1".to_string(),
        index: 0,
        fresh_address: "0xabc".to_string(),
        fresh_address_path: "44'/52752'/0'/0/0".to_string(),
        balance: "2000".to_string(),
        block_height: 200,
        operations,
        pending_operations: vec![],
        token_accounts: None,
        resources: None,
        last_sync_date: timestamp(100),
    }
}

/// Staking state with one pending withdrawal and one active vote
pub fn resources_raw(nonvoting_locked_balance: &str) -> AccountResourcesRaw {
    AccountResourcesRaw {
        registration_status: true,
        locked_balance: "3500".to_string(),
        nonvoting_locked_balance: nonvoting_locked_balance.to_string(),
        pending_withdrawals: vec![PendingWithdrawalRaw {
            index: 0,
            value: "500".to_string(),
            time: timestamp(200),
        }],
        votes: vec![VoteRaw {
            validator_group: "0xgroup".to_string(),
            amount: "2000".to_string(),
            activatable: false,
            revokable: true,
            index: 1,
            vote_type: VoteType::Active,
        }],
    }
}
