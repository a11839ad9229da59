//! Conversions between the serialized account shapes and the in-memory domain types

use std::{str::FromStr as _, sync::Arc};

use opsync_types::{
    Account, AccountId, AccountRaw, AccountResources, AccountResourcesRaw, Amount, Operation,
    OperationList, OperationRaw, OperationType, PendingWithdrawal, PendingWithdrawalRaw,
    TokenAccount, TokenAccountList, TokenAccountRaw, Vote, VoteRaw,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid {field} amount {value:?}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("invalid date {value:?}: {error}")]
    InvalidDate { value: String, error: String },
}

type Result<T, E = ConvertError> = std::result::Result<T, E>;

pub(crate) fn parse_amount(field: &'static str, value: &str) -> Result<Amount> {
    value.parse().map_err(|_| ConvertError::InvalidAmount { field, value: value.to_string() })
}

pub(crate) fn parse_date(value: &str) -> Result<jiff::Timestamp> {
    value
        .parse()
        .map_err(|error: jiff::Error| ConvertError::InvalidDate {
            value: value.to_string(),
            error: error.to_string(),
        })
}

/// Build an operation from its raw form
///
/// Returns `Ok(None)` for operation types this wallet does not display, those
/// records are skipped by the reconciliation. When token accounts are given,
/// their operations sharing the transaction hash become the sub operations.
pub fn from_operation_raw(
    raw: &OperationRaw,
    account_id: &AccountId,
    token_accounts: Option<&TokenAccountList>,
) -> Result<Option<Arc<Operation>>> {
    let Ok(op_type) = OperationType::from_str(&raw.op_type) else {
        debug!("skipping operation {} with unsupported type {}", raw.id, raw.op_type);
        return Ok(None);
    };

    let fee = raw.fee.as_deref().map(|fee| parse_amount("fee", fee)).transpose()?;

    let sub_operations = token_accounts
        .map(|token_accounts| {
            token_accounts
                .iter()
                .flat_map(|ta| ta.operations.iter())
                .filter(|op| op.hash == raw.hash)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let operation = Operation {
        id: raw.id.clone(),
        hash: raw.hash.clone(),
        op_type,
        account_id: account_id.clone(),
        date: parse_date(&raw.date)?,
        fee,
        value: parse_amount("value", &raw.value)?,
        senders: raw.senders.clone(),
        recipients: raw.recipients.clone(),
        block_height: raw.block_height,
        block_hash: raw.block_hash.clone(),
        sub_operations,
    };

    Ok(Some(Arc::new(operation)))
}

fn operations_from_raw(
    raws: &[OperationRaw],
    account_id: &AccountId,
    token_accounts: Option<&TokenAccountList>,
) -> Result<OperationList> {
    let mut operations = Vec::with_capacity(raws.len());
    for raw in raws {
        if let Some(op) = from_operation_raw(raw, account_id, token_accounts)? {
            operations.push(op);
        }
    }

    Ok(operations.into())
}

pub fn from_token_account_raw(raw: &TokenAccountRaw) -> Result<Arc<TokenAccount>> {
    let token_account = TokenAccount {
        id: raw.id.clone(),
        parent_id: raw.parent_id.clone(),
        token_id: raw.token_id.clone(),
        balance: parse_amount("balance", &raw.balance)?,
        operations: operations_from_raw(&raw.operations, &raw.id, None)?,
    };

    Ok(Arc::new(token_account))
}

pub fn from_resources_raw(raw: &AccountResourcesRaw) -> Result<Arc<AccountResources>> {
    let pending_withdrawals = raw
        .pending_withdrawals
        .iter()
        .map(|withdrawal| -> Result<PendingWithdrawal> {
            Ok(PendingWithdrawal {
                index: withdrawal.index,
                value: parse_amount("pending withdrawal", &withdrawal.value)?,
                time: parse_date(&withdrawal.time)?,
            })
        })
        .collect::<Result<_>>()?;

    let votes = raw
        .votes
        .iter()
        .map(|vote| -> Result<Vote> {
            Ok(Vote {
                validator_group: vote.validator_group.clone(),
                amount: parse_amount("vote", &vote.amount)?,
                activatable: vote.activatable,
                revokable: vote.revokable,
                index: vote.index,
                vote_type: vote.vote_type,
            })
        })
        .collect::<Result<_>>()?;

    let resources = AccountResources {
        registered: raw.registration_status,
        locked_balance: parse_amount("locked balance", &raw.locked_balance)?,
        nonvoting_locked_balance: parse_amount(
            "nonvoting locked balance",
            &raw.nonvoting_locked_balance,
        )?,
        pending_withdrawals,
        votes,
    };

    Ok(Arc::new(resources))
}

pub fn from_account_raw(raw: &AccountRaw) -> Result<Arc<Account>> {
    let token_accounts = raw
        .token_accounts
        .as_ref()
        .map(|raws| raws.iter().map(from_token_account_raw).collect::<Result<TokenAccountList>>())
        .transpose()?;

    let operations = operations_from_raw(&raw.operations, &raw.id, token_accounts.as_ref())?;
    let pending_operations =
        operations_from_raw(&raw.pending_operations, &raw.id, token_accounts.as_ref())?;

    let account = Account {
        id: raw.id.clone(),
        currency_id: raw.currency_id.clone(),
        name: raw.name.clone(),
        index: raw.index,
        fresh_address: raw.fresh_address.clone(),
        fresh_address_path: raw.fresh_address_path.clone(),
        balance: parse_amount("balance", &raw.balance)?,
        block_height: raw.block_height,
        operations,
        pending_operations,
        token_accounts,
        resources: raw.resources.as_ref().map(from_resources_raw).transpose()?,
        last_sync_date: parse_date(&raw.last_sync_date)?,
    };

    Ok(Arc::new(account))
}

pub fn to_operation_raw(op: &Operation) -> OperationRaw {
    let op_type: &'static str = op.op_type.into();

    OperationRaw {
        id: op.id.clone(),
        hash: op.hash.clone(),
        op_type: op_type.to_string(),
        account_id: op.account_id.clone(),
        date: op.date.to_string(),
        fee: op.fee.as_ref().map(ToString::to_string),
        value: op.value.to_string(),
        senders: op.senders.clone(),
        recipients: op.recipients.clone(),
        block_height: op.block_height,
        block_hash: op.block_hash.clone(),
    }
}

pub fn to_token_account_raw(token_account: &TokenAccount) -> TokenAccountRaw {
    TokenAccountRaw {
        id: token_account.id.clone(),
        parent_id: token_account.parent_id.clone(),
        token_id: token_account.token_id.clone(),
        balance: token_account.balance.to_string(),
        operations: token_account.operations.iter().map(|op| to_operation_raw(op)).collect(),
    }
}

pub fn to_resources_raw(resources: &AccountResources) -> AccountResourcesRaw {
    AccountResourcesRaw {
        registration_status: resources.registered,
        locked_balance: resources.locked_balance.to_string(),
        nonvoting_locked_balance: resources.nonvoting_locked_balance.to_string(),
        pending_withdrawals: resources
            .pending_withdrawals
            .iter()
            .map(|withdrawal| PendingWithdrawalRaw {
                index: withdrawal.index,
                value: withdrawal.value.to_string(),
                time: withdrawal.time.to_string(),
            })
            .collect(),
        votes: resources
            .votes
            .iter()
            .map(|vote| VoteRaw {
                validator_group: vote.validator_group.clone(),
                amount: vote.amount.to_string(),
                activatable: vote.activatable,
                revokable: vote.revokable,
                index: vote.index,
                vote_type: vote.vote_type,
            })
            .collect(),
    }
}

pub fn to_account_raw(account: &Account) -> AccountRaw {
    AccountRaw {
        id: account.id.clone(),
        currency_id: account.currency_id.clone(),
        name: account.name.clone(),
        index: account.index,
        fresh_address: account.fresh_address.clone(),
        fresh_address_path: account.fresh_address_path.clone(),
        balance: account.balance.to_string(),
        block_height: account.block_height,
        operations: account.operations.iter().map(|op| to_operation_raw(op)).collect(),
        pending_operations: account
            .pending_operations
            .iter()
            .map(|op| to_operation_raw(op))
            .collect(),
        token_accounts: account
            .token_accounts
            .as_ref()
            .map(|tas| tas.iter().map(|ta| to_token_account_raw(ta)).collect()),
        resources: account.resources.as_deref().map(to_resources_raw),
        last_sync_date: account.last_sync_date.to_string(),
    }
}
