use std::sync::Arc;

use opsync_types::{
    Account, AccountId, AccountRaw, OperationList, OperationRaw, TokenAccount, TokenAccountList,
    TokenAccountRaw,
};
use tracing::debug;

use super::{LOG_OBSERVER, OperationsBuilder, ReconcileObserver};
use crate::convert::{
    self, ConvertError, from_account_raw, from_operation_raw, from_resources_raw,
    from_token_account_raw,
};

type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Applies a freshly synced raw account on top of the in-memory one
#[derive(Clone, Copy)]
pub struct AccountPatcher<'o> {
    builder: OperationsBuilder<'o>,
}

impl Default for AccountPatcher<'static> {
    fn default() -> Self {
        Self::new(&LOG_OBSERVER)
    }
}

impl<'o> AccountPatcher<'o> {
    pub fn new(observer: &'o dyn ReconcileObserver) -> Self {
        Self { builder: OperationsBuilder::new(observer) }
    }

    /// Returns the same `Arc` when nothing changed
    pub fn patch_account(
        &self,
        account: &Arc<Account>,
        updated: &AccountRaw,
    ) -> Result<Arc<Account>> {
        // the id changes when the account gets re-derived, nothing can be kept
        if account.id != updated.id {
            debug!("account id changed from {} to {}, rebuilding", account.id, updated.id);
            return from_account_raw(updated);
        }

        let token_accounts = updated
            .token_accounts
            .as_deref()
            .map(|raws| self.patch_token_accounts(account, raws))
            .transpose()?;

        let operations = self.patch_operations(
            &account.operations,
            &updated.operations,
            &updated.id,
            token_accounts.as_ref(),
        )?;

        let pending_operations = self.patch_operations(
            &account.pending_operations,
            &updated.pending_operations,
            &updated.id,
            token_accounts.as_ref(),
        )?;

        let balance = convert::parse_amount("balance", &updated.balance)?;
        let last_sync_date = convert::parse_date(&updated.last_sync_date)?;
        let resources = updated.resources.as_ref().map(from_resources_raw).transpose()?;

        let mut next = Account::clone(account);
        let mut changed = false;

        if let Some(token_accounts) = token_accounts {
            let same =
                account.token_accounts.as_ref().is_some_and(|tas| tas.ptr_eq(&token_accounts));
            if !same {
                next.token_accounts = Some(token_accounts);
                changed = true;
            }
        }

        if !account.operations.ptr_eq(&operations) {
            next.operations = operations;
            changed = true;
        }

        if !account.pending_operations.ptr_eq(&pending_operations) {
            next.pending_operations = pending_operations;
            changed = true;
        }

        if account.balance != balance {
            next.balance = balance;
            changed = true;
        }

        // absent from the fresh data means not synced this time, the cached state stays
        let resources = resources.filter(|r| account.resources.as_deref() != Some(r.as_ref()));
        if let Some(resources) = resources {
            next.resources = Some(resources);
            changed = true;
        }

        if account.last_sync_date != last_sync_date {
            next.last_sync_date = last_sync_date;
            changed = true;
        }

        if account.fresh_address != updated.fresh_address {
            next.fresh_address = updated.fresh_address.clone();
            changed = true;
        }

        if account.fresh_address_path != updated.fresh_address_path {
            next.fresh_address_path = updated.fresh_address_path.clone();
            changed = true;
        }

        if account.block_height != updated.block_height {
            next.block_height = updated.block_height;
            changed = true;
        }

        if !changed {
            return Ok(account.clone());
        }

        Ok(Arc::new(next))
    }

    /// Returns the same `Arc` when nothing changed
    pub fn patch_token_account(
        &self,
        token_account: &Arc<TokenAccount>,
        updated: &TokenAccountRaw,
    ) -> Result<Arc<TokenAccount>> {
        if token_account.id != updated.id {
            return from_token_account_raw(updated);
        }

        let operations = self.patch_operations(
            &token_account.operations,
            &updated.operations,
            &updated.id,
            None,
        )?;
        let balance = convert::parse_amount("balance", &updated.balance)?;

        let mut next = TokenAccount::clone(token_account);
        let mut changed = false;

        if !token_account.operations.ptr_eq(&operations) {
            next.operations = operations;
            changed = true;
        }

        if token_account.balance != balance {
            next.balance = balance;
            changed = true;
        }

        if !changed {
            return Ok(token_account.clone());
        }

        Ok(Arc::new(next))
    }

    /// Merges raw operations, most recent first, into the cached list
    pub fn patch_operations(
        &self,
        operations: &OperationList,
        updated: &[OperationRaw],
        account_id: &AccountId,
        token_accounts: Option<&TokenAccountList>,
    ) -> Result<OperationList> {
        // the builder walks from the end, so it gets the oldest first
        let oldest_first: Vec<&OperationRaw> = updated.iter().rev().collect();

        self.builder.build_sync(operations, &oldest_first, |raw| {
            from_operation_raw(raw, account_id, token_accounts)
        })
    }

    fn patch_token_accounts(
        &self,
        account: &Account,
        updated: &[TokenAccountRaw],
    ) -> Result<TokenAccountList> {
        let Some(existing) = account.token_accounts.as_ref() else {
            return updated.iter().map(from_token_account_raw).collect();
        };

        let mut changed = existing.len() != updated.len();
        let mut token_accounts = Vec::with_capacity(updated.len());

        for raw in updated {
            let token_account = match account.token_account(&raw.id) {
                Some(current) => {
                    let patched = self.patch_token_account(current, raw)?;
                    changed |= !Arc::ptr_eq(&patched, current);
                    patched
                }
                None => {
                    changed = true;
                    from_token_account_raw(raw)?
                }
            };

            token_accounts.push(token_account);
        }

        if !changed {
            return Ok(existing.clone());
        }

        Ok(token_accounts.into())
    }
}

pub fn patch_account(account: &Arc<Account>, updated: &AccountRaw) -> Result<Arc<Account>> {
    AccountPatcher::default().patch_account(account, updated)
}

pub fn patch_token_account(
    token_account: &Arc<TokenAccount>,
    updated: &TokenAccountRaw,
) -> Result<Arc<TokenAccount>> {
    AccountPatcher::default().patch_token_account(token_account, updated)
}

pub fn patch_operations(
    operations: &OperationList,
    updated: &[OperationRaw],
    account_id: &AccountId,
    token_accounts: Option<&TokenAccountList>,
) -> Result<OperationList> {
    AccountPatcher::default().patch_operations(operations, updated, account_id, token_accounts)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixtures::{account_raw, op_raw, resources_raw, token_account_raw};

    fn cached(raw: &AccountRaw) -> Arc<Account> {
        from_account_raw(raw).unwrap()
    }

    #[test]
    fn test_unchanged_account_passthrough() {
        let mut raw = account_raw(vec![op_raw("0x02", 2), op_raw("0x01", 1)]);
        raw.pending_operations = vec![op_raw("0x03", 3)];
        raw.token_accounts = Some(vec![token_account_raw("usdc", vec![op_raw("0x02", 2)])]);
        raw.resources = Some(resources_raw("1000"));
        let account = cached(&raw);

        let patched = patch_account(&account, &raw).unwrap();

        assert!(Arc::ptr_eq(&patched, &account));
    }

    #[test]
    fn test_changed_resources_are_patched() {
        let mut raw = account_raw(vec![op_raw("0x01", 1)]);
        raw.resources = Some(resources_raw("1000"));
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.resources = Some(resources_raw("400"));
        let patched = patch_account(&account, &updated).unwrap();

        assert!(!Arc::ptr_eq(&patched, &account));
        assert_eq!(patched.nonvoting_locked_balance_string(), Some("400".to_string()));
        assert!(patched.operations.ptr_eq(&account.operations));
    }

    #[test]
    fn test_missing_resources_keep_the_cached_ones() {
        let mut raw = account_raw(vec![]);
        raw.resources = Some(resources_raw("1000"));
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.resources = None;
        let patched = patch_account(&account, &updated).unwrap();

        assert!(Arc::ptr_eq(&patched, &account));
        assert_eq!(patched.locked_balance_string(), Some("3500".to_string()));
    }

    #[test]
    fn test_first_resources_are_a_change() {
        let raw = account_raw(vec![]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.resources = Some(resources_raw("1000"));
        let patched = patch_account(&account, &updated).unwrap();

        assert!(!Arc::ptr_eq(&patched, &account));
        assert_eq!(patched.revokable_votes_count(), 1);
    }

    #[test]
    fn test_new_operation_keeps_older_ones() {
        let raw = account_raw(vec![op_raw("0x01", 1)]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.operations.insert(0, op_raw("0x02", 2));
        updated.balance = "3000".to_string();
        let patched = patch_account(&account, &updated).unwrap();

        assert!(!Arc::ptr_eq(&patched, &account));
        assert_eq!(patched.operations.len(), 2);
        assert_eq!(patched.operations[0].hash, "0x02");
        assert!(Arc::ptr_eq(&patched.operations[1], &account.operations[0]));
        assert!(patched.pending_operations.ptr_eq(&account.pending_operations));
        assert_eq!(patched.balance.to_string(), "3000");
    }

    #[test]
    fn test_scalar_fields_are_patched() {
        let raw = account_raw(vec![op_raw("0x01", 1)]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.block_height = raw.block_height + 1;
        updated.fresh_address = "0xnext".to_string();
        updated.fresh_address_path = "44'/52752'/0'/0/1".to_string();
        updated.last_sync_date = "2021-04-01T00:00:00Z".to_string();
        let patched = patch_account(&account, &updated).unwrap();

        assert_eq!(patched.block_height, raw.block_height + 1);
        assert_eq!(patched.fresh_address, "0xnext");
        assert_eq!(patched.fresh_address_path, "44'/52752'/0'/0/1");
        assert_eq!(patched.last_sync_date.to_string(), "2021-04-01T00:00:00Z");
        assert!(patched.operations.ptr_eq(&account.operations));
    }

    #[test]
    fn test_balance_compared_numerically() {
        let raw = account_raw(vec![]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.balance = format!("00{}", raw.balance);

        let patched = patch_account(&account, &updated).unwrap();
        assert!(Arc::ptr_eq(&patched, &account));
    }

    #[test]
    fn test_changed_id_rebuilds_everything() {
        let raw = account_raw(vec![op_raw("0x01", 1)]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.id = AccountId::from("js:3:celo:0xabc:");
        let patched = patch_account(&account, &updated).unwrap();

        assert_eq!(patched.id, updated.id);
        assert!(!Arc::ptr_eq(&patched.operations[0], &account.operations[0]));
    }

    #[test]
    fn test_pending_operation_confirmed() {
        let mut raw = account_raw(vec![op_raw("0x01", 1)]);
        let mut pending = op_raw("0x02", 2);
        pending.block_height = None;
        pending.block_hash = None;
        raw.pending_operations = vec![pending.clone()];
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.pending_operations = vec![];
        updated.operations.insert(0, op_raw("0x02", 2));
        let patched = patch_account(&account, &updated).unwrap();

        assert!(patched.pending_operations.is_empty());
        assert_eq!(patched.operations[0].block_height, Some(102));
        assert!(Arc::ptr_eq(&patched.operations[1], &account.operations[0]));
    }

    #[test]
    fn test_untouched_token_accounts_are_kept() {
        let mut raw = account_raw(vec![op_raw("0x01", 1)]);
        raw.token_accounts = Some(vec![
            token_account_raw("usdc", vec![op_raw("0x10", 1)]),
            token_account_raw("dai", vec![op_raw("0x20", 1)]),
        ]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.operations.insert(0, op_raw("0x02", 2));
        let patched = patch_account(&account, &updated).unwrap();

        let before = account.token_accounts.as_ref().unwrap();
        let after = patched.token_accounts.as_ref().unwrap();
        assert!(after.ptr_eq(before));
    }

    #[test]
    fn test_one_token_account_changed() {
        let mut raw = account_raw(vec![]);
        raw.token_accounts = Some(vec![
            token_account_raw("usdc", vec![op_raw("0x10", 1)]),
            token_account_raw("dai", vec![op_raw("0x20", 1)]),
        ]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        let tokens = updated.token_accounts.as_mut().unwrap();
        tokens[1].balance = "1".to_string();
        let patched = patch_account(&account, &updated).unwrap();

        let before = account.token_accounts.as_ref().unwrap();
        let after = patched.token_accounts.as_ref().unwrap();
        assert!(!after.ptr_eq(before));
        assert!(Arc::ptr_eq(&after[0], &before[0]));
        assert!(!Arc::ptr_eq(&after[1], &before[1]));
        assert!(after[1].operations.ptr_eq(&before[1].operations));
    }

    #[test]
    fn test_replaced_token_account_is_a_change() {
        let mut raw = account_raw(vec![]);
        raw.token_accounts = Some(vec![token_account_raw("usdc", vec![])]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.token_accounts = Some(vec![token_account_raw("dai", vec![])]);
        let patched = patch_account(&account, &updated).unwrap();

        let after = patched.token_accounts.as_ref().unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].token_id, "dai");
    }

    #[test]
    fn test_missing_token_accounts_keep_the_cached_ones() {
        let mut raw = account_raw(vec![]);
        raw.token_accounts = Some(vec![token_account_raw("usdc", vec![])]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.token_accounts = None;
        let patched = patch_account(&account, &updated).unwrap();

        assert!(Arc::ptr_eq(&patched, &account));
    }

    #[test]
    fn test_token_account_passthrough() {
        let raw = token_account_raw("usdc", vec![op_raw("0x10", 1)]);
        let token_account = from_token_account_raw(&raw).unwrap();

        let patched = patch_token_account(&token_account, &raw).unwrap();
        assert!(Arc::ptr_eq(&patched, &token_account));
    }

    #[test]
    fn test_invalid_balance_is_an_error() {
        let raw = account_raw(vec![]);
        let account = cached(&raw);

        let mut updated = raw.clone();
        updated.balance = "lots".to_string();

        let error = patch_account(&account, &updated).unwrap_err();
        assert_eq!(error, ConvertError::InvalidAmount { field: "balance", value: "lots".into() });
    }

    #[test]
    fn test_patch_operations_reverses_raw_order() {
        let raws = vec![op_raw("0x03", 3), op_raw("0x02", 2), op_raw("0x01", 1)];
        let account_id = raws[0].account_id.clone();

        let ops = patch_operations(&OperationList::empty(), &raws, &account_id, None).unwrap();
        let hashes: Vec<_> = ops.iter().map(|op| op.hash.as_str()).collect();

        assert_eq!(hashes, vec!["0x03", "0x02", "0x01"]);
    }
}
