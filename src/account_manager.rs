mod message_sender;
pub mod source;

use std::sync::Arc;

use ahash::AHashMap;
use flume::Receiver;
use opsync_macros::impl_default_for;
use opsync_types::{Account, AccountId, AccountRaw, Operation};
use opsync_util::ResultExt as _;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{
    convert::{from_account_raw, to_account_raw},
    database::Database,
    reconciliation::{AccountPatcher, OperationsBuilder, ReconcileObserver},
};
use message_sender::MessageSender;
use source::{AccountSource, OperationSource};

type Message = AccountManagerReconcileMessage;

/// times an operations sync is merged again after the account moved under it
const MAX_SYNC_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum AccountManagerReconcileMessage {
    AccountUpdated(Arc<Account>),
    AccountUnchanged(AccountId),
    AccountRemoved(AccountId),

    /// cached operations of this account (or token account) did not match the
    /// fresh ones and were rebuilt from scratch
    OperationsCacheCleared(AccountId),
}

#[uniffi::export(callback_interface)]
pub trait AccountManagerReconciler: Send + Sync + std::fmt::Debug + 'static {
    /// Tells the frontend to reconcile the view model changes
    fn reconcile(&self, message: AccountManagerReconcileMessage);
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Error, thiserror::Error)]
pub enum AccountManagerError {
    #[error("unable to convert account: {0}")]
    Convert(String),

    #[error("unable to access account cache: {0}")]
    Database(String),

    #[error("unable to get fresh account data: {0}")]
    Source(String),

    #[error("unable to parse account json: {0}")]
    Parse(String),

    #[error("unknown account {0}")]
    UnknownAccount(String),

    #[error("account {0} kept changing during the sync")]
    ConcurrentUpdate(String),
}

pub type Error = AccountManagerError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Forwards cache mismatches to the frontend
#[derive(Debug, Clone)]
struct ChannelObserver(MessageSender<Message>);

impl ReconcileObserver for ChannelObserver {
    fn operation_mismatch(&self, existing: &Operation, fresh: &Operation) {
        warn!("op mismatch on {}, doing a full clear cache", existing.id);
        self.0.send(Message::OperationsCacheCleared(fresh.account_id.clone()));
    }
}

/// Keeps the UI bound accounts, and patches them with fresh sync results
#[derive(Debug, uniffi::Object)]
pub struct RustAccountManager {
    accounts: RwLock<AHashMap<AccountId, Arc<Account>>>,
    /// held from reading an account until its patched version is stored
    update_lock: Mutex<()>,
    db: Database,
    observer: ChannelObserver,
    reconciler: MessageSender<Message>,
    reconcile_receiver: Arc<Receiver<Message>>,
}

#[uniffi::export]
impl RustAccountManager {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::with_database(Database::global().clone())
    }

    #[uniffi::method]
    pub fn listen_for_updates(&self, reconciler: Box<dyn AccountManagerReconciler>) {
        let reconcile_receiver = self.reconcile_receiver.clone();

        std::thread::spawn(move || {
            while let Ok(message) = reconcile_receiver.recv() {
                // call the reconcile method on the frontend
                reconciler.reconcile(message);
            }
        });
    }

    #[uniffi::method(name = "account")]
    pub fn get_account(&self, id: AccountId) -> Option<Arc<Account>> {
        self.account(&id)
    }

    #[uniffi::method(name = "load_cached")]
    pub fn load_cached_account(&self, id: AccountId) -> Result<Option<Arc<Account>>> {
        self.load_cached(&id)
    }

    /// Patch with an account serialized by the sync layer
    pub fn apply_raw_json(&self, json: String) -> Result<Arc<Account>> {
        let raw: AccountRaw = serde_json::from_str(&json).map_err_str(Error::Parse)?;
        self.apply_raw(&raw)
    }

    #[uniffi::method(name = "remove")]
    pub fn remove_account(&self, id: AccountId) -> Result<()> {
        self.remove(&id)
    }
}

impl_default_for!(RustAccountManager);

impl RustAccountManager {
    pub fn with_database(db: Database) -> Self {
        let (sender, receiver) = flume::bounded(1000);
        let reconciler = MessageSender::new(sender);

        Self {
            accounts: RwLock::new(AHashMap::new()),
            update_lock: Mutex::new(()),
            db,
            observer: ChannelObserver(reconciler.clone()),
            reconciler,
            reconcile_receiver: Arc::new(receiver),
        }
    }

    pub fn account(&self, id: &AccountId) -> Option<Arc<Account>> {
        self.accounts.read().get(id).cloned()
    }

    /// Load the cached account into memory, unless it is already there
    pub fn load_cached(&self, id: &AccountId) -> Result<Option<Arc<Account>>> {
        if let Some(account) = self.account(id) {
            return Ok(Some(account));
        }

        let Some(raw) = self.db.accounts.get(id).map_err_str(Error::Database)? else {
            return Ok(None);
        };

        let account = from_account_raw(&raw).map_err_str(Error::Convert)?;
        debug!("loaded cached account {id} with {} operations", account.operations.len());

        let account = self.accounts.write().entry(id.clone()).or_insert(account).clone();
        Ok(Some(account))
    }

    /// Patch the account with freshly synced data
    ///
    /// The frontend only hears about it, and the cache only gets written, when
    /// the patched account is a new `Arc`.
    pub fn apply_raw(&self, raw: &AccountRaw) -> Result<Arc<Account>> {
        let _update = self.update_lock.lock();
        let current = self.load_cached(&raw.id)?;

        let next = match &current {
            Some(current) => AccountPatcher::new(&self.observer)
                .patch_account(current, raw)
                .map_err_str(Error::Convert)?,
            None => from_account_raw(raw).map_err_str(Error::Convert)?,
        };

        if current.as_ref().is_some_and(|current| Arc::ptr_eq(current, &next)) {
            debug!("account {} unchanged", raw.id);
            self.reconciler.send(Message::AccountUnchanged(raw.id.clone()));
            return Ok(next);
        }

        self.store(next.clone())?;
        Ok(next)
    }

    /// Fetch the account from the source and patch it in
    pub async fn sync<S: AccountSource>(&self, id: &AccountId, source: &S) -> Result<Arc<Account>> {
        let raw = source.fetch_account(id).await.map_err_str(Error::Source)?;
        self.apply_raw(&raw)
    }

    /// Rebuild the operations of a loaded account from a source that needs
    /// async work per operation
    ///
    /// The merge runs without holding the update lock. If the operations were
    /// replaced while it ran, it starts over from the new list. Other fields
    /// stored in the meantime are kept.
    pub async fn sync_operations<S: OperationSource>(
        &self,
        id: &AccountId,
        source: &S,
    ) -> Result<Arc<Account>> {
        let mut base = self
            .load_cached(id)?
            .ok_or_else(|| Error::UnknownAccount(id.to_string()))?
            .operations
            .clone();

        for attempt in 1..=MAX_SYNC_ATTEMPTS {
            let mut core_operations = source.core_operations(id).await.map_err_str(Error::Source)?;
            core_operations.reverse();

            let operations = OperationsBuilder::new(&self.observer)
                .build(&base, &core_operations, move |core| source.build_operation(id, core))
                .await
                .map_err_str(Error::Source)?;

            let _update = self.update_lock.lock();
            let current = self.account(id).ok_or_else(|| Error::UnknownAccount(id.to_string()))?;

            if !current.operations.ptr_eq(&base) {
                debug!("operations of {id} changed during sync attempt {attempt}, merging again");
                base = current.operations.clone();
                continue;
            }

            if operations.ptr_eq(&current.operations) {
                self.reconciler.send(Message::AccountUnchanged(id.clone()));
                return Ok(current);
            }

            let mut next = Account::clone(&current);
            next.operations = operations;
            let next = Arc::new(next);

            self.store(next.clone())?;
            return Ok(next);
        }

        warn!("giving up on syncing operations of {id} after {MAX_SYNC_ATTEMPTS} attempts");
        Err(Error::ConcurrentUpdate(id.to_string()))
    }

    pub fn remove(&self, id: &AccountId) -> Result<()> {
        let _update = self.update_lock.lock();
        let in_memory = self.accounts.write().remove(id).is_some();
        let cached = self.db.accounts.delete(id).map_err_str(Error::Database)?;

        if !in_memory && !cached {
            return Err(Error::UnknownAccount(id.to_string()));
        }

        info!("removed account {id}");
        self.reconciler.send(Message::AccountRemoved(id.clone()));

        Ok(())
    }

    fn store(&self, account: Arc<Account>) -> Result<()> {
        self.db.accounts.save(&to_account_raw(&account)).map_err_str(Error::Database)?;
        self.accounts.write().insert(account.id.clone(), account.clone());

        self.reconciler.send(Message::AccountUpdated(account));
        Ok(())
    }
}
