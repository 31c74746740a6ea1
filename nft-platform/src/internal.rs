use crate::collection::Collection;
use crate::common::*;
use crate::{errors, ContractMode, Platform};
use near_sdk::serde_json::json;

pub(crate) fn now_seconds() -> u64 {
    env::block_timestamp() / 1_000_000_000
}

/// Composite key for per-collection, per-account maps.
pub(crate) fn wallet_key(collection_id: &CollectionId, account_id: &AccountId) -> String {
    format!("{}|{}", collection_id, account_id)
}

/// Smaller of two bounds where `None` means unbounded.
pub(crate) fn min_bound(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Zero-pad width for default token names, derived from the collection cap.
pub(crate) fn serial_pad_width(max_supply: u64) -> usize {
    if max_supply >= 100_000 {
        5
    } else if max_supply >= 10_000 {
        4
    } else if max_supply >= 1_000 {
        3
    } else if max_supply >= 100 {
        2
    } else {
        1
    }
}

pub(crate) fn default_token_name(collection: &Collection, serial: u64) -> String {
    let width = serial_pad_width(collection.max_supply);
    format!("{} No.{:0width$}", collection.name, serial, width = width)
}

pub(crate) fn default_properties_json(collection: &Collection, serial: u64) -> String {
    json!({ "name": default_token_name(collection, serial) }).to_string()
}

impl Platform {
    /// Resolves the effective collection id for a request. Factory mode
    /// passes the id through; dedicated mode only ever serves its bound
    /// collection.
    pub(crate) fn enforce_collection_scope(&self, collection_id: &CollectionId) -> CollectionId {
        require!(!collection_id.is_empty(), errors::ERR_INVALID_COLLECTION_ID);
        match &self.mode {
            ContractMode::Factory => collection_id.clone(),
            ContractMode::Dedicated { collection_id: bound } => {
                require!(collection_id == bound, errors::ERR_SCOPE_VIOLATION);
                bound.clone()
            }
        }
    }

    pub(crate) fn assert_token_within_scope(&self, token_id: &TokenId) {
        if let ContractMode::Dedicated { collection_id: bound } = &self.mode {
            let prefix = token_id.split(TOKEN_DELIMETER).next().unwrap_or_default();
            require!(prefix == bound, errors::ERR_TOKEN_OUT_OF_SCOPE);
        }
    }

    pub(crate) fn assert_factory_mode(&self) {
        require!(
            matches!(self.mode, ContractMode::Factory),
            errors::ERR_FACTORY_ONLY
        );
    }

    pub(crate) fn get_collection_or_panic(&self, collection_id: &CollectionId) -> Collection {
        self.collections
            .get(collection_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_COLLECTION_NOT_FOUND))
    }

    pub(crate) fn can_manage(&self, collection_id: &CollectionId, collection: &Collection, account_id: &AccountId) -> bool {
        account_id == &collection.owner_id
            || self.operators.contains(&wallet_key(collection_id, account_id))
    }

    /// Owner-witness gate for collection configuration calls.
    pub(crate) fn assert_collection_owner(&self, collection: &Collection) {
        require!(
            env::predecessor_account_id() == collection.owner_id,
            errors::ERR_UNAUTHORIZED
        );
    }

    pub(crate) fn internal_membership_balance(&self, collection_id: &CollectionId, account_id: &AccountId) -> u64 {
        self.membership_balances
            .get(&wallet_key(collection_id, account_id))
            .unwrap_or(0)
    }

    pub(crate) fn increase_membership_balance(&mut self, collection_id: &CollectionId, account_id: &AccountId) {
        let key = wallet_key(collection_id, account_id);
        let balance = self.membership_balances.get(&key).unwrap_or(0);
        self.membership_balances.insert(&key, &(balance + 1));
    }

    // Entries are deleted rather than zeroed.
    pub(crate) fn decrease_membership_balance(&mut self, collection_id: &CollectionId, account_id: &AccountId) {
        let key = wallet_key(collection_id, account_id);
        let balance = self.membership_balances.get(&key).unwrap_or(0);
        if balance <= 1 {
            self.membership_balances.remove(&key);
        } else {
            self.membership_balances.insert(&key, &(balance - 1));
        }
    }

    pub(crate) fn set_balance(&mut self, account_id: &AccountId, balance: u64) {
        if balance == 0 {
            self.balances.remove(account_id);
        } else {
            self.balances.insert(account_id, &balance);
        }
    }

    pub(crate) fn add_token_to_owner(&mut self, account_id: &AccountId, token_id: &TokenId) {
        let mut owned = self.tokens_per_owner.get(account_id).unwrap_or_else(|| {
            UnorderedSet::new(crate::StorageKey::TokensPerOwnerInner {
                account_hash: env::sha256(account_id.as_bytes()),
            })
        });
        owned.insert(token_id);
        self.tokens_per_owner.insert(account_id, &owned);
        let balance = self.balances.get(account_id).unwrap_or(0);
        self.set_balance(account_id, balance + 1);
    }

    pub(crate) fn remove_token_from_owner(&mut self, account_id: &AccountId, token_id: &TokenId) {
        if let Some(mut owned) = self.tokens_per_owner.get(account_id) {
            owned.remove(token_id);
            if owned.is_empty() {
                self.tokens_per_owner.remove(account_id);
            } else {
                self.tokens_per_owner.insert(account_id, &owned);
            }
        }
        let balance = self.balances.get(account_id).unwrap_or(0);
        self.set_balance(account_id, balance.saturating_sub(1));
    }

    pub(crate) fn add_token_to_collection(&mut self, collection_id: &CollectionId, token_id: &TokenId) {
        let mut set = self.tokens_per_collection.get(collection_id).unwrap_or_else(|| {
            UnorderedSet::new(
                crate::StorageKey::TokensPerCollectionInner {
                    collection_id: collection_id.clone(),
                }
                .try_to_vec()
                .unwrap(),
            )
        });
        set.insert(token_id);
        self.tokens_per_collection.insert(collection_id, &set);
    }

    pub(crate) fn remove_token_from_collection(&mut self, collection_id: &CollectionId, token_id: &TokenId) {
        if let Some(mut set) = self.tokens_per_collection.get(collection_id) {
            set.remove(token_id);
            self.tokens_per_collection.insert(collection_id, &set);
        }
    }
}
