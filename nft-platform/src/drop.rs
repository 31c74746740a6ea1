use crate::collection::Collection;
use crate::common::*;
use crate::internal::{min_bound, now_seconds, wallet_key};
use crate::token::TokenClass;
use crate::{errors, event, Platform, PlatformExt};

pub const MAX_WHITELIST_BATCH: usize = 500;

/// Campaign parameters for a collection. Absence of a stored config reads as
/// all-zero and disabled; admission is recomputed on every claim, there is no
/// stored lifecycle state.
#[derive(BorshDeserialize, BorshSerialize, Default)]
pub struct DropConfig {
    pub enabled: bool,
    pub start_at: u64,
    pub end_at: u64,
    pub per_wallet_limit: u64,
    pub whitelist_required: bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct DropConfigJson {
    pub collection_id: CollectionId,
    pub enabled: bool,
    pub start_at: U64,
    pub end_at: U64,
    pub per_wallet_limit: U64,
    pub whitelist_required: bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct DropWalletStatsJson {
    pub claimed: U64,
    /// Whitelist allowance; absent when the drop does not require one.
    pub allowance: Option<U64>,
    /// Claims still open to this wallet; absent means unbounded.
    pub remaining: Option<U64>,
    pub claimable_now: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct WhitelistEntry {
    pub account_id: AccountId,
    pub allowance: U64,
}

impl DropConfig {
    fn to_json(&self, collection_id: &CollectionId) -> DropConfigJson {
        DropConfigJson {
            collection_id: collection_id.clone(),
            enabled: self.enabled,
            start_at: U64(self.start_at),
            end_at: U64(self.end_at),
            per_wallet_limit: U64(self.per_wallet_limit),
            whitelist_required: self.whitelist_required,
        }
    }

    fn window_open(&self, now: u64) -> bool {
        (self.start_at == 0 || now >= self.start_at) && (self.end_at == 0 || now <= self.end_at)
    }
}

#[near_bindgen]
impl Platform {
    #[payable]
    pub fn configure_drop(
        &mut self,
        collection_id: CollectionId,
        enabled: bool,
        start_at: U64,
        end_at: U64,
        per_wallet_limit: U64,
        whitelist_required: bool,
    ) {
        assert_one_yocto();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);
        require!(
            start_at.0 == 0 || end_at.0 == 0 || end_at.0 > start_at.0,
            errors::ERR_DROP_WINDOW_ORDER
        );

        let config = DropConfig {
            enabled,
            start_at: start_at.0,
            end_at: end_at.0,
            per_wallet_limit: per_wallet_limit.0,
            whitelist_required,
        };
        self.drop_configs.insert(&collection_id, &config);
        event::drop_config_updated(&collection_id, &config);
    }

    #[payable]
    pub fn set_drop_whitelist(
        &mut self,
        collection_id: CollectionId,
        account_id: AccountId,
        allowance: U64,
    ) {
        assert_one_yocto();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);
        self.internal_set_whitelist(&collection_id, &account_id, allowance.0);
    }

    #[payable]
    pub fn set_drop_whitelist_batch(&mut self, collection_id: CollectionId, entries: Vec<WhitelistEntry>) {
        assert_one_yocto();
        require!(entries.len() <= MAX_WHITELIST_BATCH, errors::ERR_BATCH_TOO_LARGE);
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);
        for entry in entries {
            self.internal_set_whitelist(&collection_id, &entry.account_id, entry.allowance.0);
        }
    }

    /// Claims one membership token from the collection's drop. Every bound
    /// is re-checked at claim time; the claimed count only ever grows.
    #[payable]
    pub fn claim_drop(
        &mut self,
        collection_id: CollectionId,
        token_uri: Option<String>,
        properties_json: Option<String>,
    ) -> TokenId {
        let initial_storage_usage = env::storage_usage();
        let claimer_id = env::predecessor_account_id();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        let config = self.get_drop_config_or_default(&collection_id);

        if let Err(message) =
            self.drop_admission(&collection_id, &config, &collection, &claimer_id, now_seconds())
        {
            env::panic_str(message);
        }

        let token_id = self.mint_to(
            &collection_id,
            &claimer_id,
            token_uri.unwrap_or_default(),
            properties_json.unwrap_or_default(),
            TokenClass::Membership,
        );

        let claim_key = wallet_key(&collection_id, &claimer_id);
        let claimed = self.drop_claims.get(&claim_key).unwrap_or(0) + 1;
        self.drop_claims.insert(&claim_key, &claimed);

        refund_deposit_to_account(env::storage_usage() - initial_storage_usage, claimer_id.clone());

        event::drop_claimed(&collection_id, &claimer_id, &token_id, claimed);
        token_id
    }

    pub fn get_drop_config(&self, collection_id: CollectionId) -> DropConfigJson {
        let collection_id = self.enforce_collection_scope(&collection_id);
        self.get_collection_or_panic(&collection_id);
        self.get_drop_config_or_default(&collection_id).to_json(&collection_id)
    }

    pub fn get_drop_whitelist_allowance(&self, collection_id: CollectionId, account_id: AccountId) -> U64 {
        let collection_id = self.enforce_collection_scope(&collection_id);
        U64(self
            .drop_whitelist
            .get(&wallet_key(&collection_id, &account_id))
            .unwrap_or(0))
    }

    pub fn get_drop_claimed(&self, collection_id: CollectionId, account_id: AccountId) -> U64 {
        let collection_id = self.enforce_collection_scope(&collection_id);
        U64(self
            .drop_claims
            .get(&wallet_key(&collection_id, &account_id))
            .unwrap_or(0))
    }

    pub fn get_drop_wallet_stats(
        &self,
        collection_id: CollectionId,
        account_id: AccountId,
    ) -> DropWalletStatsJson {
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        let config = self.get_drop_config_or_default(&collection_id);
        let claimed = self
            .drop_claims
            .get(&wallet_key(&collection_id, &account_id))
            .unwrap_or(0);
        let allowance = config.whitelist_required.then(|| {
            U64(self
                .drop_whitelist
                .get(&wallet_key(&collection_id, &account_id))
                .unwrap_or(0))
        });
        let remaining = self.remaining_drop_claims(&collection_id, &config, &collection, &account_id);
        let claimable_now = self
            .drop_admission(&collection_id, &config, &collection, &account_id, now_seconds())
            .is_ok()
            && remaining != Some(0);
        DropWalletStatsJson {
            claimed: U64(claimed),
            allowance,
            remaining: remaining.map(U64),
            claimable_now,
        }
    }

    pub fn can_claim_drop(&self, collection_id: CollectionId, account_id: AccountId) -> bool {
        self.get_drop_wallet_stats(collection_id, account_id).claimable_now
    }
}

impl Platform {
    pub(crate) fn get_drop_config_or_default(&self, collection_id: &CollectionId) -> DropConfig {
        self.drop_configs.get(collection_id).unwrap_or_default()
    }

    fn internal_set_whitelist(&mut self, collection_id: &CollectionId, account_id: &AccountId, allowance: u64) {
        let key = wallet_key(collection_id, account_id);
        if allowance == 0 {
            self.drop_whitelist.remove(&key);
        } else {
            self.drop_whitelist.insert(&key, &allowance);
        }
        event::drop_whitelist_updated(collection_id, account_id, allowance);
    }

    /// min(supply remaining, per-wallet remaining, whitelist remaining).
    /// `None` is unbounded; a disabled drop has nothing left to claim.
    pub(crate) fn remaining_drop_claims(
        &self,
        collection_id: &CollectionId,
        config: &DropConfig,
        collection: &Collection,
        account_id: &AccountId,
    ) -> Option<u64> {
        if !config.enabled {
            return Some(0);
        }
        let claimed = self
            .drop_claims
            .get(&wallet_key(collection_id, account_id))
            .unwrap_or(0);
        let mut remaining = None;
        if collection.max_supply > 0 {
            remaining = min_bound(remaining, Some(collection.max_supply - collection.minted));
        }
        if config.per_wallet_limit > 0 {
            remaining = min_bound(remaining, Some(config.per_wallet_limit.saturating_sub(claimed)));
        }
        if config.whitelist_required {
            let allowance = self
                .drop_whitelist
                .get(&wallet_key(collection_id, account_id))
                .unwrap_or(0);
            remaining = min_bound(remaining, Some(allowance.saturating_sub(claimed)));
        }
        remaining
    }

    fn drop_admission(
        &self,
        collection_id: &CollectionId,
        config: &DropConfig,
        collection: &Collection,
        account_id: &AccountId,
        now: u64,
    ) -> Result<(), &'static str> {
        if !config.enabled {
            return Err(errors::ERR_DROP_DISABLED);
        }
        if !config.window_open(now) {
            return Err(errors::ERR_DROP_NOT_ACTIVE);
        }
        if collection.paused {
            return Err(errors::ERR_COLLECTION_PAUSED);
        }
        if collection.max_supply > 0 && collection.minted >= collection.max_supply {
            return Err(errors::ERR_SOLD_OUT);
        }
        let claimed = self
            .drop_claims
            .get(&wallet_key(collection_id, account_id))
            .unwrap_or(0);
        if config.per_wallet_limit > 0 && claimed >= config.per_wallet_limit {
            return Err(errors::ERR_WALLET_LIMIT_REACHED);
        }
        if config.whitelist_required {
            let allowance = self
                .drop_whitelist
                .get(&wallet_key(collection_id, account_id))
                .unwrap_or(0);
            if allowance == 0 {
                return Err(errors::ERR_NOT_WHITELISTED);
            }
            if claimed >= allowance {
                return Err(errors::ERR_WHITELIST_EXHAUSTED);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use crate::*;
    use near_sdk::test_utils::accounts;

    fn open_drop(platform: &mut Platform, collection_id: &str, per_wallet: u64, whitelist: bool) {
        set_caller(accounts(1), 1, 50);
        platform.configure_drop(
            collection_id.to_string(),
            true,
            U64(100),
            U64(200),
            U64(per_wallet),
            whitelist,
        );
    }

    #[test]
    fn claim_mints_membership_and_counts() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        open_drop(&mut platform, &collection_id, 0, false);
        set_caller(accounts(2), ONE_NEAR, 150);
        let token_id = platform.claim_drop(collection_id.clone(), None, None);
        assert_eq!(token_id, format!("{}:1", collection_id));
        assert_eq!(platform.get_token_class(token_id), TokenClass::Membership);
        assert_eq!(platform.get_drop_claimed(collection_id.clone(), accounts(2)).0, 1);
        let status = platform.get_membership_status(collection_id, accounts(2));
        assert!(status.is_member);
    }

    #[test]
    #[should_panic(expected = "Drop is not enabled")]
    fn claim_fails_when_disabled() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        set_caller(accounts(2), ONE_NEAR, 150);
        platform.claim_drop(collection_id, None, None);
    }

    #[test]
    #[should_panic(expected = "Drop is not active")]
    fn claim_fails_outside_window() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        open_drop(&mut platform, &collection_id, 0, false);
        set_caller(accounts(2), ONE_NEAR, 99);
        platform.claim_drop(collection_id, None, None);
    }

    #[test]
    fn claim_succeeds_at_window_edges() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        open_drop(&mut platform, &collection_id, 0, false);
        set_caller(accounts(2), ONE_NEAR, 100);
        platform.claim_drop(collection_id.clone(), None, None);
        set_caller(accounts(3), ONE_NEAR, 200);
        platform.claim_drop(collection_id, None, None);
    }

    #[test]
    #[should_panic(expected = "Drop wallet limit reached")]
    fn per_wallet_limit_of_one_blocks_second_claim() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        open_drop(&mut platform, &collection_id, 1, false);
        set_caller(accounts(2), ONE_NEAR, 150);
        platform.claim_drop(collection_id.clone(), None, None);
        set_caller(accounts(2), ONE_NEAR, 151);
        platform.claim_drop(collection_id, None, None);
    }

    #[test]
    #[should_panic(expected = "Drop whitelist entry not found")]
    fn whitelist_required_blocks_unlisted_wallet() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        open_drop(&mut platform, &collection_id, 0, true);
        set_caller(accounts(2), ONE_NEAR, 150);
        platform.claim_drop(collection_id, None, None);
    }

    #[test]
    #[should_panic(expected = "Drop whitelist allowance exhausted")]
    fn whitelist_allowance_exhausts() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        open_drop(&mut platform, &collection_id, 0, true);
        set_caller(accounts(1), 1, 60);
        platform.set_drop_whitelist(collection_id.clone(), accounts(2), U64(1));
        set_caller(accounts(2), ONE_NEAR, 150);
        platform.claim_drop(collection_id.clone(), None, None);
        set_caller(accounts(2), ONE_NEAR, 151);
        platform.claim_drop(collection_id, None, None);
    }

    #[test]
    fn remaining_is_min_of_bounds() {
        let (mut platform, collection_id) = factory_with_collection(5, true);
        open_drop(&mut platform, &collection_id, 3, true);
        set_caller(accounts(1), 1, 60);
        platform.set_drop_whitelist(collection_id.clone(), accounts(2), U64(2));

        set_caller(accounts(2), 0, 150);
        let stats = platform.get_drop_wallet_stats(collection_id.clone(), accounts(2));
        assert_eq!(stats.remaining, Some(U64(2)));
        assert_eq!(stats.allowance, Some(U64(2)));
        assert!(stats.claimable_now);

        set_caller(accounts(2), ONE_NEAR, 151);
        platform.claim_drop(collection_id.clone(), None, None);
        set_caller(accounts(2), ONE_NEAR, 152);
        platform.claim_drop(collection_id.clone(), None, None);

        set_caller(accounts(2), 0, 153);
        let stats = platform.get_drop_wallet_stats(collection_id.clone(), accounts(2));
        assert_eq!(stats.claimed.0, 2);
        assert_eq!(stats.remaining, Some(U64(0)));
        assert!(!stats.claimable_now);
        assert!(!platform.can_claim_drop(collection_id, accounts(2)));
    }

    #[test]
    fn unbounded_drop_reports_no_remaining_cap() {
        let (mut platform, collection_id) = factory_with_collection(0, true);
        open_drop(&mut platform, &collection_id, 0, false);
        set_caller(accounts(2), 0, 150);
        let stats = platform.get_drop_wallet_stats(collection_id, accounts(2));
        assert_eq!(stats.remaining, None);
        assert_eq!(stats.allowance, None);
        assert!(stats.claimable_now);
    }

    #[test]
    fn disabled_drop_has_zero_remaining() {
        let (platform, collection_id) = factory_with_collection(0, true);
        set_caller(accounts(2), 0, 150);
        let stats = platform.get_drop_wallet_stats(collection_id, accounts(2));
        assert_eq!(stats.remaining, Some(U64(0)));
        assert!(!stats.claimable_now);
    }

    #[test]
    fn zero_allowance_makes_wallet_unclaimable() {
        let (mut platform, collection_id) = factory_with_collection(0, true);
        open_drop(&mut platform, &collection_id, 0, true);
        set_caller(accounts(2), 0, 150);
        let stats = platform.get_drop_wallet_stats(collection_id, accounts(2));
        assert_eq!(stats.remaining, Some(U64(0)));
        assert!(!stats.claimable_now);
    }

    #[test]
    fn whitelist_batch_writes_and_deletes() {
        let (mut platform, collection_id) = factory_with_collection(0, true);
        set_caller(accounts(1), 1, 50);
        platform.set_drop_whitelist_batch(
            collection_id.clone(),
            vec![
                WhitelistEntry { account_id: accounts(2), allowance: U64(3) },
                WhitelistEntry { account_id: accounts(3), allowance: U64(0) },
            ],
        );
        assert_eq!(platform.get_drop_whitelist_allowance(collection_id.clone(), accounts(2)).0, 3);
        assert_eq!(platform.get_drop_whitelist_allowance(collection_id, accounts(3)).0, 0);
    }

    #[test]
    #[should_panic(expected = "Whitelist batch exceeds 500 entries")]
    fn whitelist_batch_is_capped() {
        let (mut platform, collection_id) = factory_with_collection(0, true);
        let entries = (0..501)
            .map(|i| WhitelistEntry {
                account_id: format!("wallet{}.near", i).parse().unwrap(),
                allowance: U64(1),
            })
            .collect();
        set_caller(accounts(1), 1, 50);
        platform.set_drop_whitelist_batch(collection_id, entries);
    }

    #[test]
    #[should_panic(expected = "Drop end time must be greater than start time")]
    fn configure_rejects_inverted_window() {
        let (mut platform, collection_id) = factory_with_collection(0, true);
        set_caller(accounts(1), 1, 50);
        platform.configure_drop(collection_id, true, U64(200), U64(100), U64(0), false);
    }

    #[test]
    #[should_panic(expected = "Collection sold out")]
    fn claim_fails_when_supply_exhausted() {
        let (mut platform, collection_id) = factory_with_collection(1, true);
        open_drop(&mut platform, &collection_id, 0, false);
        set_caller(accounts(2), ONE_NEAR, 150);
        platform.claim_drop(collection_id.clone(), None, None);
        set_caller(accounts(3), ONE_NEAR, 151);
        platform.claim_drop(collection_id, None, None);
    }
}
