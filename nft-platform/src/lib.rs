pub mod common;
pub mod errors;
pub mod event;

mod checkin;
mod collection;
mod drop;
mod factory;
mod internal;
mod token;
mod views;

use common::*;

use checkin::{CheckInProgram, CheckInWalletStats};
use collection::Collection;
use drop::DropConfig;
use token::TokenRecord;

pub use checkin::{CheckInProgramJson, CheckInReceipt, CheckInWalletStatsJson, MembershipStatusJson};
pub use collection::CollectionJson;
pub use drop::{DropConfigJson, DropWalletStatsJson, WhitelistEntry};
pub use token::{RoyaltyPayment, TokenClass, TokenJson};

pub const PLATFORM_SYMBOL: &str = "MNFTP";

/// A single codebase serves two deployment shapes: the shared factory ledger,
/// where collections are addressed by id, and a dedicated instance pinned to
/// exactly one collection at initialization.
#[derive(BorshDeserialize, BorshSerialize)]
pub enum ContractMode {
    Factory,
    Dedicated { collection_id: CollectionId },
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Platform {
    owner_id: AccountId,
    mode: ContractMode,

    collections: UnorderedMap<CollectionId, Collection>,
    collection_counter: u64,
    mint_counters: LookupMap<CollectionId, u64>,
    // "{collection_id}|{account}" grants
    operators: LookupSet<String>,
    owner_collections: LookupMap<AccountId, CollectionId>,

    tokens: UnorderedMap<TokenId, TokenRecord>,
    balances: LookupMap<AccountId, u64>,
    tokens_per_owner: LookupMap<AccountId, UnorderedSet<TokenId>>,
    tokens_per_collection: LookupMap<CollectionId, UnorderedSet<TokenId>>,
    total_supply: u64,

    drop_configs: LookupMap<CollectionId, DropConfig>,
    drop_whitelist: LookupMap<String, u64>,
    drop_claims: LookupMap<String, u64>,

    check_in_programs: LookupMap<CollectionId, CheckInProgram>,
    check_in_stats: LookupMap<String, CheckInWalletStats>,
    membership_balances: LookupMap<String, u64>,

    collection_contracts: LookupMap<CollectionId, AccountId>,
    collection_template: LazyOption<Vec<u8>>,
}

#[derive(BorshSerialize, BorshStorageKey)]
enum StorageKey {
    Collections,
    MintCounters,
    Operators,
    OwnerCollections,
    Tokens,
    Balances,
    TokensPerOwner,
    TokensPerOwnerInner { account_hash: Vec<u8> },
    TokensPerCollection,
    TokensPerCollectionInner { collection_id: CollectionId },
    DropConfigs,
    DropWhitelist,
    DropClaims,
    CheckInPrograms,
    CheckInStats,
    MembershipBalances,
    CollectionContracts,
    CollectionTemplate,
}

#[near_bindgen]
impl Platform {
    /// Factory-mode initializer: an empty registry serving many collections.
    #[init]
    pub fn new(owner_id: AccountId) -> Self {
        require!(!env::state_exists(), "Already initialized");
        Self::internal_new(owner_id, ContractMode::Factory)
    }

    /// Dedicated-mode initializer. Seeds the single collection this instance
    /// serves; callable once, by the collection owner or by the factory that
    /// deploys the instance.
    #[init]
    pub fn new_dedicated(
        owner_id: AccountId,
        collection: CollectionJson,
        initializer_id: Option<AccountId>,
    ) -> Self {
        require!(!env::state_exists(), "Already initialized");
        let caller = env::predecessor_account_id();
        require!(
            caller == collection.owner_id || Some(&caller) == initializer_id.as_ref(),
            errors::ERR_UNAUTHORIZED
        );
        require!(
            !collection.collection_id.is_empty(),
            errors::ERR_INVALID_COLLECTION_ID
        );
        collection::validate_collection_fields(
            &collection.name,
            &collection.symbol,
            &collection.description,
            &collection.base_uri,
            collection.royalty_bps,
        );
        require!(
            collection.max_supply.0 == 0 || collection.minted.0 <= collection.max_supply.0,
            errors::ERR_SOLD_OUT
        );

        let collection_id = collection.collection_id.clone();
        let mut this = Self::internal_new(
            owner_id,
            ContractMode::Dedicated {
                collection_id: collection_id.clone(),
            },
        );
        let record = Collection {
            owner_id: collection.owner_id,
            name: collection.name,
            symbol: collection.symbol,
            description: collection.description,
            base_uri: collection.base_uri,
            max_supply: collection.max_supply.0,
            minted: collection.minted.0,
            royalty_bps: collection.royalty_bps,
            transferable: collection.transferable,
            paused: collection.paused,
            created_at: collection.created_at.0,
        };
        this.collections.insert(&collection_id, &record);
        this.mint_counters.insert(&collection_id, &record.minted);
        this.total_supply = record.minted;
        event::collection_upserted(&record.to_json(&collection_id));
        this
    }

    pub fn symbol(&self) -> String {
        PLATFORM_SYMBOL.to_string()
    }

    pub fn decimals(&self) -> u8 {
        0
    }

    pub fn total_supply(&self) -> U64 {
        U64(self.total_supply)
    }

    pub fn balance_of(&self, account_id: AccountId) -> U64 {
        U64(self.balances.get(&account_id).unwrap_or(0))
    }

    pub fn get_owner(&self) -> AccountId {
        self.owner_id.clone()
    }

    pub fn is_factory(&self) -> bool {
        matches!(self.mode, ContractMode::Factory)
    }

    /// The bound collection id of a dedicated instance, if any.
    pub fn get_bound_collection(&self) -> Option<CollectionId> {
        match &self.mode {
            ContractMode::Factory => None,
            ContractMode::Dedicated { collection_id } => Some(collection_id.clone()),
        }
    }
}

impl Platform {
    fn internal_new(owner_id: AccountId, mode: ContractMode) -> Self {
        Self {
            owner_id,
            mode,
            collections: UnorderedMap::new(StorageKey::Collections),
            collection_counter: 0,
            mint_counters: LookupMap::new(StorageKey::MintCounters),
            operators: LookupSet::new(StorageKey::Operators),
            owner_collections: LookupMap::new(StorageKey::OwnerCollections),
            tokens: UnorderedMap::new(StorageKey::Tokens),
            balances: LookupMap::new(StorageKey::Balances),
            tokens_per_owner: LookupMap::new(StorageKey::TokensPerOwner),
            tokens_per_collection: LookupMap::new(StorageKey::TokensPerCollection),
            total_supply: 0,
            drop_configs: LookupMap::new(StorageKey::DropConfigs),
            drop_whitelist: LookupMap::new(StorageKey::DropWhitelist),
            drop_claims: LookupMap::new(StorageKey::DropClaims),
            check_in_programs: LookupMap::new(StorageKey::CheckInPrograms),
            check_in_stats: LookupMap::new(StorageKey::CheckInStats),
            membership_balances: LookupMap::new(StorageKey::MembershipBalances),
            collection_contracts: LookupMap::new(StorageKey::CollectionContracts),
            collection_template: LazyOption::new(StorageKey::CollectionTemplate, None),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use near_sdk::test_utils::{accounts, VMContextBuilder};
    use near_sdk::testing_env;

    pub const ONE_NEAR: Balance = 10u128.pow(24);

    pub fn platform_account() -> AccountId {
        accounts(0)
    }

    pub fn context(predecessor: AccountId) -> VMContextBuilder {
        let mut builder = VMContextBuilder::new();
        builder
            .current_account_id(platform_account())
            .signer_account_id(predecessor.clone())
            .predecessor_account_id(predecessor);
        builder
    }

    pub fn set_caller(predecessor: AccountId, deposit: Balance, now_seconds: u64) {
        testing_env!(context(predecessor)
            .attached_deposit(deposit)
            .block_timestamp(now_seconds * 1_000_000_000)
            .build());
    }

    pub fn factory(owner: AccountId) -> Platform {
        set_caller(owner.clone(), 0, 0);
        Platform::new(owner)
    }

    /// A factory with one collection created by `accounts(1)`.
    pub fn factory_with_collection(max_supply: u64, transferable: bool) -> (Platform, CollectionId) {
        let mut platform = factory(platform_account());
        set_caller(accounts(1), ONE_NEAR, 10);
        let collection_id = platform.create_collection(
            "Gold Members".to_string(),
            "GOLD".to_string(),
            "Membership cards".to_string(),
            "https://nft.example/gold/".to_string(),
            U64(max_supply),
            250,
            transferable,
        );
        (platform, collection_id)
    }

    pub fn dedicated(collection_id: &str, max_supply: u64, transferable: bool) -> Platform {
        set_caller(accounts(1), 0, 10);
        Platform::new_dedicated(
            platform_account(),
            CollectionJson {
                collection_id: collection_id.to_string(),
                owner_id: accounts(1),
                name: "Gold Members".to_string(),
                symbol: "GOLD".to_string(),
                description: "Membership cards".to_string(),
                base_uri: "https://nft.example/gold/".to_string(),
                max_supply: U64(max_supply),
                minted: U64(0),
                royalty_bps: 250,
                transferable,
                paused: false,
                created_at: U64(10),
            },
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;
    use near_sdk::test_utils::accounts;

    #[test]
    fn factory_init_defaults() {
        let platform = factory(platform_account());
        assert!(platform.is_factory());
        assert_eq!(platform.get_bound_collection(), None);
        assert_eq!(platform.total_supply().0, 0);
        assert_eq!(platform.symbol(), "MNFTP");
        assert_eq!(platform.decimals(), 0);
    }

    #[test]
    fn dedicated_init_seeds_collection() {
        let platform = dedicated("7", 100, true);
        assert!(!platform.is_factory());
        assert_eq!(platform.get_bound_collection(), Some("7".to_string()));
        let collection = platform.get_collection("7".to_string()).unwrap();
        assert_eq!(collection.owner_id, accounts(1));
        assert_eq!(collection.max_supply.0, 100);
        assert_eq!(collection.minted.0, 0);
    }

    #[test]
    fn dedicated_init_by_factory_initializer() {
        set_caller(accounts(3), 0, 10);
        let platform = Platform::new_dedicated(
            platform_account(),
            CollectionJson {
                collection_id: "9".to_string(),
                owner_id: accounts(1),
                name: "Gold Members".to_string(),
                symbol: "GOLD".to_string(),
                description: String::new(),
                base_uri: "https://nft.example/gold/".to_string(),
                max_supply: U64(0),
                minted: U64(4),
                royalty_bps: 0,
                transferable: true,
                paused: false,
                created_at: U64(10),
            },
            Some(accounts(3)),
        );
        // serials continue after the seeded mint count
        assert_eq!(platform.total_supply().0, 4);
    }

    #[test]
    #[should_panic(expected = "Unauthorized")]
    fn dedicated_init_rejects_stranger() {
        set_caller(accounts(4), 0, 10);
        Platform::new_dedicated(
            platform_account(),
            CollectionJson {
                collection_id: "9".to_string(),
                owner_id: accounts(1),
                name: "Gold Members".to_string(),
                symbol: "GOLD".to_string(),
                description: String::new(),
                base_uri: "https://nft.example/gold/".to_string(),
                max_supply: U64(0),
                minted: U64(0),
                royalty_bps: 0,
                transferable: true,
                paused: false,
                created_at: U64(10),
            },
            Some(accounts(3)),
        );
    }
}
