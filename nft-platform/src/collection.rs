use crate::common::*;
use crate::{errors, event, Platform, PlatformExt};

pub const MAX_NAME_LEN: usize = 80;
pub const MAX_SYMBOL_LEN: usize = 12;
pub const MAX_DESCRIPTION_LEN: usize = 512;
pub const MAX_BASE_URI_LEN: usize = 512;
pub const MAX_ROYALTY_BPS: u16 = 10_000;

#[derive(BorshDeserialize, BorshSerialize)]
pub struct Collection {
    pub owner_id: AccountId,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub base_uri: String,
    pub max_supply: u64,
    pub minted: u64,
    pub royalty_bps: u16,
    pub transferable: bool,
    pub paused: bool,
    pub created_at: u64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, Clone, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct CollectionJson {
    pub collection_id: CollectionId,
    pub owner_id: AccountId,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub base_uri: String,
    pub max_supply: U64,
    pub minted: U64,
    pub royalty_bps: u16,
    pub transferable: bool,
    pub paused: bool,
    pub created_at: U64,
}

impl Collection {
    pub fn to_json(&self, collection_id: &CollectionId) -> CollectionJson {
        CollectionJson {
            collection_id: collection_id.clone(),
            owner_id: self.owner_id.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            description: self.description.clone(),
            base_uri: self.base_uri.clone(),
            max_supply: U64(self.max_supply),
            minted: U64(self.minted),
            royalty_bps: self.royalty_bps,
            transferable: self.transferable,
            paused: self.paused,
            created_at: U64(self.created_at),
        }
    }
}

pub(crate) fn validate_collection_fields(
    name: &str,
    symbol: &str,
    description: &str,
    base_uri: &str,
    royalty_bps: u16,
) {
    require!(
        !name.is_empty() && name.len() <= MAX_NAME_LEN,
        errors::ERR_NAME_OUT_OF_RANGE
    );
    require!(
        !symbol.is_empty() && symbol.len() <= MAX_SYMBOL_LEN,
        errors::ERR_SYMBOL_OUT_OF_RANGE
    );
    validate_mutable_fields(description, base_uri, royalty_bps);
}

pub(crate) fn validate_mutable_fields(description: &str, base_uri: &str, royalty_bps: u16) {
    require!(
        description.len() <= MAX_DESCRIPTION_LEN,
        errors::ERR_DESCRIPTION_TOO_LONG
    );
    require!(
        !base_uri.is_empty() && base_uri.len() <= MAX_BASE_URI_LEN,
        errors::ERR_BASE_URI_OUT_OF_RANGE
    );
    require!(royalty_bps <= MAX_ROYALTY_BPS, errors::ERR_ROYALTY_OUT_OF_RANGE);
}

#[near_bindgen]
impl Platform {
    /// Registers a collection on the shared ledger and binds it to the
    /// caller. One collection per owner account.
    #[payable]
    pub fn create_collection(
        &mut self,
        name: String,
        symbol: String,
        description: String,
        base_uri: String,
        max_supply: U64,
        royalty_bps: u16,
        transferable: bool,
    ) -> CollectionId {
        self.assert_factory_mode();
        let initial_storage_usage = env::storage_usage();
        let owner_id = env::predecessor_account_id();
        validate_collection_fields(&name, &symbol, &description, &base_uri, royalty_bps);
        require!(
            self.owner_collections.get(&owner_id).is_none(),
            errors::ERR_OWNER_ALREADY_BOUND
        );

        self.collection_counter += 1;
        let collection_id = self.collection_counter.to_string();
        let collection = Collection {
            owner_id: owner_id.clone(),
            name,
            symbol,
            description,
            base_uri,
            max_supply: max_supply.0,
            minted: 0,
            royalty_bps,
            transferable,
            paused: false,
            created_at: crate::internal::now_seconds(),
        };
        self.collections.insert(&collection_id, &collection);
        self.mint_counters.insert(&collection_id, &0);
        self.owner_collections.insert(&owner_id, &collection_id);

        refund_deposit_to_account(env::storage_usage() - initial_storage_usage, owner_id);

        event::collection_upserted(&collection.to_json(&collection_id));
        collection_id
    }

    /// Updates the mutable collection fields. Name, symbol and supply cap are
    /// fixed at creation.
    #[payable]
    pub fn update_collection(
        &mut self,
        collection_id: CollectionId,
        description: String,
        base_uri: String,
        royalty_bps: u16,
        transferable: bool,
        paused: bool,
    ) {
        assert_one_yocto();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let mut collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);
        validate_mutable_fields(&description, &base_uri, royalty_bps);

        collection.description = description;
        collection.base_uri = base_uri;
        collection.royalty_bps = royalty_bps;
        collection.transferable = transferable;
        collection.paused = paused;
        self.collections.insert(&collection_id, &collection);

        event::collection_upserted(&collection.to_json(&collection_id));
    }

    #[payable]
    pub fn set_collection_operator(
        &mut self,
        collection_id: CollectionId,
        operator_id: AccountId,
        enabled: bool,
    ) {
        assert_one_yocto();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);

        let key = crate::internal::wallet_key(&collection_id, &operator_id);
        if enabled {
            self.operators.insert(&key);
        } else {
            self.operators.remove(&key);
        }
        event::collection_operator_updated(&collection_id, &operator_id, enabled);
    }

    pub fn get_collection(&self, collection_id: CollectionId) -> Option<CollectionJson> {
        let collection_id = self.enforce_collection_scope(&collection_id);
        self.collections
            .get(&collection_id)
            .map(|collection| collection.to_json(&collection_id))
    }

    pub fn get_collections(&self, from_index: Option<U128>, limit: Option<u64>) -> Vec<CollectionJson> {
        let start_index: u128 = from_index.map(From::from).unwrap_or_default();
        let limit = limit.map(|v| v as usize).unwrap_or(usize::MAX);
        self.collections
            .iter()
            .skip(start_index as usize)
            .take(limit)
            .map(|(collection_id, collection)| collection.to_json(&collection_id))
            .collect()
    }

    pub fn get_collection_count(&self) -> U64 {
        U64(self.collections.len())
    }

    pub fn is_collection_operator(&self, collection_id: CollectionId, account_id: AccountId) -> bool {
        let collection_id = self.enforce_collection_scope(&collection_id);
        self.operators
            .contains(&crate::internal::wallet_key(&collection_id, &account_id))
    }

    pub fn get_owner_dedicated_collection(&self, owner_id: AccountId) -> Option<CollectionId> {
        self.owner_collections.get(&owner_id)
    }

    pub fn has_owner_dedicated_collection(&self, owner_id: AccountId) -> bool {
        self.owner_collections.get(&owner_id).is_some()
    }
}
