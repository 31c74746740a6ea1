use crate::common::*;
use crate::{errors, event, Platform, PlatformExt};
use near_contract_standards::non_fungible_token::events::{NftBurn, NftMint, NftTransfer};
use near_sdk::ext_contract;

pub const MAX_URI_LEN: usize = 512;
pub const MAX_PROPERTIES_LEN: usize = 4_096;

pub const GAS_FOR_RECEIVER_CALL: Gas = Gas(25_000_000_000_000);

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(crate = "near_sdk::serde", rename_all = "snake_case")]
pub enum TokenClass {
    Standard,
    Membership,
    CheckInProof,
}

#[derive(BorshDeserialize, BorshSerialize)]
pub struct TokenRecord {
    pub collection_id: CollectionId,
    pub owner_id: AccountId,
    pub uri: String,
    pub properties_json: String,
    pub class: TokenClass,
    pub burned: bool,
    pub minted_at: u64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, Clone, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct TokenJson {
    pub token_id: TokenId,
    pub collection_id: CollectionId,
    pub owner_id: AccountId,
    pub uri: String,
    pub properties_json: String,
    pub class: TokenClass,
    pub burned: bool,
    pub minted_at: U64,
}

impl TokenRecord {
    pub fn to_json(&self, token_id: &TokenId) -> TokenJson {
        TokenJson {
            token_id: token_id.clone(),
            collection_id: self.collection_id.clone(),
            owner_id: self.owner_id.clone(),
            uri: self.uri.clone(),
            properties_json: self.properties_json.clone(),
            class: self.class,
            burned: self.burned,
            minted_at: U64(self.minted_at),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct RoyaltyPayment {
    pub address: AccountId,
    pub amount: U128,
}

#[ext_contract(ext_receiver)]
pub trait PlatformReceiver {
    fn on_platform_transfer(
        &mut self,
        sender_id: AccountId,
        previous_owner_id: AccountId,
        token_id: TokenId,
        msg: String,
    );
}

#[near_bindgen]
impl Platform {
    /// Mints a membership token into the collection. Restricted to the
    /// collection owner and its operators; drop claims and check-in proofs go
    /// through their own engines.
    #[payable]
    pub fn mint(
        &mut self,
        collection_id: CollectionId,
        receiver_id: AccountId,
        token_uri: Option<String>,
        properties_json: Option<String>,
    ) -> TokenId {
        let initial_storage_usage = env::storage_usage();
        let caller = env::predecessor_account_id();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        require!(
            self.can_manage(&collection_id, &collection, &caller),
            errors::ERR_UNAUTHORIZED
        );

        let token_id = self.mint_to(
            &collection_id,
            &receiver_id,
            token_uri.unwrap_or_default(),
            properties_json.unwrap_or_default(),
            TokenClass::Membership,
        );
        refund_deposit_to_account(env::storage_usage() - initial_storage_usage, caller);
        token_id
    }

    /// Moves a live token to `receiver_id`. A transfer to the current owner
    /// is a no-op. When `msg` is set, the receiving contract is notified
    /// after the state change lands.
    #[payable]
    pub fn transfer(
        &mut self,
        receiver_id: AccountId,
        token_id: TokenId,
        memo: Option<String>,
        msg: Option<String>,
    ) {
        assert_one_yocto();
        let sender_id = env::predecessor_account_id();
        self.assert_token_within_scope(&token_id);
        let mut token = self
            .tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND));
        require!(!token.burned, errors::ERR_ALREADY_BURNED);

        let collection = self.get_collection_or_panic(&token.collection_id);
        require!(!collection.paused, errors::ERR_COLLECTION_PAUSED);
        require!(collection.transferable, errors::ERR_NOT_TRANSFERABLE);
        if token.class == TokenClass::Membership {
            let program = self.get_check_in_program_or_default(&token.collection_id);
            require!(!program.membership_soulbound, errors::ERR_SOULBOUND);
        }
        require!(sender_id == token.owner_id, errors::ERR_UNAUTHORIZED);
        if receiver_id == sender_id {
            return;
        }

        let collection_id = token.collection_id.clone();
        self.remove_token_from_owner(&sender_id, &token_id);
        self.add_token_to_owner(&receiver_id, &token_id);
        token.owner_id = receiver_id.clone();
        self.tokens.insert(&token_id, &token);
        if token.class == TokenClass::Membership {
            self.decrease_membership_balance(&collection_id, &sender_id);
            self.increase_membership_balance(&collection_id, &receiver_id);
        }

        event::transfer(Some(&sender_id), Some(&receiver_id), &token_id);
        NftTransfer {
            old_owner_id: &sender_id,
            new_owner_id: &receiver_id,
            token_ids: &[&token_id],
            authorized_id: None,
            memo: memo.as_deref(),
        }
        .emit();

        if let Some(msg) = msg {
            ext_receiver::ext(receiver_id)
                .with_static_gas(GAS_FOR_RECEIVER_CALL)
                .on_platform_transfer(sender_id.clone(), sender_id, token_id, msg);
        }
    }

    /// Permanently retires a token. The record stays readable but drops out
    /// of ownership queries and balances.
    #[payable]
    pub fn burn(&mut self, token_id: TokenId) {
        assert_one_yocto();
        let caller = env::predecessor_account_id();
        self.assert_token_within_scope(&token_id);
        let mut token = self
            .tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND));
        require!(!token.burned, errors::ERR_ALREADY_BURNED);

        let collection = self.get_collection_or_panic(&token.collection_id);
        require!(
            caller == token.owner_id || self.can_manage(&token.collection_id, &collection, &caller),
            errors::ERR_UNAUTHORIZED
        );

        let owner_id = token.owner_id.clone();
        let collection_id = token.collection_id.clone();
        token.burned = true;
        self.tokens.insert(&token_id, &token);
        self.remove_token_from_owner(&owner_id, &token_id);
        self.remove_token_from_collection(&collection_id, &token_id);
        self.total_supply -= 1;
        if token.class == TokenClass::Membership {
            self.decrease_membership_balance(&collection_id, &owner_id);
        }

        event::token_upserted(&token.to_json(&token_id));
        event::transfer(Some(&owner_id), None, &token_id);
        NftBurn {
            owner_id: &owner_id,
            token_ids: &[&token_id],
            authorized_id: None,
            memo: None,
        }
        .emit();
    }
}

impl Platform {
    /// Shared mint path for owner mints, drop claims and check-in proofs.
    /// Allocates the next serial, applies the uri/properties defaults and
    /// maintains every index transactionally.
    pub(crate) fn mint_to(
        &mut self,
        collection_id: &CollectionId,
        receiver_id: &AccountId,
        token_uri: String,
        properties_json: String,
        class: TokenClass,
    ) -> TokenId {
        let mut collection = self.get_collection_or_panic(collection_id);
        require!(!collection.paused, errors::ERR_COLLECTION_PAUSED);
        require!(
            collection.max_supply == 0 || collection.minted < collection.max_supply,
            errors::ERR_SOLD_OUT
        );

        let serial = self.mint_counters.get(collection_id).unwrap_or(0) + 1;
        let uri = if token_uri.is_empty() {
            format!("{}{}", collection.base_uri, serial)
        } else {
            token_uri
        };
        let properties_json = if properties_json.is_empty() || properties_json == "{}" {
            crate::internal::default_properties_json(&collection, serial)
        } else {
            properties_json
        };
        require!(uri.len() <= MAX_URI_LEN, errors::ERR_URI_TOO_LONG);
        require!(
            properties_json.len() <= MAX_PROPERTIES_LEN,
            errors::ERR_PROPERTIES_TOO_LONG
        );

        let token_id = format!("{}{}{}", collection_id, TOKEN_DELIMETER, serial);
        let token = TokenRecord {
            collection_id: collection_id.clone(),
            owner_id: receiver_id.clone(),
            uri,
            properties_json,
            class,
            burned: false,
            minted_at: crate::internal::now_seconds(),
        };
        self.mint_counters.insert(collection_id, &serial);
        self.tokens.insert(&token_id, &token);
        self.add_token_to_owner(receiver_id, &token_id);
        self.add_token_to_collection(collection_id, &token_id);
        collection.minted += 1;
        self.collections.insert(collection_id, &collection);
        self.total_supply += 1;
        if class == TokenClass::Membership {
            self.increase_membership_balance(collection_id, receiver_id);
        }

        event::collection_upserted(&collection.to_json(collection_id));
        event::token_upserted(&token.to_json(&token_id));
        event::transfer(None, Some(receiver_id), &token_id);
        NftMint {
            owner_id: receiver_id,
            token_ids: &[&token_id],
            memo: None,
        }
        .emit();

        token_id
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use crate::*;
    use near_sdk::test_utils::accounts;

    fn mint_default(platform: &mut Platform, collection_id: &str, receiver: AccountId) -> TokenId {
        set_caller(accounts(1), ONE_NEAR, 100);
        platform.mint(collection_id.to_string(), receiver, None, None)
    }

    #[test]
    fn mint_applies_defaults_and_indexes() {
        let (mut platform, collection_id) = factory_with_collection(100, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        assert_eq!(token_id, format!("{}:1", collection_id));

        let token = platform.get_token(token_id.clone()).unwrap();
        assert_eq!(token.owner_id, accounts(2));
        assert_eq!(token.uri, "https://nft.example/gold/1");
        assert_eq!(token.class, TokenClass::Membership);
        assert_eq!(token.minted_at.0, 100);
        let parsed: near_sdk::serde_json::Value =
            near_sdk::serde_json::from_str(&token.properties_json).unwrap();
        assert_eq!(parsed["name"], "Gold Members No.01");

        assert_eq!(platform.balance_of(accounts(2)).0, 1);
        assert_eq!(platform.total_supply().0, 1);
        assert_eq!(platform.owner_of(token_id).unwrap(), accounts(2));
        let collection = platform.get_collection(collection_id).unwrap();
        assert_eq!(collection.minted.0, 1);
    }

    #[test]
    fn mint_respects_supply_cap() {
        let (mut platform, collection_id) = factory_with_collection(2, true);
        mint_default(&mut platform, &collection_id, accounts(2));
        mint_default(&mut platform, &collection_id, accounts(2));
        let collection = platform.get_collection(collection_id).unwrap();
        assert_eq!(collection.minted.0, 2);
        assert_eq!(collection.max_supply.0, 2);
    }

    #[test]
    #[should_panic(expected = "Collection sold out")]
    fn mint_past_cap_fails() {
        let (mut platform, collection_id) = factory_with_collection(2, true);
        mint_default(&mut platform, &collection_id, accounts(2));
        mint_default(&mut platform, &collection_id, accounts(2));
        mint_default(&mut platform, &collection_id, accounts(2));
    }

    #[test]
    #[should_panic(expected = "Unauthorized")]
    fn mint_requires_manager() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        set_caller(accounts(3), ONE_NEAR, 100);
        platform.mint(collection_id, accounts(3), None, None);
    }

    #[test]
    fn operator_can_mint() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        set_caller(accounts(1), 1, 50);
        platform.set_collection_operator(collection_id.clone(), accounts(3), true);
        set_caller(accounts(3), ONE_NEAR, 100);
        let token_id = platform.mint(collection_id, accounts(4), None, None);
        assert_eq!(platform.owner_of(token_id).unwrap(), accounts(4));
    }

    #[test]
    #[should_panic(expected = "Collection paused")]
    fn mint_fails_when_paused() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        set_caller(accounts(1), 1, 50);
        platform.update_collection(
            collection_id.clone(),
            String::new(),
            "https://nft.example/gold/".into(),
            250,
            true,
            true,
        );
        mint_default(&mut platform, &collection_id, accounts(2));
    }

    #[test]
    fn transfer_moves_balances_and_membership() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        let before = platform.get_membership_status(collection_id.clone(), accounts(2));
        assert_eq!(before.balance.0, 1);

        set_caller(accounts(2), 1, 110);
        platform.transfer(accounts(3), token_id.clone(), None, None);

        assert_eq!(platform.balance_of(accounts(2)).0, 0);
        assert_eq!(platform.balance_of(accounts(3)).0, 1);
        assert_eq!(platform.owner_of(token_id).unwrap(), accounts(3));
        let from = platform.get_membership_status(collection_id.clone(), accounts(2));
        let to = platform.get_membership_status(collection_id, accounts(3));
        assert_eq!(from.balance.0, 0);
        assert_eq!(to.balance.0, 1);
    }

    #[test]
    fn transfer_to_self_is_noop() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(2), 1, 110);
        platform.transfer(accounts(2), token_id.clone(), None, None);
        assert_eq!(platform.balance_of(accounts(2)).0, 1);
        assert_eq!(platform.owner_of(token_id).unwrap(), accounts(2));
    }

    #[test]
    #[should_panic(expected = "Unauthorized")]
    fn transfer_requires_token_owner() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(3), 1, 110);
        platform.transfer(accounts(3), token_id, None, None);
    }

    #[test]
    #[should_panic(expected = "Collection is not transferable")]
    fn transfer_fails_for_frozen_collection() {
        let (mut platform, collection_id) = factory_with_collection(10, false);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(2), 1, 110);
        platform.transfer(accounts(3), token_id, None, None);
    }

    #[test]
    #[should_panic(expected = "Membership token is soulbound")]
    fn transfer_fails_for_soulbound_membership() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(1), 1, 105);
        platform.configure_check_in_program(
            collection_id,
            false,
            true,
            true,
            U64(0),
            U64(0),
            U64(0),
            U64(0),
            true,
        );
        set_caller(accounts(2), 1, 110);
        platform.transfer(accounts(3), token_id, None, None);
    }

    #[test]
    fn burn_retires_token_but_keeps_record() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(2), 1, 120);
        platform.burn(token_id.clone());

        assert_eq!(platform.balance_of(accounts(2)).0, 0);
        assert_eq!(platform.total_supply().0, 0);
        assert_eq!(platform.owner_of(token_id.clone()), None);
        let token = platform.get_token(token_id.clone()).unwrap();
        assert!(token.burned);
        assert_eq!(token.uri, "https://nft.example/gold/1");
        let status = platform.get_membership_status(collection_id, accounts(2));
        assert_eq!(status.balance.0, 0);
        assert!(!status.is_member);
        // supply cap still counts the burned mint
        assert_eq!(platform.get_token_uri(token_id), "https://nft.example/gold/1");
    }

    #[test]
    #[should_panic(expected = "Token already burned")]
    fn burn_twice_fails() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(2), 1, 120);
        platform.burn(token_id.clone());
        set_caller(accounts(2), 1, 121);
        platform.burn(token_id);
    }

    #[test]
    #[should_panic(expected = "Token already burned")]
    fn transfer_after_burn_fails() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(2), 1, 120);
        platform.burn(token_id.clone());
        set_caller(accounts(2), 1, 121);
        platform.transfer(accounts(3), token_id, None, None);
    }

    #[test]
    fn manager_can_burn() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        let token_id = mint_default(&mut platform, &collection_id, accounts(2));
        set_caller(accounts(1), 1, 120);
        platform.burn(token_id.clone());
        assert_eq!(platform.owner_of(token_id), None);
    }

    #[test]
    fn explicit_uri_and_properties_win_over_defaults() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        set_caller(accounts(1), ONE_NEAR, 100);
        let token_id = platform.mint(
            collection_id,
            accounts(2),
            Some("ipfs://custom".into()),
            Some("{\"tier\":\"gold\"}".into()),
        );
        let token = platform.get_token(token_id).unwrap();
        assert_eq!(token.uri, "ipfs://custom");
        assert_eq!(token.properties_json, "{\"tier\":\"gold\"}");
    }

    #[test]
    #[should_panic(expected = "Token URI too long")]
    fn mint_rejects_oversized_uri() {
        let (mut platform, collection_id) = factory_with_collection(10, true);
        set_caller(accounts(1), ONE_NEAR, 100);
        platform.mint(collection_id, accounts(2), Some("x".repeat(513)), None);
    }

    #[test]
    #[should_panic(expected = "Token out of scope")]
    fn dedicated_rejects_foreign_token() {
        let mut platform = dedicated("7", 0, true);
        set_caller(accounts(2), 1, 110);
        platform.transfer(accounts(3), "8:1".to_string(), None, None);
    }

    #[test]
    fn dedicated_mints_within_bound_collection() {
        let mut platform = dedicated("7", 0, true);
        set_caller(accounts(1), ONE_NEAR, 100);
        let token_id = platform.mint("7".to_string(), accounts(2), None, None);
        assert_eq!(token_id, "7:1");
    }
}
