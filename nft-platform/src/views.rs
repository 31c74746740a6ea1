use crate::common::*;
use crate::token::{RoyaltyPayment, TokenClass};
use crate::{errors, Platform, PlatformExt};
use near_sdk::serde_json::json;

#[near_bindgen]
impl Platform {
    pub fn get_token(&self, token_id: TokenId) -> Option<crate::token::TokenJson> {
        self.assert_token_within_scope(&token_id);
        self.tokens.get(&token_id).map(|token| token.to_json(&token_id))
    }

    /// Live owner lookup; burned tokens have no owner.
    pub fn owner_of(&self, token_id: TokenId) -> Option<AccountId> {
        self.assert_token_within_scope(&token_id);
        self.tokens
            .get(&token_id)
            .filter(|token| !token.burned)
            .map(|token| token.owner_id)
    }

    pub fn get_token_uri(&self, token_id: TokenId) -> String {
        self.assert_token_within_scope(&token_id);
        self.tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND))
            .uri
    }

    pub fn get_token_properties(&self, token_id: TokenId) -> String {
        self.assert_token_within_scope(&token_id);
        self.tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND))
            .properties_json
    }

    pub fn get_token_class(&self, token_id: TokenId) -> TokenClass {
        self.assert_token_within_scope(&token_id);
        self.tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND))
            .class
    }

    pub fn tokens_of(
        &self,
        account_id: AccountId,
        from_index: Option<U128>,
        limit: Option<u64>,
    ) -> Vec<crate::token::TokenJson> {
        let start_index: u128 = from_index.map(From::from).unwrap_or_default();
        let limit = limit.map(|v| v as usize).unwrap_or(usize::MAX);
        let owned = match self.tokens_per_owner.get(&account_id) {
            Some(owned) => owned,
            None => return vec![],
        };
        owned
            .iter()
            .skip(start_index as usize)
            .take(limit)
            .map(|token_id| {
                self.tokens
                    .get(&token_id)
                    .map(|token| token.to_json(&token_id))
                    .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND))
            })
            .collect()
    }

    pub fn collection_tokens(
        &self,
        collection_id: CollectionId,
        from_index: Option<U128>,
        limit: Option<u64>,
    ) -> Vec<crate::token::TokenJson> {
        let collection_id = self.enforce_collection_scope(&collection_id);
        let start_index: u128 = from_index.map(From::from).unwrap_or_default();
        let limit = limit.map(|v| v as usize).unwrap_or(usize::MAX);
        let set = match self.tokens_per_collection.get(&collection_id) {
            Some(set) => set,
            None => return vec![],
        };
        set.iter()
            .skip(start_index as usize)
            .take(limit)
            .map(|token_id| {
                self.tokens
                    .get(&token_id)
                    .map(|token| token.to_json(&token_id))
                    .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND))
            })
            .collect()
    }

    /// Royalty recipients as a JSON string, `[]` when the collection takes
    /// no cut.
    pub fn get_royalties(&self, token_id: TokenId) -> String {
        self.assert_token_within_scope(&token_id);
        let token = self
            .tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND));
        let collection = self.get_collection_or_panic(&token.collection_id);
        if collection.royalty_bps == 0 {
            return "[]".to_string();
        }
        json!([{ "address": collection.owner_id, "value": collection.royalty_bps }]).to_string()
    }

    /// Royalty split for a sale. Integer division truncates; a split that
    /// rounds to nothing is reported as no split at all.
    pub fn royalty_info(&self, token_id: TokenId, sale_price: U128) -> Vec<RoyaltyPayment> {
        self.assert_token_within_scope(&token_id);
        let token = self
            .tokens
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str(errors::ERR_TOKEN_NOT_FOUND));
        let collection = self.get_collection_or_panic(&token.collection_id);
        if collection.royalty_bps == 0 || sale_price.0 == 0 {
            return vec![];
        }
        let amount = sale_price.0 * collection.royalty_bps as u128 / 10_000;
        if amount == 0 {
            return vec![];
        }
        vec![RoyaltyPayment {
            address: collection.owner_id,
            amount: U128(amount),
        }]
    }
}
