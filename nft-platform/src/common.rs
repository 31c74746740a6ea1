pub use near_sdk::{
    assert_one_yocto,
    borsh::{self, BorshDeserialize, BorshSerialize},
    collections::{LazyOption, LookupMap, LookupSet, UnorderedMap, UnorderedSet},
    env,
    json_types::{Base64VecU8, U128, U64},
    near_bindgen, require,
    serde::{Deserialize, Serialize},
    AccountId, Balance, BorshStorageKey, Gas, PanicOnDefault, Promise,
};

pub use near_contract_standards::non_fungible_token::{refund_deposit_to_account, TokenId};

pub type CollectionId = String;

/// Separates the collection id from the mint serial inside a token id.
pub const TOKEN_DELIMETER: char = ':';
