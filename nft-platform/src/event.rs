use crate::collection::CollectionJson;
use crate::common::*;
use crate::token::TokenJson;
use near_sdk::serde_json::json;

pub const EVENT_STANDARD: &str = "mnftp";
pub const EVENT_VERSION: &str = "1.0.0";

fn log_event<T: Serialize>(event: &str, data: T) {
    let payload = json!({
        "standard": EVENT_STANDARD,
        "version": EVENT_VERSION,
        "event": event,
        "data": [data],
    });
    env::log_str(&format!("EVENT_JSON:{}", payload));
}

pub fn collection_upserted(collection: &CollectionJson) {
    log_event("collection_upserted", collection);
}

pub fn token_upserted(token: &TokenJson) {
    log_event("token_upserted", token);
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct TransferData<'a> {
    old_owner_id: Option<&'a AccountId>,
    new_owner_id: Option<&'a AccountId>,
    amount: U64,
    token_id: &'a TokenId,
}

/// Platform-level transfer record. Mints carry no old owner, burns no new one.
pub fn transfer(old_owner_id: Option<&AccountId>, new_owner_id: Option<&AccountId>, token_id: &TokenId) {
    log_event(
        "transfer",
        TransferData {
            old_owner_id,
            new_owner_id,
            amount: U64(1),
            token_id,
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct CollectionOperatorUpdatedData<'a> {
    collection_id: &'a CollectionId,
    operator_id: &'a AccountId,
    enabled: bool,
}

pub fn collection_operator_updated(collection_id: &CollectionId, operator_id: &AccountId, enabled: bool) {
    log_event(
        "collection_operator_updated",
        CollectionOperatorUpdatedData {
            collection_id,
            operator_id,
            enabled,
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct CollectionContractDeployedData<'a> {
    collection_id: &'a CollectionId,
    contract_id: &'a AccountId,
    owner_id: &'a AccountId,
}

pub fn collection_contract_deployed(
    collection_id: &CollectionId,
    contract_id: &AccountId,
    owner_id: &AccountId,
) {
    log_event(
        "collection_contract_deployed",
        CollectionContractDeployedData {
            collection_id,
            contract_id,
            owner_id,
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct DropConfigUpdatedData<'a> {
    collection_id: &'a CollectionId,
    enabled: bool,
    start_at: U64,
    end_at: U64,
    per_wallet_limit: U64,
    whitelist_required: bool,
}

pub fn drop_config_updated(collection_id: &CollectionId, config: &crate::drop::DropConfig) {
    log_event(
        "drop_config_updated",
        DropConfigUpdatedData {
            collection_id,
            enabled: config.enabled,
            start_at: U64(config.start_at),
            end_at: U64(config.end_at),
            per_wallet_limit: U64(config.per_wallet_limit),
            whitelist_required: config.whitelist_required,
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct DropWhitelistUpdatedData<'a> {
    collection_id: &'a CollectionId,
    account_id: &'a AccountId,
    allowance: U64,
}

pub fn drop_whitelist_updated(collection_id: &CollectionId, account_id: &AccountId, allowance: u64) {
    log_event(
        "drop_whitelist_updated",
        DropWhitelistUpdatedData {
            collection_id,
            account_id,
            allowance: U64(allowance),
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct DropClaimedData<'a> {
    collection_id: &'a CollectionId,
    claimer_id: &'a AccountId,
    token_id: &'a TokenId,
    claimed_count: U64,
}

pub fn drop_claimed(
    collection_id: &CollectionId,
    claimer_id: &AccountId,
    token_id: &TokenId,
    claimed_count: u64,
) {
    log_event(
        "drop_claimed",
        DropClaimedData {
            collection_id,
            claimer_id,
            token_id,
            claimed_count: U64(claimed_count),
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct CheckInProgramUpdatedData<'a> {
    collection_id: &'a CollectionId,
    enabled: bool,
    membership_required: bool,
    membership_soulbound: bool,
    start_at: U64,
    end_at: U64,
    interval_seconds: U64,
    max_check_ins_per_wallet: U64,
    mint_proof_nft: bool,
}

pub fn check_in_program_updated(collection_id: &CollectionId, program: &crate::checkin::CheckInProgram) {
    log_event(
        "check_in_program_updated",
        CheckInProgramUpdatedData {
            collection_id,
            enabled: program.enabled,
            membership_required: program.membership_required,
            membership_soulbound: program.membership_soulbound,
            start_at: U64(program.start_at),
            end_at: U64(program.end_at),
            interval_seconds: U64(program.interval_seconds),
            max_check_ins_per_wallet: U64(program.max_check_ins_per_wallet),
            mint_proof_nft: program.mint_proof_nft,
        },
    );
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct CheckedInData<'a> {
    collection_id: &'a CollectionId,
    account_id: &'a AccountId,
    check_in_count: U64,
    checked_at: U64,
    proof_token_id: Option<&'a TokenId>,
}

pub fn checked_in(
    collection_id: &CollectionId,
    account_id: &AccountId,
    check_in_count: u64,
    checked_at: u64,
    proof_token_id: Option<&TokenId>,
) {
    log_event(
        "checked_in",
        CheckedInData {
            collection_id,
            account_id,
            check_in_count: U64(check_in_count),
            checked_at: U64(checked_at),
            proof_token_id,
        },
    );
}
