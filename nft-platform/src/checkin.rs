use crate::common::*;
use crate::internal::{now_seconds, wallet_key};
use crate::token::TokenClass;
use crate::{errors, event, Platform, PlatformExt};

/// Program parameters for a collection. The stored default keeps proof
/// minting on so enabling a program without reconfiguring still issues
/// receipts.
#[derive(BorshDeserialize, BorshSerialize)]
pub struct CheckInProgram {
    pub enabled: bool,
    pub membership_required: bool,
    pub membership_soulbound: bool,
    pub start_at: u64,
    pub end_at: u64,
    pub interval_seconds: u64,
    pub max_check_ins_per_wallet: u64,
    pub mint_proof_nft: bool,
}

impl Default for CheckInProgram {
    fn default() -> Self {
        Self {
            enabled: false,
            membership_required: false,
            membership_soulbound: false,
            start_at: 0,
            end_at: 0,
            interval_seconds: 0,
            max_check_ins_per_wallet: 0,
            mint_proof_nft: true,
        }
    }
}

#[derive(BorshDeserialize, BorshSerialize, Default)]
pub struct CheckInWalletStats {
    pub check_in_count: u64,
    pub last_check_in_at: u64,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct CheckInProgramJson {
    pub collection_id: CollectionId,
    pub enabled: bool,
    pub membership_required: bool,
    pub membership_soulbound: bool,
    pub start_at: U64,
    pub end_at: U64,
    pub interval_seconds: U64,
    pub max_check_ins_per_wallet: U64,
    pub mint_proof_nft: bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct CheckInWalletStatsJson {
    pub check_in_count: U64,
    pub last_check_in_at: U64,
    /// Check-ins left under the per-wallet cap; absent means uncapped.
    pub remaining: Option<U64>,
    pub can_check_in_now: bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct MembershipStatusJson {
    pub balance: U64,
    pub is_member: bool,
    pub membership_required: bool,
    pub membership_soulbound: bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct CheckInReceipt {
    pub proof_token_id: Option<TokenId>,
    pub check_in_count: U64,
    pub checked_at: U64,
}

impl CheckInProgram {
    fn to_json(&self, collection_id: &CollectionId) -> CheckInProgramJson {
        CheckInProgramJson {
            collection_id: collection_id.clone(),
            enabled: self.enabled,
            membership_required: self.membership_required,
            membership_soulbound: self.membership_soulbound,
            start_at: U64(self.start_at),
            end_at: U64(self.end_at),
            interval_seconds: U64(self.interval_seconds),
            max_check_ins_per_wallet: U64(self.max_check_ins_per_wallet),
            mint_proof_nft: self.mint_proof_nft,
        }
    }

    fn window_open(&self, now: u64) -> bool {
        (self.start_at == 0 || now >= self.start_at) && (self.end_at == 0 || now <= self.end_at)
    }
}

#[near_bindgen]
impl Platform {
    #[payable]
    pub fn configure_check_in_program(
        &mut self,
        collection_id: CollectionId,
        enabled: bool,
        membership_required: bool,
        membership_soulbound: bool,
        start_at: U64,
        end_at: U64,
        interval_seconds: U64,
        max_check_ins_per_wallet: U64,
        mint_proof_nft: bool,
    ) {
        assert_one_yocto();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);
        require!(
            start_at.0 == 0 || end_at.0 == 0 || end_at.0 > start_at.0,
            errors::ERR_CHECKIN_WINDOW_ORDER
        );

        let program = CheckInProgram {
            enabled,
            membership_required,
            membership_soulbound,
            start_at: start_at.0,
            end_at: end_at.0,
            interval_seconds: interval_seconds.0,
            max_check_ins_per_wallet: max_check_ins_per_wallet.0,
            mint_proof_nft,
        };
        self.check_in_programs.insert(&collection_id, &program);
        event::check_in_program_updated(&collection_id, &program);
    }

    /// Records a check-in for the caller and, when the program says so,
    /// mints a proof token. Proof tokens never count toward membership.
    #[payable]
    pub fn check_in(
        &mut self,
        collection_id: CollectionId,
        token_uri: Option<String>,
        properties_json: Option<String>,
    ) -> CheckInReceipt {
        let initial_storage_usage = env::storage_usage();
        let account_id = env::predecessor_account_id();
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        let program = self.get_check_in_program_or_default(&collection_id);
        let now = now_seconds();

        if let Err(message) =
            self.check_in_admission(&collection_id, &program, &collection, &account_id, now)
        {
            env::panic_str(message);
        }

        let stats_key = wallet_key(&collection_id, &account_id);
        let mut stats = self.check_in_stats.get(&stats_key).unwrap_or_default();
        stats.check_in_count += 1;
        stats.last_check_in_at = now;
        self.check_in_stats.insert(&stats_key, &stats);

        let proof_token_id = if program.mint_proof_nft {
            Some(self.mint_to(
                &collection_id,
                &account_id,
                token_uri.unwrap_or_default(),
                properties_json.unwrap_or_default(),
                TokenClass::CheckInProof,
            ))
        } else {
            None
        };

        refund_deposit_to_account(env::storage_usage() - initial_storage_usage, account_id.clone());

        event::checked_in(
            &collection_id,
            &account_id,
            stats.check_in_count,
            now,
            proof_token_id.as_ref(),
        );
        CheckInReceipt {
            proof_token_id,
            check_in_count: U64(stats.check_in_count),
            checked_at: U64(now),
        }
    }

    pub fn get_check_in_program(&self, collection_id: CollectionId) -> CheckInProgramJson {
        let collection_id = self.enforce_collection_scope(&collection_id);
        self.get_collection_or_panic(&collection_id);
        self.get_check_in_program_or_default(&collection_id)
            .to_json(&collection_id)
    }

    pub fn get_check_in_wallet_stats(
        &self,
        collection_id: CollectionId,
        account_id: AccountId,
    ) -> CheckInWalletStatsJson {
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        let program = self.get_check_in_program_or_default(&collection_id);
        let stats = self
            .check_in_stats
            .get(&wallet_key(&collection_id, &account_id))
            .unwrap_or_default();
        let remaining = (program.max_check_ins_per_wallet > 0).then(|| {
            U64(program
                .max_check_ins_per_wallet
                .saturating_sub(stats.check_in_count))
        });
        let can_check_in_now = self
            .check_in_admission(&collection_id, &program, &collection, &account_id, now_seconds())
            .is_ok();
        CheckInWalletStatsJson {
            check_in_count: U64(stats.check_in_count),
            last_check_in_at: U64(stats.last_check_in_at),
            remaining,
            can_check_in_now,
        }
    }

    pub fn can_check_in(&self, collection_id: CollectionId, account_id: AccountId) -> bool {
        self.get_check_in_wallet_stats(collection_id, account_id)
            .can_check_in_now
    }

    pub fn get_membership_status(
        &self,
        collection_id: CollectionId,
        account_id: AccountId,
    ) -> MembershipStatusJson {
        let collection_id = self.enforce_collection_scope(&collection_id);
        self.get_collection_or_panic(&collection_id);
        let program = self.get_check_in_program_or_default(&collection_id);
        let balance = self.internal_membership_balance(&collection_id, &account_id);
        MembershipStatusJson {
            balance: U64(balance),
            is_member: balance > 0,
            membership_required: program.membership_required,
            membership_soulbound: program.membership_soulbound,
        }
    }
}

impl Platform {
    pub(crate) fn get_check_in_program_or_default(&self, collection_id: &CollectionId) -> CheckInProgram {
        self.check_in_programs.get(collection_id).unwrap_or_default()
    }

    fn check_in_admission(
        &self,
        collection_id: &CollectionId,
        program: &CheckInProgram,
        collection: &crate::collection::Collection,
        account_id: &AccountId,
        now: u64,
    ) -> Result<(), &'static str> {
        if !program.enabled {
            return Err(errors::ERR_CHECKIN_DISABLED);
        }
        if !program.window_open(now) {
            return Err(errors::ERR_CHECKIN_NOT_ACTIVE);
        }
        if collection.paused {
            return Err(errors::ERR_COLLECTION_PAUSED);
        }
        if program.membership_required
            && self.internal_membership_balance(collection_id, account_id) == 0
        {
            return Err(errors::ERR_MEMBERSHIP_REQUIRED);
        }
        let stats = self
            .check_in_stats
            .get(&wallet_key(collection_id, account_id))
            .unwrap_or_default();
        if program.max_check_ins_per_wallet > 0
            && stats.check_in_count >= program.max_check_ins_per_wallet
        {
            return Err(errors::ERR_CHECKIN_LIMIT_REACHED);
        }
        if program.interval_seconds > 0 && stats.last_check_in_at > 0 {
            // an interval overflowing the clock can never elapse
            match stats.last_check_in_at.checked_add(program.interval_seconds) {
                Some(next_allowed) if now >= next_allowed => {}
                _ => return Err(errors::ERR_COOLDOWN_NOT_ELAPSED),
            }
        }
        Ok(())
    }
}
