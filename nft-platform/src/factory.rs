use crate::common::*;
use crate::{errors, event, Platform, PlatformExt};
use near_sdk::is_promise_success;
use near_sdk::serde_json::json;

pub const GAS_FOR_DEDICATED_INIT: Gas = Gas(50_000_000_000_000);
pub const GAS_FOR_DEPLOY_CALLBACK: Gas = Gas(10_000_000_000_000);

/// Funds the subaccount's code storage and initial balance.
pub const MIN_DEPLOY_DEPOSIT: Balance = 5 * 10u128.pow(24);

#[near_bindgen]
impl Platform {
    /// Stores the wasm used for dedicated per-collection instances.
    #[payable]
    pub fn set_collection_contract_template(&mut self, code: Base64VecU8) {
        assert_one_yocto();
        self.assert_factory_mode();
        self.assert_platform_owner();
        self.collection_template.set(&code.0);
    }

    #[payable]
    pub fn clear_collection_contract_template(&mut self) {
        assert_one_yocto();
        self.assert_factory_mode();
        self.assert_platform_owner();
        self.collection_template.remove();
    }

    pub fn has_collection_contract_template(&self) -> bool {
        self.collection_template.is_some()
    }

    /// Spins up a dedicated instance for the collection on a subaccount of
    /// the factory and seeds it with the current collection snapshot. The
    /// shared-ledger record stays authoritative for factory-side reads.
    #[payable]
    pub fn deploy_collection_contract(&mut self, collection_id: CollectionId) -> Promise {
        self.assert_factory_mode();
        require!(
            env::attached_deposit() >= MIN_DEPLOY_DEPOSIT,
            "Attach at least 5 NEAR to fund the collection contract"
        );
        let collection_id = self.enforce_collection_scope(&collection_id);
        let collection = self.get_collection_or_panic(&collection_id);
        self.assert_collection_owner(&collection);
        require!(
            self.collection_contracts.get(&collection_id).is_none(),
            errors::ERR_CONTRACT_ALREADY_DEPLOYED
        );
        let code = self
            .collection_template
            .get()
            .unwrap_or_else(|| env::panic_str(errors::ERR_TEMPLATE_NOT_SET));

        let contract_id: AccountId = format!("collection-{}.{}", collection_id, env::current_account_id())
            .parse()
            .unwrap_or_else(|_| env::panic_str(errors::ERR_INVALID_COLLECTION_ID));
        let init_args = json!({
            "owner_id": self.owner_id,
            "collection": collection.to_json(&collection_id),
            "initializer_id": env::current_account_id(),
        })
        .to_string()
        .into_bytes();

        // Reserved up front so a second deploy cannot race the promise; the
        // callback rolls this back if the deployment fails.
        self.collection_contracts.insert(&collection_id, &contract_id);

        Promise::new(contract_id.clone())
            .create_account()
            .transfer(env::attached_deposit())
            .deploy_contract(code)
            .function_call(
                "new_dedicated".to_string(),
                init_args,
                0,
                GAS_FOR_DEDICATED_INIT,
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_DEPLOY_CALLBACK)
                    .on_collection_contract_deployed(
                        collection_id,
                        contract_id,
                        collection.owner_id,
                    ),
            )
    }

    // self callback
    // If the deployment batch succeeded - announce the new contract
    // If it failed - free the slot so the owner can redeploy
    #[private]
    pub fn on_collection_contract_deployed(
        &mut self,
        collection_id: CollectionId,
        contract_id: AccountId,
        owner_id: AccountId,
    ) -> bool {
        self.finalize_collection_contract_deploy(
            collection_id,
            contract_id,
            owner_id,
            is_promise_success(),
        )
    }

    pub fn get_collection_contract(&self, collection_id: CollectionId) -> Option<AccountId> {
        let collection_id = self.enforce_collection_scope(&collection_id);
        self.collection_contracts.get(&collection_id)
    }

    pub fn has_collection_contract(&self, collection_id: CollectionId) -> bool {
        self.get_collection_contract(collection_id).is_some()
    }

    pub fn get_owner_dedicated_collection_contract(&self, owner_id: AccountId) -> Option<AccountId> {
        self.owner_collections
            .get(&owner_id)
            .and_then(|collection_id| self.collection_contracts.get(&collection_id))
    }
}

impl Platform {
    pub(crate) fn finalize_collection_contract_deploy(
        &mut self,
        collection_id: CollectionId,
        contract_id: AccountId,
        owner_id: AccountId,
        deployed: bool,
    ) -> bool {
        if deployed {
            event::collection_contract_deployed(&collection_id, &contract_id, &owner_id);
        } else {
            self.collection_contracts.remove(&collection_id);
        }
        deployed
    }

    fn assert_platform_owner(&self) {
        require!(
            env::predecessor_account_id() == self.owner_id,
            errors::ERR_UNAUTHORIZED
        );
    }
}
