#![no_std]

//! # Mock Reward Collection
//!
//! Minimal enumerable NFT collection. It exposes exactly the surface the
//! lottery needs (supply, per-owner enumeration, transfer) and nothing
//! else: no metadata, no approvals.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, Address, Env, Vec,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    TokenExists     = 1,
    TokenNotFound   = 2,
    NotTokenOwner   = 3,
    IndexOutOfRange = 4,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Supply,
    Owner(u32),
    Tokens(Address),
}

const TOKEN_TTL_LEDGERS: u32 = 3_110_400; // ~180 days

fn owned_tokens(env: &Env, owner: &Address) -> Vec<u32> {
    env.storage().persistent()
        .get(&DataKey::Tokens(owner.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

fn write_owned_tokens(env: &Env, owner: &Address, tokens: &Vec<u32>) {
    let key = DataKey::Tokens(owner.clone());
    env.storage().persistent().set(&key, tokens);
    env.storage().persistent().extend_ttl(&key, TOKEN_TTL_LEDGERS, TOKEN_TTL_LEDGERS);
}

fn write_owner(env: &Env, token_id: u32, owner: &Address) {
    let key = DataKey::Owner(token_id);
    env.storage().persistent().set(&key, owner);
    env.storage().persistent().extend_ttl(&key, TOKEN_TTL_LEDGERS, TOKEN_TTL_LEDGERS);
}

#[contract]
pub struct MockRewardCollection;

#[contractimpl]
impl MockRewardCollection {
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
    }

    pub fn mint(env: Env, to: Address, token_id: u32) {
        let admin: Address = env.storage().instance()
            .get(&DataKey::Admin).expect("Admin not set");
        admin.require_auth();

        if env.storage().persistent().has(&DataKey::Owner(token_id)) {
            panic_with_error!(&env, Error::TokenExists);
        }

        write_owner(&env, token_id, &to);
        let mut tokens = owned_tokens(&env, &to);
        tokens.push_back(token_id);
        write_owned_tokens(&env, &to, &tokens);

        let supply: u32 = env.storage().instance().get(&DataKey::Supply).unwrap_or(0);
        env.storage().instance().set(&DataKey::Supply, &(supply + 1));
    }

    pub fn total_supply(env: Env) -> u32 {
        env.storage().instance().get(&DataKey::Supply).unwrap_or(0)
    }

    pub fn balance(env: Env, owner: Address) -> u32 {
        owned_tokens(&env, &owner).len()
    }

    pub fn owner_of(env: Env, token_id: u32) -> Address {
        env.storage().persistent()
            .get(&DataKey::Owner(token_id))
            .unwrap_or_else(|| panic_with_error!(&env, Error::TokenNotFound))
    }

    /// Tokens are enumerated in the order the owner received them.
    pub fn get_owner_token_id(env: Env, owner: Address, index: u32) -> u32 {
        owned_tokens(&env, &owner)
            .get(index)
            .unwrap_or_else(|| panic_with_error!(&env, Error::IndexOutOfRange))
    }

    pub fn transfer(env: Env, from: Address, to: Address, token_id: u32) {
        from.require_auth();

        let mut from_tokens = owned_tokens(&env, &from);
        let position = from_tokens
            .first_index_of(token_id)
            .unwrap_or_else(|| panic_with_error!(&env, Error::NotTokenOwner));
        from_tokens.remove(position);
        write_owned_tokens(&env, &from, &from_tokens);

        let mut to_tokens = owned_tokens(&env, &to);
        to_tokens.push_back(token_id);
        write_owned_tokens(&env, &to, &to_tokens);

        write_owner(&env, token_id, &to);
    }
}
