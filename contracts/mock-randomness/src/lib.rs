#![no_std]

//! # Mock Randomness Oracle
//!
//! Stand-in for the on-chain randomness source consumed by the NFT lottery.
//! The admin pins the value returned by `latest_randomness`, which makes
//! draws fully deterministic in tests and on local networks.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, Env, U256};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Value,
}

#[contract]
pub struct MockRandomness;

#[contractimpl]
impl MockRandomness {
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
    }

    /// Pin the value every later `latest_randomness` call returns.
    pub fn set_randomness(env: Env, value: U256) {
        let admin: Address = env.storage().instance()
            .get(&DataKey::Admin).expect("Admin not set");
        admin.require_auth();
        env.storage().instance().set(&DataKey::Value, &value);
    }

    /// Returns the big-endian encoding alongside the value itself.
    pub fn latest_randomness(env: Env) -> (Bytes, U256) {
        let value: U256 = env.storage().instance()
            .get(&DataKey::Value)
            .unwrap_or_else(|| U256::from_u32(&env, 0));
        (value.to_be_bytes(), value)
    }
}
