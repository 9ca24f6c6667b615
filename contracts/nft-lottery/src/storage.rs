use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::{Error, LotteryConfig};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Randomness,
    Collections,
    Config,
    Campaign,
    TotalDraws,
    Points(Address),
    Claimed(Address),
}

const INSTANCE_TTL_THRESHOLD: u32 = 120_960;   // ~7 days
const INSTANCE_TTL_LEDGERS:   u32 = 518_400;   // ~30 days
const PLAYER_TTL_LEDGERS:     u32 = 3_110_400; // ~180 days

pub fn bump_instance(env: &Env) {
    env.storage().instance().extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_LEDGERS);
}

// ============================================================================
// Instance state
// ============================================================================

pub fn owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Option<Address>) {
    match owner {
        Some(owner) => env.storage().instance().set(&DataKey::Owner, owner),
        None        => env.storage().instance().remove(&DataKey::Owner),
    }
}

pub fn randomness(env: &Env) -> Result<Address, Error> {
    env.storage().instance().get(&DataKey::Randomness).ok_or(Error::InternalError)
}

pub fn set_randomness(env: &Env, randomness: &Address) {
    env.storage().instance().set(&DataKey::Randomness, randomness);
}

pub fn collections(env: &Env) -> Vec<Address> {
    env.storage().instance()
        .get(&DataKey::Collections)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_collections(env: &Env, collections: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Collections, collections);
}

pub fn config(env: &Env) -> Result<LotteryConfig, Error> {
    env.storage().instance().get(&DataKey::Config).ok_or(Error::InternalError)
}

pub fn set_config(env: &Env, config: &LotteryConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn campaign(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Campaign).unwrap_or(false)
}

pub fn set_campaign(env: &Env, open: bool) {
    env.storage().instance().set(&DataKey::Campaign, &open);
}

pub fn total_draws(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::TotalDraws).unwrap_or(0)
}

pub fn set_total_draws(env: &Env, total: u64) {
    env.storage().instance().set(&DataKey::TotalDraws, &total);
}

// ============================================================================
// Per-player state
// ============================================================================

pub fn points(env: &Env, player: &Address) -> u32 {
    env.storage().persistent()
        .get(&DataKey::Points(player.clone()))
        .unwrap_or(0)
}

pub fn set_points(env: &Env, player: &Address, points: u32) {
    let key = DataKey::Points(player.clone());
    env.storage().persistent().set(&key, &points);
    env.storage().persistent().extend_ttl(&key, PLAYER_TTL_LEDGERS, PLAYER_TTL_LEDGERS);
}

pub fn has_claimed(env: &Env, player: &Address) -> bool {
    env.storage().persistent()
        .get(&DataKey::Claimed(player.clone()))
        .unwrap_or(false)
}

pub fn set_claimed(env: &Env, player: &Address) {
    let key = DataKey::Claimed(player.clone());
    env.storage().persistent().set(&key, &true);
    env.storage().persistent().extend_ttl(&key, PLAYER_TTL_LEDGERS, PLAYER_TTL_LEDGERS);
}
