//! Prize-tier arithmetic.
//!
//! Tier indices here are 0-based: tier 0 is the rarest prize and backs a
//! single token, tier `i` backs `2^i` tokens.

use soroban_sdk::Vec;

/// Upper bound on the number of reward collections a lottery accepts.
pub const MAX_TIERS: u32 = 8;

pub fn target_distance(target: u32, guess: u32) -> u32 {
    target.abs_diff(guess)
}

/// Maps a guess distance to a prize tier, or `None` when the guess lost.
pub fn resolve_tier(distance: u32, factor: u32, tier_count: u32) -> Option<u32> {
    if factor == 0 {
        return None;
    }
    let tier = distance / factor;
    (tier < tier_count).then_some(tier)
}

/// Minimum inventory a collection must carry to back `tier`.
pub fn required_supply(tier: u32) -> u32 {
    1u32 << tier
}

/// First tier at or after `from` that still has stock.
pub fn first_stocked(stock: &Vec<u32>, from: u32) -> Option<u32> {
    (from..stock.len()).find(|&tier| stock.get(tier).unwrap_or(0) > 0)
}

/// Last (most common) tier that still has stock.
pub fn last_stocked(stock: &Vec<u32>) -> Option<u32> {
    (0..stock.len()).rev().find(|&tier| stock.get(tier).unwrap_or(0) > 0)
}

/// Items left across all tiers, saturating at `u32::MAX`.
pub fn total_stock(stock: &Vec<u32>) -> u32 {
    stock.iter().fold(0u32, |total, items| total.saturating_add(items))
}
