#![no_std]

//! # NFT Lottery Contract
//!
//! Players pay a fee and guess a number. The guess is compared against the
//! value published by an external randomness oracle, and the distance
//! between the two selects a prize tier. Each tier is backed by its own
//! reward collection holding a power-of-two inventory (1, 2, 4, 8, ...),
//! so closer guesses pull from rarer collections.
//!
//! Losing draws earn one point. A player holding `claim_threshold` points
//! may claim a single guaranteed reward from the most common tier.
//! Fees accumulate on the contract and only the owner can withdraw them.

use soroban_sdk::{
    contract, contractclient, contracterror, contractevent, contractimpl, contracttype, log,
    panic_with_error, token, Address, Bytes, BytesN, Env, Vec, U256,
};

mod storage;
pub mod tiers;


pub const VERSION: u32 = 1;

/// Points needed for the free claim in the reference deployment.
pub const DEFAULT_CLAIM_THRESHOLD: u32 = 100;

// ============================================================================
// External contract clients
// ============================================================================

#[contractclient(name = "RandomnessClient")]
pub trait RandomnessSource {
    /// Latest published randomness as (big-endian bytes, value).
    fn latest_randomness(env: Env) -> (Bytes, U256);
}

#[contractclient(name = "RewardCollectionClient")]
pub trait RewardCollection {
    fn total_supply(env: Env) -> u32;
    fn balance(env: Env, owner: Address) -> u32;
    fn get_owner_token_id(env: Env, owner: Address, index: u32) -> u32;
    fn transfer(env: Env, from: Address, to: Address, token_id: u32);
}

// ============================================================================
// Errors
// ============================================================================

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    CampaignOver              = 1,
    GuessValueOutOfRange      = 2,
    InsufficientFundsSent     = 3,
    InternalError             = 4,
    TooFewNfts                = 5,
    TooFewPooPoints           = 6,
    OnlyOwnerCanWithdraw      = 7,
    DoesNotSupportTotalSupply = 8,
    NotOwner                  = 9,
    AlreadyClaimed            = 10,
    PrizeTierExhausted        = 11,
    InvalidConfig             = 12,
}

// ============================================================================
// Data Types
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LotteryConfig {
    /// Token the fee is paid in.
    pub fee_token:       Address,
    pub fee:             i128,
    /// Oracle values are reduced modulo this; guesses must be below it.
    pub modulus:         u32,
    /// Distance units covered by each prize tier.
    pub factor:          u32,
    pub claim_threshold: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DrawOutcome {
    pub won:         bool,
    /// 1-based prize tier actually paid out.
    pub tier:        Option<u32>,
    pub nft_id:      Option<u32>,
    pub total_draws: u64,
}

// ============================================================================
// Events
// ============================================================================

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignStatusChanged {
    pub status: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LotteryDrawn {
    #[topic]
    pub player:      Address,
    pub won:         bool,
    pub nft_id:      u32,
    pub total_draws: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LotteryInitialized {
    pub randomness: Address,
    pub fee:        i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintedNft {
    #[topic]
    pub player: Address,
    pub nft_id: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    #[topic]
    pub previous_owner: Address,
    pub new_owner:      Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipRenounced {
    #[topic]
    pub previous_owner: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardWithdrawn {
    #[topic]
    pub by:     Address,
    pub to:     Address,
    pub amount: i128,
}

// ============================================================================
// Internal helpers
// ============================================================================

fn require_owner(env: &Env, caller: &Address, err: Error) -> Result<Address, Error> {
    caller.require_auth();
    match storage::owner(env) {
        Some(owner) if owner == *caller => Ok(owner),
        _ => Err(err),
    }
}

fn validate(env: &Env, collections: &Vec<Address>, config: &LotteryConfig) -> Result<(), Error> {
    if config.fee < 0 || config.modulus == 0 || config.factor == 0 || config.claim_threshold == 0 {
        return Err(Error::InvalidConfig);
    }
    if collections.is_empty() || collections.len() > tiers::MAX_TIERS {
        return Err(Error::InvalidConfig);
    }

    for (collection, tier) in collections.iter().zip(0u32..) {
        let supply = match RewardCollectionClient::new(env, &collection).try_total_supply() {
            Ok(Ok(supply)) => supply,
            _ => return Err(Error::DoesNotSupportTotalSupply),
        };
        let required = tiers::required_supply(tier);
        if supply < required {
            log!(env, "tier {} holds {} items, needs {}", tier + 1, supply, required);
            return Err(Error::TooFewNfts);
        }
    }
    Ok(())
}

/// Oracle value reduced into `[0, modulus)`.
fn current_target(env: &Env, modulus: u32) -> Result<u32, Error> {
    let oracle = storage::randomness(env)?;
    let (_, value) = RandomnessClient::new(env, &oracle).latest_randomness();
    let reduced = value.rem_euclid(&U256::from_u32(env, modulus));
    match reduced.to_u128().and_then(|v| u32::try_from(v).ok()) {
        Some(target) => Ok(target),
        None => {
            log!(env, "randomness does not reduce below modulus {}", modulus);
            Err(Error::InternalError)
        }
    }
}

/// Lottery holdings per tier, in tier order.
fn stock_by_tier(env: &Env, collections: &Vec<Address>) -> Vec<u32> {
    let lottery = env.current_contract_address();
    let mut stock = Vec::new(env);
    for collection in collections.iter() {
        stock.push_back(RewardCollectionClient::new(env, &collection).balance(&lottery));
    }
    stock
}

/// Hands the next token of `tier` (0-based) to `player`.
fn pay_out(env: &Env, collections: &Vec<Address>, tier: u32, player: &Address) -> Result<u32, Error> {
    let address = collections.get(tier).ok_or(Error::InternalError)?;
    let collection = RewardCollectionClient::new(env, &address);
    let lottery = env.current_contract_address();
    let nft_id = collection.get_owner_token_id(&lottery, &0);
    collection.transfer(&lottery, player, &nft_id);
    Ok(nft_id)
}

fn collect_fee(env: &Env, config: &LotteryConfig, player: &Address, payment: i128) {
    if payment > 0 {
        token::TokenClient::new(env, &config.fee_token)
            .transfer(player, &env.current_contract_address(), &payment);
    }
}

// ============================================================================
// Contract
// ============================================================================

#[contract]
pub struct NftLottery;

#[contractimpl]
impl NftLottery {

    /// Collections are ordered rarest first; tier `i` must already hold at
    /// least `2^i` tokens. The campaign starts closed.
    pub fn __constructor(
        env:         Env,
        owner:       Address,
        randomness:  Address,
        collections: Vec<Address>,
        config:      LotteryConfig,
    ) {
        if let Err(err) = validate(&env, &collections, &config) {
            panic_with_error!(&env, err);
        }

        storage::set_owner(&env, &Some(owner));
        storage::set_randomness(&env, &randomness);
        storage::set_collections(&env, &collections);
        storage::set_config(&env, &config);
        storage::set_campaign(&env, false);
        storage::set_total_draws(&env, 0);
        storage::bump_instance(&env);

        LotteryInitialized { randomness, fee: config.fee }.publish(&env);
    }

    // ========================================================================
    // draw — paid guess against the oracle
    // ========================================================================

    pub fn draw(env: Env, player: Address, guess: u32, payment: i128) -> Result<DrawOutcome, Error> {
        player.require_auth();

        let config = storage::config(&env)?;
        if !storage::campaign(&env)   { return Err(Error::CampaignOver);          }
        if payment < config.fee       { return Err(Error::InsufficientFundsSent); }
        if guess >= config.modulus    { return Err(Error::GuessValueOutOfRange);  }

        let target = current_target(&env, config.modulus)?;
        let distance = tiers::target_distance(target, guess);
        let collections = storage::collections(&env);

        // An emptied tier falls through to the next more common one.
        let prize = match tiers::resolve_tier(distance, config.factor, collections.len()) {
            Some(tier) => {
                let stock = stock_by_tier(&env, &collections);
                Some(tiers::first_stocked(&stock, tier).ok_or(Error::PrizeTierExhausted)?)
            }
            None => None,
        };

        collect_fee(&env, &config, &player, payment);

        let total_draws = storage::total_draws(&env)
            .checked_add(1).ok_or(Error::InternalError)?;
        storage::set_total_draws(&env, total_draws);

        let outcome = match prize {
            Some(tier) => {
                let nft_id = pay_out(&env, &collections, tier, &player)?;
                DrawOutcome { won: true, tier: Some(tier + 1), nft_id: Some(nft_id), total_draws }
            }
            None => {
                let points = storage::points(&env, &player)
                    .checked_add(1).ok_or(Error::InternalError)?;
                storage::set_points(&env, &player, points);
                DrawOutcome { won: false, tier: None, nft_id: None, total_draws }
            }
        };

        log!(&env, "draw target={} guess={} distance={} won={}", target, guess, distance, outcome.won);

        LotteryDrawn {
            player,
            won: outcome.won,
            nft_id: outcome.nft_id.unwrap_or(0),
            total_draws,
        }.publish(&env);

        storage::bump_instance(&env);
        Ok(outcome)
    }

    // ========================================================================
    // claim_nft — guaranteed reward for persistent players
    // ========================================================================

    pub fn claim_nft(env: Env, player: Address, payment: i128) -> Result<u32, Error> {
        player.require_auth();

        let config = storage::config(&env)?;
        if !storage::campaign(&env)       { return Err(Error::CampaignOver);          }
        if payment < config.fee           { return Err(Error::InsufficientFundsSent); }
        if storage::has_claimed(&env, &player) { return Err(Error::AlreadyClaimed);   }
        if storage::points(&env, &player) < config.claim_threshold {
            return Err(Error::TooFewPooPoints);
        }

        let collections = storage::collections(&env);
        let stock = stock_by_tier(&env, &collections);
        let tier = tiers::last_stocked(&stock).ok_or(Error::PrizeTierExhausted)?;

        collect_fee(&env, &config, &player, payment);
        let nft_id = pay_out(&env, &collections, tier, &player)?;
        storage::set_claimed(&env, &player);

        log!(&env, "claim tier={} nft_id={}", tier + 1, nft_id);

        MintedNft { player, nft_id }.publish(&env);
        storage::bump_instance(&env);
        Ok(nft_id)
    }

    // ========================================================================
    // Owner
    // ========================================================================

    pub fn set_campaign(env: Env, caller: Address, open: bool) -> Result<(), Error> {
        require_owner(&env, &caller, Error::NotOwner)?;
        storage::set_campaign(&env, open);
        CampaignStatusChanged { status: open }.publish(&env);
        Ok(())
    }

    /// Drains the whole fee balance to `to`.
    pub fn withdraw(env: Env, caller: Address, to: Address) -> Result<i128, Error> {
        let owner = require_owner(&env, &caller, Error::OnlyOwnerCanWithdraw)?;
        let config = storage::config(&env)?;

        let token = token::TokenClient::new(&env, &config.fee_token);
        let lottery = env.current_contract_address();
        let amount = token.balance(&lottery);
        if amount > 0 {
            token.transfer(&lottery, &to, &amount);
        }

        log!(&env, "withdraw amount={}", amount);
        RewardWithdrawn { by: owner, to, amount }.publish(&env);
        Ok(amount)
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        let previous_owner = require_owner(&env, &caller, Error::NotOwner)?;
        storage::set_owner(&env, &Some(new_owner.clone()));
        OwnershipTransferred { previous_owner, new_owner }.publish(&env);
        Ok(())
    }

    /// Leaves the lottery without an owner. Owner-only calls fail afterwards.
    pub fn renounce_ownership(env: Env, caller: Address) -> Result<(), Error> {
        let previous_owner = require_owner(&env, &caller, Error::NotOwner)?;
        storage::set_owner(&env, &None);
        OwnershipRenounced { previous_owner }.publish(&env);
        Ok(())
    }

    pub fn upgrade(env: Env, caller: Address, new_wasm_hash: BytesN<32>) -> Result<(), Error> {
        require_owner(&env, &caller, Error::NotOwner)?;
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn campaign(env: Env) -> bool {
        storage::campaign(&env)
    }

    pub fn is_campaign_open(env: Env) -> bool {
        storage::campaign(&env)
    }

    pub fn fee(env: Env) -> Result<i128, Error> {
        Ok(storage::config(&env)?.fee)
    }

    pub fn config(env: Env) -> Result<LotteryConfig, Error> {
        storage::config(&env)
    }

    pub fn owner(env: Env) -> Option<Address> {
        storage::owner(&env)
    }

    /// Fees currently held by the lottery.
    pub fn owner_balance(env: Env) -> Result<i128, Error> {
        let config = storage::config(&env)?;
        Ok(token::TokenClient::new(&env, &config.fee_token).balance(&env.current_contract_address()))
    }

    pub fn points(env: Env, player: Address) -> u32 {
        storage::points(&env, &player)
    }

    pub fn has_claimed(env: Env, player: Address) -> bool {
        storage::has_claimed(&env, &player)
    }

    pub fn total_draws(env: Env) -> u64 {
        storage::total_draws(&env)
    }

    pub fn version(_env: Env) -> u32 {
        VERSION
    }

    pub fn randomness(env: Env) -> Result<Address, Error> {
        storage::randomness(&env)
    }

    pub fn collections(env: Env) -> Vec<Address> {
        storage::collections(&env)
    }

    /// Remaining stock of a 1-based tier; 0 for tiers that do not exist.
    pub fn tier_stock(env: Env, tier: u32) -> u32 {
        if tier == 0 {
            return 0;
        }
        match storage::collections(&env).get(tier - 1) {
            Some(collection) => RewardCollectionClient::new(&env, &collection)
                .balance(&env.current_contract_address()),
            None => 0,
        }
    }

    pub fn total_collection_items(env: Env) -> u32 {
        let collections = storage::collections(&env);
        tiers::total_stock(&stock_by_tier(&env, &collections))
    }
}
