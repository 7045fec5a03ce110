//! Deviation based dynamic fee engine for multi token weighted AMM pools.
//!
//! The engine keeps one record per registered pool: a price feed binding per
//! pool token and two independently tuned fee lanes. Whenever the host pool
//! asks for a swap fee the engine compares the pool's spot price for the
//! traded pair against the externally quoted price and, above a configurable
//! deviation threshold, ramps the fee linearly from the static fee towards
//! the lane maximum. Depeg corrections and ordinary noise trades hit
//! opposite sides of the external price, which is what the two lanes
//! distinguish.
//!
//! Everything here is synchronous and allocation light; the host serializes
//! calls and supplies the feed, weight source and authorizer behind the
//! traits in [`oracle`], [`hook`] and [`auth`].

pub mod auth;
pub mod config;
pub mod error;
pub mod hook;
pub mod math;
pub mod oracle;
pub mod pool;
pub mod surge_math;

pub use {
    auth::{AuthDecision, Authorizing, Permission},
    config::HookConfig,
    error::Error,
    hook::{SurgeHook, SwapKind, SwapRequest, WeightFetching},
    math::fixed_point::Bfp,
    oracle::{MAX_SIZE_DECIMALS, PriceConfig, PriceFeedReading},
    pool::{Lane, LaneDefaults, LaneParams, MAX_TOKENS, MIN_TOKENS, PoolRecord},
};
