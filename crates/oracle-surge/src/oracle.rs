//! External price feed access and raw quote resolution.
//!
//! The feed quotes every pair as a `u32` with an implied scale, announced
//! out of band through the pair's size decimals. Quotes are normalized to
//! 18 decimal fixed point once at read time; the per-token divisor doing
//! that is derived at configuration time and stored, never supplied by
//! callers.

use {
    crate::{error::Error, math::fixed_point::Bfp},
    ethereum_types::U256,
};

/// Largest size decimals value the feed is allowed to report for a pair.
pub const MAX_SIZE_DECIMALS: u8 = 6;

/// Read access to the external spot price feed. Implementations answer two
/// independent queries per pair and are expected to be cheap: the engine
/// reads fresh values on every call and never caches.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait PriceFeedReading: Send + Sync {
    /// Latest raw quote for the pair. A value of 0 means the feed has no
    /// data, not a zero price.
    fn raw_quote(&self, pair_id: u32) -> u32;

    /// Size decimals the pair's quotes carry, or `None` when the feed does
    /// not know the pair.
    fn size_decimals(&self, pair_id: u32) -> Option<u8>;
}

/// Feed binding stored per pool token. The `(0, 0)` default marks a slot
/// that was never configured; every configured slot holds a non-zero pair
/// and a divisor derived from the pair's size decimals.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PriceConfig {
    pub pair_id: u32,
    pub divisor: u32,
}

impl PriceConfig {
    pub fn is_set(&self) -> bool {
        self.pair_id != 0
    }

    /// Current price of the bound pair, or `None` when the slot is
    /// unconfigured or the feed has no data.
    pub fn resolve(&self, feed: &dyn PriceFeedReading) -> Option<Bfp> {
        if !self.is_set() {
            return None;
        }
        resolve_price(feed.raw_quote(self.pair_id), self.divisor)
    }
}

/// Divisor normalizing quotes with the given size decimals, `10 ** (6 -
/// size_decimals)`. Size decimals beyond [`MAX_SIZE_DECIMALS`] have no
/// representable divisor and are rejected.
pub fn divisor_from_size_decimals(size_decimals: u8) -> Result<u32, Error> {
    if size_decimals > MAX_SIZE_DECIMALS {
        return Err(Error::InvalidDecimals);
    }
    Ok(10_u32.pow(u32::from(MAX_SIZE_DECIMALS - size_decimals)))
}

/// Normalizes a raw feed quote to an 18 decimal fixed point price:
/// `raw_quote * 10^12 / divisor`. Returns `None` for the no-data sentinel
/// (a raw quote of 0).
pub fn resolve_price(raw_quote: u32, divisor: u32) -> Option<Bfp> {
    if raw_quote == 0 || divisor == 0 {
        return None;
    }
    // A u32 quote times 1e12 stays far below the 256 bit limit, and power
    // of ten divisors divide the inflated quote exactly.
    let wei = U256::from(raw_quote) * U256::exp10(12) / U256::from(divisor);
    Some(Bfp::from_wei(wei))
}
