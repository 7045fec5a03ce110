//! Per pool state: fee lanes and price feed bindings.

use crate::{error::Error, math::fixed_point::Bfp, oracle::PriceConfig};

/// Minimum number of tokens a registered pool can hold.
pub const MIN_TOKENS: usize = 2;
/// Maximum number of tokens a registered pool can hold.
pub const MAX_TOKENS: usize = 8;

/// Fee lane, selected per swap by the direction of the price deviation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Lane {
    /// The swap moves the pool price towards the external price.
    Arbitrage,
    /// The swap moves the pool price away from the external price.
    Noise,
}

impl Lane {
    fn index(self) -> usize {
        match self {
            Self::Arbitrage => 0,
            Self::Noise => 1,
        }
    }
}

/// Ramp parameters of one fee lane. Updates go through the validated
/// setters, which keep `0 <= threshold < cap_deviation <= 1` and
/// `max_fee <= 1` at all times; a violating update fails and leaves the
/// lane untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LaneParams {
    threshold_percentage: Bfp,
    cap_deviation_percentage: Bfp,
    max_fee_percentage: Bfp,
}

impl LaneParams {
    pub(crate) fn new(defaults: &LaneDefaults) -> Self {
        Self {
            threshold_percentage: defaults.threshold_percentage(),
            cap_deviation_percentage: LaneDefaults::cap_deviation_percentage(),
            max_fee_percentage: defaults.max_fee_percentage(),
        }
    }

    pub fn threshold_percentage(&self) -> Bfp {
        self.threshold_percentage
    }

    pub fn cap_deviation_percentage(&self) -> Bfp {
        self.cap_deviation_percentage
    }

    pub fn max_fee_percentage(&self) -> Bfp {
        self.max_fee_percentage
    }

    pub fn set_max_fee_percentage(&mut self, pct: Bfp) -> Result<(), Error> {
        if pct > Bfp::one() {
            return Err(Error::PercentageAboveOne);
        }
        self.max_fee_percentage = pct;
        Ok(())
    }

    /// The new threshold must stay below the lane's current cap deviation;
    /// raising it past the cap requires raising the cap first.
    pub fn set_threshold_percentage(&mut self, pct: Bfp) -> Result<(), Error> {
        if pct > Bfp::one() {
            return Err(Error::PercentageAboveOne);
        }
        if pct >= self.cap_deviation_percentage {
            return Err(Error::ThresholdNotBelowCap);
        }
        self.threshold_percentage = pct;
        Ok(())
    }

    /// The new cap must stay above the lane's current threshold; shrinking
    /// it below the threshold requires lowering the threshold first.
    pub fn set_cap_deviation_percentage(&mut self, pct: Bfp) -> Result<(), Error> {
        if pct > Bfp::one() {
            return Err(Error::PercentageAboveOne);
        }
        if pct <= self.threshold_percentage {
            return Err(Error::CapNotAboveThreshold);
        }
        self.cap_deviation_percentage = pct;
        Ok(())
    }
}

/// Module wide lane defaults, validated once at construction and shared by
/// every pool and both lanes until overridden per lane. The cap deviation
/// default is not configurable and pins fresh lanes at 1.0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LaneDefaults {
    threshold_percentage: Bfp,
    max_fee_percentage: Bfp,
}

impl LaneDefaults {
    pub fn try_new(threshold_percentage: Bfp, max_fee_percentage: Bfp) -> Result<Self, Error> {
        if threshold_percentage > Bfp::one() || max_fee_percentage > Bfp::one() {
            return Err(Error::PercentageAboveOne);
        }
        if threshold_percentage >= Self::cap_deviation_percentage() {
            return Err(Error::ThresholdNotBelowCap);
        }
        Ok(Self {
            threshold_percentage,
            max_fee_percentage,
        })
    }

    /// Cap deviation every fresh lane starts with.
    pub fn cap_deviation_percentage() -> Bfp {
        Bfp::one()
    }

    pub fn threshold_percentage(&self) -> Bfp {
        self.threshold_percentage
    }

    pub fn max_fee_percentage(&self) -> Bfp {
        self.max_fee_percentage
    }
}

/// State the engine keeps per registered pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRecord {
    num_tokens: usize,
    price_configs: Vec<PriceConfig>,
    lanes: [LaneParams; 2],
}

impl PoolRecord {
    /// Fresh record with every price feed slot unconfigured and both lanes
    /// on the module defaults.
    pub fn new(num_tokens: usize, defaults: &LaneDefaults) -> Result<Self, Error> {
        if !(MIN_TOKENS..=MAX_TOKENS).contains(&num_tokens) {
            return Err(Error::InvalidTokenCount);
        }
        Ok(Self {
            num_tokens,
            price_configs: vec![PriceConfig::default(); num_tokens],
            lanes: [LaneParams::new(defaults); 2],
        })
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    pub fn lane(&self, lane: Lane) -> &LaneParams {
        &self.lanes[lane.index()]
    }

    pub fn lane_mut(&mut self, lane: Lane) -> &mut LaneParams {
        &mut self.lanes[lane.index()]
    }

    /// Stored binding of the pool token; unconfigured slots read back as
    /// the `(0, 0)` sentinel.
    pub fn price_config(&self, token_index: usize) -> Result<PriceConfig, Error> {
        self.price_configs
            .get(token_index)
            .copied()
            .ok_or(Error::TokenIndexOutOfRange)
    }

    /// All stored bindings, aligned with the pool's token indices.
    pub fn price_configs(&self) -> &[PriceConfig] {
        &self.price_configs
    }

    /// Callers must have validated the index against the token count.
    pub(crate) fn set_price_config(&mut self, token_index: usize, config: PriceConfig) {
        self.price_configs[token_index] = config;
    }
}
