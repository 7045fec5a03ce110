//! Pool registration, fee configuration and the dynamic fee entry point.

use {
    crate::{
        auth::{AuthDecision, Authorizing, Permission},
        error::Error,
        math::{self, fixed_point::Bfp},
        oracle::{self, PriceConfig, PriceFeedReading},
        pool::{Lane, LaneDefaults, PoolRecord},
        surge_math,
    },
    ethereum_types::H160,
    itertools::izip,
    std::{collections::HashMap, sync::Arc},
};

/// Direction convention of a swap request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapKind {
    /// The sold amount is fixed, the bought amount is computed.
    GivenIn,
    /// The bought amount is fixed, the sold amount is computed.
    GivenOut,
}

/// Swap the host pool asks a fee for. Balances are the pre-swap pool
/// balances scaled to 18 decimals, aligned with the pool's token indices.
#[derive(Clone, Debug)]
pub struct SwapRequest {
    pub kind: SwapKind,
    pub amount_given: Bfp,
    pub balances: Vec<Bfp>,
    pub index_in: usize,
    pub index_out: usize,
}

/// Lookup of the host pool's normalized token weights, aligned with its
/// token indices. `None` when the pool is unknown.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait WeightFetching: Send + Sync {
    fn normalized_weights(&self, pool: H160) -> Option<Vec<Bfp>>;
}

/// Reasons the swap path falls back to the static fee. Resolved internally;
/// callers of [`SurgeHook::on_compute_dynamic_fee`] only ever see a fee.
#[derive(Clone, Copy, Debug)]
enum Fallback {
    PoolNotRegistered,
    SameTokenIndex,
    IndexOutOfRange,
    BalanceCountMismatch,
    WeightsUnavailable,
    PriceUnavailable,
    Math(math::Error),
}

impl From<math::Error> for Fallback {
    fn from(err: math::Error) -> Self {
        Self::Math(err)
    }
}

/// Deviation based dynamic fee engine. Owns one record per registered pool;
/// the host serializes calls, mutating operations take `&mut self` and the
/// swap path only reads.
pub struct SurgeHook {
    pools: HashMap<H160, PoolRecord>,
    defaults: LaneDefaults,
    feed: Arc<dyn PriceFeedReading>,
    weights: Arc<dyn WeightFetching>,
    authorizer: Arc<dyn Authorizing>,
}

impl SurgeHook {
    pub fn new(
        defaults: LaneDefaults,
        feed: Arc<dyn PriceFeedReading>,
        weights: Arc<dyn WeightFetching>,
        authorizer: Arc<dyn Authorizing>,
    ) -> Self {
        Self {
            pools: HashMap::new(),
            defaults,
            feed,
            weights,
            authorizer,
        }
    }

    /// Registers the pool with the engine. Re-registration overwrites the
    /// existing record wholesale: both lanes return to the module defaults
    /// and every price feed slot is cleared.
    pub fn on_register(&mut self, pool: H160, num_tokens: usize) -> Result<(), Error> {
        let record = PoolRecord::new(num_tokens, &self.defaults)?;
        self.pools.insert(pool, record);
        tracing::debug!(pool = ?pool, num_tokens, "registered pool");
        Ok(())
    }

    /// Binds the pool token at `token_index` to a feed pair. The divisor is
    /// derived from the pair's current size decimals and stored with the
    /// binding.
    pub fn set_token_price_config(
        &mut self,
        caller: H160,
        pool: H160,
        token_index: usize,
        pair_id: u32,
    ) -> Result<(), Error> {
        self.ensure_authorized(caller, Permission::SetTokenPriceConfig)?;
        let record = self.pools.get_mut(&pool).ok_or(Error::PoolNotInitialized)?;
        let (config, size_decimals) =
            validated_price_config(&*self.feed, record.num_tokens(), token_index, pair_id)?;
        record.set_price_config(token_index, config);
        tracing::debug!(
            pool = ?pool,
            token_index,
            pair_id,
            size_decimals,
            "set token price config"
        );
        Ok(())
    }

    /// Batch form of [`Self::set_token_price_config`]. Every row is
    /// validated before any is applied; a failing row aborts the whole call
    /// with no state change. Rows commit in array order, so a duplicated
    /// token index keeps its last row. An empty batch is a valid no-op.
    pub fn set_token_price_config_batch(
        &mut self,
        caller: H160,
        pool: H160,
        token_indices: &[usize],
        pair_ids: &[u32],
    ) -> Result<(), Error> {
        self.ensure_authorized(caller, Permission::SetTokenPriceConfigBatch)?;
        if token_indices.len() != pair_ids.len() {
            return Err(Error::InvalidArrayLengths);
        }
        if token_indices.is_empty() {
            return Ok(());
        }

        let record = self.pools.get_mut(&pool).ok_or(Error::PoolNotInitialized)?;
        let num_tokens = record.num_tokens();
        let rows = izip!(token_indices, pair_ids)
            .map(|(&token_index, &pair_id)| {
                let (config, size_decimals) =
                    validated_price_config(&*self.feed, num_tokens, token_index, pair_id)?;
                Ok((token_index, config, size_decimals))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        for (token_index, config, size_decimals) in rows {
            record.set_price_config(token_index, config);
            tracing::debug!(
                pool = ?pool,
                token_index,
                pair_id = config.pair_id,
                size_decimals,
                "set token price config"
            );
        }
        Ok(())
    }

    pub fn token_price_config(&self, pool: H160, token_index: usize) -> Result<PriceConfig, Error> {
        self.record(pool)?.price_config(token_index)
    }

    pub fn all_token_price_configs(&self, pool: H160) -> Result<Vec<PriceConfig>, Error> {
        Ok(self.record(pool)?.price_configs().to_vec())
    }

    pub fn set_max_fee_percentage(
        &mut self,
        caller: H160,
        pool: H160,
        pct: Bfp,
        lane: Lane,
    ) -> Result<(), Error> {
        self.ensure_authorized(caller, Permission::SetMaxFeePercentage)?;
        let record = self.pools.get_mut(&pool).ok_or(Error::PoolNotInitialized)?;
        record.lane_mut(lane).set_max_fee_percentage(pct)?;
        tracing::debug!(?caller, ?pool, value = %pct, ?lane, "set max fee percentage");
        Ok(())
    }

    pub fn set_threshold_percentage(
        &mut self,
        caller: H160,
        pool: H160,
        pct: Bfp,
        lane: Lane,
    ) -> Result<(), Error> {
        self.ensure_authorized(caller, Permission::SetThresholdPercentage)?;
        let record = self.pools.get_mut(&pool).ok_or(Error::PoolNotInitialized)?;
        record.lane_mut(lane).set_threshold_percentage(pct)?;
        tracing::debug!(?caller, ?pool, value = %pct, ?lane, "set threshold percentage");
        Ok(())
    }

    pub fn set_cap_deviation_percentage(
        &mut self,
        caller: H160,
        pool: H160,
        pct: Bfp,
        lane: Lane,
    ) -> Result<(), Error> {
        self.ensure_authorized(caller, Permission::SetCapDeviationPercentage)?;
        let record = self.pools.get_mut(&pool).ok_or(Error::PoolNotInitialized)?;
        record.lane_mut(lane).set_cap_deviation_percentage(pct)?;
        tracing::debug!(?caller, ?pool, value = %pct, ?lane, "set cap deviation percentage");
        Ok(())
    }

    pub fn max_fee_percentage(&self, pool: H160, lane: Lane) -> Result<Bfp, Error> {
        Ok(self.record(pool)?.lane(lane).max_fee_percentage())
    }

    pub fn threshold_percentage(&self, pool: H160, lane: Lane) -> Result<Bfp, Error> {
        Ok(self.record(pool)?.lane(lane).threshold_percentage())
    }

    pub fn cap_deviation_percentage(&self, pool: H160, lane: Lane) -> Result<Bfp, Error> {
        Ok(self.record(pool)?.lane(lane).cap_deviation_percentage())
    }

    pub fn default_threshold_percentage(&self) -> Bfp {
        self.defaults.threshold_percentage()
    }

    pub fn default_max_fee_percentage(&self) -> Bfp {
        self.defaults.max_fee_percentage()
    }

    pub fn default_cap_deviation_percentage(&self) -> Bfp {
        LaneDefaults::cap_deviation_percentage()
    }

    /// Fee for the proposed swap. Never fails: whenever the deviation
    /// cannot be measured the static fee is charged as is.
    pub fn on_compute_dynamic_fee(
        &self,
        pool: H160,
        request: &SwapRequest,
        static_fee: Bfp,
    ) -> Bfp {
        match self.deviation_fee(pool, request, static_fee) {
            Ok(fee) => fee,
            Err(fallback) => {
                tracing::debug!(
                    pool = ?pool,
                    reason = ?fallback,
                    "deviation fee unavailable; charging the static fee"
                );
                static_fee
            }
        }
    }

    fn deviation_fee(
        &self,
        pool: H160,
        request: &SwapRequest,
        static_fee: Bfp,
    ) -> Result<Bfp, Fallback> {
        let record = self.pools.get(&pool).ok_or(Fallback::PoolNotRegistered)?;
        if request.index_in == request.index_out {
            return Err(Fallback::SameTokenIndex);
        }
        if request.index_in >= record.num_tokens() || request.index_out >= record.num_tokens() {
            return Err(Fallback::IndexOutOfRange);
        }
        if request.balances.len() != record.num_tokens() {
            return Err(Fallback::BalanceCountMismatch);
        }
        let weights = self
            .weights
            .normalized_weights(pool)
            .filter(|weights| weights.len() == record.num_tokens())
            .ok_or(Fallback::WeightsUnavailable)?;

        let pool_price = surge_math::pair_price(
            request.balances[request.index_in],
            weights[request.index_in],
            request.balances[request.index_out],
            weights[request.index_out],
        )?;

        let configs = record.price_configs();
        let price_in = configs[request.index_in]
            .resolve(&*self.feed)
            .ok_or(Fallback::PriceUnavailable)?;
        let price_out = configs[request.index_out]
            .resolve(&*self.feed)
            .ok_or(Fallback::PriceUnavailable)?;
        let external_price = price_out.div_down(price_in)?;

        let deviation = surge_math::relative_deviation(pool_price, external_price)?;
        let lane = surge_math::select_lane(pool_price, external_price);
        Ok(surge_math::surge_fee(deviation, record.lane(lane), static_fee)?)
    }

    fn record(&self, pool: H160) -> Result<&PoolRecord, Error> {
        self.pools.get(&pool).ok_or(Error::PoolNotInitialized)
    }

    fn ensure_authorized(&self, caller: H160, permission: Permission) -> Result<(), Error> {
        match self.authorizer.authorize(caller, permission) {
            AuthDecision::Allow => Ok(()),
            AuthDecision::Deny => Err(Error::SenderNotAllowed),
        }
    }
}

fn validated_price_config(
    feed: &dyn PriceFeedReading,
    num_tokens: usize,
    token_index: usize,
    pair_id: u32,
) -> Result<(PriceConfig, u8), Error> {
    if token_index >= num_tokens {
        return Err(Error::TokenIndexOutOfRange);
    }
    if pair_id == 0 {
        return Err(Error::InvalidPairIndex);
    }
    let size_decimals = feed.size_decimals(pair_id).ok_or(Error::InvalidDecimals)?;
    let divisor = oracle::divisor_from_size_decimals(size_decimals)?;
    Ok((PriceConfig { pair_id, divisor }, size_decimals))
}
