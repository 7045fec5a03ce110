//! Deviation fee math: pool pair pricing, relative deviation against the
//! external price, lane selection and the surge fee ramp.
//!
//! Everything rounds down and is bit for bit reproducible; two engines fed
//! the same record and request compute the same fee.

use {
    crate::{
        math::{Error, fixed_point::Bfp},
        pool::{Lane, LaneParams},
    },
    std::cmp,
};

/// Spot price the weighted pool implies for the traded pair:
/// `(balance_out * weight_in) / (balance_in * weight_out)`, rounded down at
/// every step. Balances are scaled to 18 decimals, weights normalized.
pub fn pair_price(
    balance_in: Bfp,
    weight_in: Bfp,
    balance_out: Bfp,
    weight_out: Bfp,
) -> Result<Bfp, Error> {
    balance_out
        .mul_down(weight_in)?
        .div_down(balance_in.mul_down(weight_out)?)
}

/// Relative deviation between the pool implied price and the external
/// price. The divisor is always the smaller of the two, so the measure is
/// asymmetric around parity:
///
/// - pool above external: `(pool - external) / external`
/// - pool below external: `(external - pool) / pool`
pub fn relative_deviation(pool_price: Bfp, external_price: Bfp) -> Result<Bfp, Error> {
    if pool_price > external_price {
        pool_price.sub(external_price)?.div_down(external_price)
    } else {
        external_price.sub(pool_price)?.div_down(pool_price)
    }
}

/// Lane for a swap selling the in token for the out token. Such a swap
/// raises `balance_in` and drains `balance_out`, so it always pushes the
/// pool price down: it corrects the deviation exactly when the pool price
/// sits above the external price.
pub fn select_lane(pool_price: Bfp, external_price: Bfp) -> Lane {
    if pool_price > external_price {
        Lane::Arbitrage
    } else {
        Lane::Noise
    }
}

/// Fee for the measured deviation under the lane's parameters:
///
/// ```text
/// fee = staticFee + (maxFee - staticFee) * min(1, (deviation - threshold) / (cap - threshold))
/// ```
///
/// capped at the lane's maximum. Deviations at or below the threshold, and
/// lanes whose maximum does not exceed the static fee, charge the static
/// fee unchanged.
pub fn surge_fee(deviation: Bfp, lane: &LaneParams, static_fee: Bfp) -> Result<Bfp, Error> {
    if deviation <= lane.threshold_percentage() {
        return Ok(static_fee);
    }
    if lane.max_fee_percentage() <= static_fee {
        return Ok(static_fee);
    }

    let span = lane
        .cap_deviation_percentage()
        .sub(lane.threshold_percentage())?;
    let excess = deviation.sub(lane.threshold_percentage())?;
    // `div_down` scales `excess` by 1e18 before dividing, which overflows
    // for astronomic deviations; at or past the span the ratio is one
    // regardless.
    let ratio = if excess >= span {
        Bfp::one()
    } else {
        excess.div_down(span)?
    };
    let increase = lane.max_fee_percentage().sub(static_fee)?.mul_down(ratio)?;
    Ok(cmp::min(
        lane.max_fee_percentage(),
        static_fee.add(increase)?,
    ))
}
