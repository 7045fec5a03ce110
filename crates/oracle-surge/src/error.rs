//! Errors surfaced by the registration and configuration surface.
//!
//! Every failure here aborts the call with no partial state change. The swap
//! fee path never returns these: a swap that cannot be priced falls back to
//! the static fee instead.

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("pool is not registered with the fee engine")]
    PoolNotInitialized,
    #[error("token index out of range for the pool's token count")]
    TokenIndexOutOfRange,
    #[error("invalid pair index; 0 marks an unconfigured slot")]
    InvalidPairIndex,
    #[error("invalid size decimals; the feed must report a value in [0, 6]")]
    InvalidDecimals,
    #[error("token index and pair index arrays have different lengths")]
    InvalidArrayLengths,
    #[error("pool must hold between 2 and 8 tokens")]
    InvalidTokenCount,
    #[error("invalid percentage; value out of range [0, 1e18]")]
    PercentageAboveOne,
    #[error("threshold percentage must stay below the cap deviation")]
    ThresholdNotBelowCap,
    #[error("cap deviation percentage must stay above the threshold")]
    CapNotAboveThreshold,
    #[error("sender is not allowed to change the fee configuration")]
    SenderNotAllowed,
}
