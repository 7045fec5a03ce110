//! Caller authorization for the configuration surface.
//!
//! The engine never owns role bookkeeping. It asks an injected authorizer
//! before every mutation and maps a denial to
//! [`Error::SenderNotAllowed`](crate::error::Error::SenderNotAllowed) ahead
//! of touching any state.

use ethereum_types::H160;

/// Mutating entry points guarded by the authorizer, one per external call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Permission {
    SetTokenPriceConfig,
    SetTokenPriceConfigBatch,
    SetMaxFeePercentage,
    SetThresholdPercentage,
    SetCapDeviationPercentage,
}

/// Outcome of an authorization check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

/// Decides whether a caller may invoke a guarded entry point.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait Authorizing: Send + Sync {
    fn authorize(&self, caller: H160, permission: Permission) -> AuthDecision;
}
