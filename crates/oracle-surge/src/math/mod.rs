//! Checked 256-bit arithmetic underlying the fixed point math.

use ethereum_types::U256;

pub mod fixed_point;

/// Arithmetic errors of the fee math. These stay internal to the engine: the
/// swap path resolves them to the static fee and the configuration surface
/// never produces them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    AddOverflow,
    SubOverflow,
    MulOverflow,
    ZeroDivision,
    DivInternal,
}

/// `U256` operations that report overflow and division by zero instead of
/// panicking.
pub(crate) trait CheckedU256: Sized {
    fn badd(self, other: Self) -> Result<Self, Error>;
    fn bsub(self, other: Self) -> Result<Self, Error>;
    fn bmul(self, other: Self) -> Result<Self, Error>;
    fn bdiv_down(self, other: Self) -> Result<Self, Error>;
}

impl CheckedU256 for U256 {
    fn badd(self, other: Self) -> Result<Self, Error> {
        self.checked_add(other).ok_or(Error::AddOverflow)
    }

    fn bsub(self, other: Self) -> Result<Self, Error> {
        self.checked_sub(other).ok_or(Error::SubOverflow)
    }

    fn bmul(self, other: Self) -> Result<Self, Error> {
        self.checked_mul(other).ok_or(Error::MulOverflow)
    }

    fn bdiv_down(self, other: Self) -> Result<Self, Error> {
        self.checked_div(other).ok_or(Error::DivInternal)
    }
}
