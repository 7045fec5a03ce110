//! Module emulating the unsigned fixed point operations with exactly 18
//! decimals as used by the pool contracts, with their exact rounding
//! behavior.

use {
    super::{CheckedU256, Error},
    anyhow::{Context, Result, ensure},
    ethereum_types::U256,
    std::{
        fmt::{self, Debug, Display, Formatter},
        str::FromStr,
        sync::LazyLock,
    },
};

static ONE_18: LazyLock<U256> = LazyLock::new(|| U256::exp10(18));

/// Fixed point number with 18 decimals, the "wei" representation the pool
/// contracts compute in.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Bfp(U256);

impl Bfp {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn one() -> Self {
        Self(*ONE_18)
    }

    pub fn from_wei(amount: U256) -> Self {
        Self(amount)
    }

    /// `10 ** exponent` as a fixed point number.
    pub fn exp10(exponent: u8) -> Self {
        Self(U256::exp10(usize::from(exponent) + 18))
    }

    pub fn as_uint256(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Result<Self, Error> {
        Ok(Self(self.0.badd(other.0)?))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Self) -> Result<Self, Error> {
        Ok(Self(self.0.bsub(other.0)?))
    }

    pub fn mul_down(self, other: Self) -> Result<Self, Error> {
        Ok(Self(self.0.bmul(other.0)?.bdiv_down(*ONE_18)?))
    }

    pub fn mul_up(self, other: Self) -> Result<Self, Error> {
        let product = self.0.bmul(other.0)?;
        if product.is_zero() {
            return Ok(Self::zero());
        }
        Ok(Self(
            product
                .bsub(1.into())?
                .bdiv_down(*ONE_18)?
                .badd(1.into())?,
        ))
    }

    pub fn div_down(self, other: Self) -> Result<Self, Error> {
        if self.0.is_zero() {
            return Ok(Self::zero());
        }
        if other.0.is_zero() {
            return Err(Error::ZeroDivision);
        }
        Ok(Self(self.0.bmul(*ONE_18)?.bdiv_down(other.0)?))
    }

    pub fn div_up(self, other: Self) -> Result<Self, Error> {
        if other.0.is_zero() {
            return Err(Error::ZeroDivision);
        }
        if self.0.is_zero() {
            return Ok(Self::zero());
        }
        Ok(Self(
            self.0
                .bmul(*ONE_18)?
                .bsub(1.into())?
                .bdiv_down(other.0)?
                .badd(1.into())?,
        ))
    }
}

impl FromStr for Bfp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut split_dot = s.splitn(2, '.');
        let units = split_dot
            .next()
            .expect("splitting a string slice yields at least one element");
        let decimals = split_dot.next().unwrap_or("0");
        ensure!(!units.is_empty(), "invalid decimal representation");
        ensure!(
            decimals.len() <= 18,
            "fixed point numbers have a precision of 18 decimals"
        );

        let units = U256::from_dec_str(units)?;
        let decimals = U256::from_dec_str(&format!("{decimals:0<18}"))?;
        let wei = units
            .checked_mul(*ONE_18)
            .and_then(|units| units.checked_add(decimals))
            .context("number too large for a fixed point representation")?;
        Ok(Self(wei))
    }
}

impl Display for Bfp {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        // The remainder is below 1e18 and fits a u128, whose formatting
        // honors the zero padding that `U256`'s ignores.
        write!(
            formatter,
            "{}.{:0>18}",
            self.0 / *ONE_18,
            (self.0 % *ONE_18).as_u128()
        )
    }
}

impl Debug for Bfp {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Bfp({self})")
    }
}

// Enable serde deserialization from decimal strings.
impl<'de> serde::Deserialize<'de> for Bfp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed point number literal, parsed from a decimal string.
#[macro_export]
macro_rules! bfp {
    ($x:expr) => {
        $x.parse::<$crate::math::fixed_point::Bfp>().unwrap()
    };
}
