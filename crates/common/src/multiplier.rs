use alloy::primitives::U256;

// Multipliers are applied as a fraction with this denominator.
const MULTIPLIER_PRECISION: u64 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum GasMultiplierError {
    #[error("the gas multiplier must be a positive finite number, got {0}")]
    NotPositive(f64),

    #[error("the gas multiplier {0} is below the smallest supported multiplier of 0.000001")]
    TooSmall(f64),
}

/// A factor that gas estimates are scaled by.
///
/// Only positive multipliers that are still non-zero once rounded to six decimal places can be
/// constructed.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct GasMultiplier {
    value: f64,
    numerator: u64,
}

impl GasMultiplier {
    pub const ONE: Self = Self::whole(1);

    /// A multiplier with no fractional part. Panics on zero.
    pub const fn whole(value: u32) -> Self {
        assert!(value != 0, "a gas multiplier must be positive");
        Self {
            value: value as f64,
            numerator: value as u64 * MULTIPLIER_PRECISION,
        }
    }

    pub fn new(value: f64) -> Result<Self, GasMultiplierError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(GasMultiplierError::NotPositive(value));
        }
        // Float to int casts saturate, so huge multipliers cap at u64::MAX.
        let numerator = (value * MULTIPLIER_PRECISION as f64).round() as u64;
        if numerator == 0 {
            return Err(GasMultiplierError::TooSmall(value));
        }
        Ok(Self { value, numerator })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_one(&self) -> bool {
        self.value == 1.0
    }

    /// Returns `floor(value * multiplier)`, keeping six decimal places of the multiplier.
    pub fn apply(&self, value: U256) -> U256 {
        value.saturating_mul(U256::from(self.numerator)) / U256::from(MULTIPLIER_PRECISION)
    }
}

impl Default for GasMultiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for GasMultiplier {
    type Error = GasMultiplierError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
