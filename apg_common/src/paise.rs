use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const INR_CURRENCY_CODE: &str = "INR";

//--------------------------------------      Paise       -----------------------------------------------------------
/// An amount of money in Indian minor currency units (1 rupee = 100 paise).
///
/// All amounts inside the engine are integer paise. Conversion from major units happens exactly once, at the HTTP
/// boundary, via [`Paise::from_rupees`].
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Paise(i64);

impl Add for Paise {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Paise {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Paise {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in paise: {0}")]
pub struct PaiseConversionError(String);

impl From<i64> for Paise {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Paise {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Paise {}

impl TryFrom<u64> for Paise {
    type Error = PaiseConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(PaiseConversionError(format!("Value {} is too large to convert to Paise", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Paise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rupees = self.0 / 100;
        let paise = (self.0 % 100).abs();
        write!(f, "₹{rupees}.{paise:02}")
    }
}

impl Paise {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a major-unit (rupee) amount into paise, rounding to the nearest integer paisa.
    ///
    /// This is the single point where the rupees-in, paise-out convention is enforced. Fails for non-finite or
    /// negative inputs, and for values that would overflow an i64.
    pub fn from_rupees(rupees: f64) -> Result<Self, PaiseConversionError> {
        if !rupees.is_finite() {
            return Err(PaiseConversionError(format!("{rupees} is not a finite amount")));
        }
        if rupees < 0.0 {
            return Err(PaiseConversionError(format!("{rupees} is negative")));
        }
        let paise = (rupees * 100.0).round();
        if paise > i64::MAX as f64 {
            return Err(PaiseConversionError(format!("{rupees} rupees overflows the paise representation")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(paise as i64))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
