use crate::error::VendingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// A monetary value in whole won.
///
/// Signed so that a derived change can express a shortfall while cash is
/// still being inserted. Prices and cash denominations are always positive;
/// use [`Money::positive`] where that must hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn new(won: i64) -> Self {
        Self(won)
    }

    /// Builds a strictly positive amount, as required for prices and cash.
    pub fn positive(won: i64) -> Result<Self, VendingError> {
        if won > 0 {
            Ok(Self(won))
        } else {
            Err(VendingError::ValidationError(format!(
                "Amount must be positive, got {won}"
            )))
        }
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `None` when the sum does not fit in an `i64`.
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(won) => Some(Self(won)),
            None => None,
        }
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Formats as Korean won in the ko-KR convention: `₩1,100`, `-₩400`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if self.0 < 0 {
            write!(f, "-₩{grouped}")
        } else {
            write!(f, "₩{grouped}")
        }
    }
}
