//! Ranks: ordinal degrees of surprise.
//!
//! A rank grades how exceptional a value is. Rank 0 is the most normal
//! outcome, higher finite ranks are increasingly exceptional, and infinity
//! marks impossibility. Two arithmetic operations carry the whole algebra:
//! addition combines ranks along a dependency chain (monadic bind), and
//! minimum merges alternatives. Infinity absorbs addition.
//!
//! Finite ranks live strictly below 2^63. Reserving the upper half of the
//! `u64` range gives the checked adder a clean overflow guard everywhere
//! merge and shift compose rank chains.

use std::fmt;

use crate::error::{Error, Result};

/// An ordinal degree of surprise: a finite non-negative integer or infinity.
///
/// Ordering is total: `0 < 1 < 2 < … < ∞`, and any two infinities are equal.
/// Arithmetic is checked: addition past the finite maximum and subtraction
/// below zero are errors, not wraparound.
///
/// Field order matters for the derived ordering: the infinity flag sorts
/// before the magnitude, and an infinite rank always stores magnitude 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rank {
    infinite: bool,
    value: u64,
}

impl Rank {
    /// The most normal rank.
    pub const ZERO: Rank = Rank {
        infinite: false,
        value: 0,
    };

    /// The impossible rank.
    pub const INFINITY: Rank = Rank {
        infinite: true,
        value: 0,
    };

    /// Largest representable finite rank value: `2^63 - 1`.
    pub const MAX_FINITE: u64 = i64::MAX as u64;

    /// Rank zero (most normal).
    #[must_use]
    pub const fn zero() -> Rank {
        Rank::ZERO
    }

    /// The infinite rank (impossible).
    #[must_use]
    pub const fn infinity() -> Rank {
        Rank::INFINITY
    }

    /// A finite rank with the given magnitude.
    ///
    /// # Errors
    /// Returns [`Error::RankOutOfRange`] when `value` exceeds
    /// [`Rank::MAX_FINITE`].
    pub fn from_value(value: u64) -> Result<Rank> {
        if value > Rank::MAX_FINITE {
            return Err(Error::RankOutOfRange(value));
        }
        Ok(Rank {
            infinite: false,
            value,
        })
    }

    /// Whether this rank is infinite.
    #[must_use]
    pub const fn is_infinity(self) -> bool {
        self.infinite
    }

    /// Whether this rank is finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        !self.infinite
    }

    /// The finite magnitude.
    ///
    /// # Errors
    /// Returns [`Error::NotFinite`] for the infinite rank.
    pub fn value(self) -> Result<u64> {
        if self.infinite {
            return Err(Error::NotFinite);
        }
        Ok(self.value)
    }

    /// The finite magnitude, or `default` for the infinite rank.
    #[must_use]
    pub const fn value_or(self, default: u64) -> u64 {
        if self.infinite {
            default
        } else {
            self.value
        }
    }

    /// Checked rank addition. Infinity absorbs.
    ///
    /// # Errors
    /// Returns [`Error::RankOverflow`] when the finite sum would exceed
    /// [`Rank::MAX_FINITE`].
    pub fn checked_add(self, other: Rank) -> Result<Rank> {
        if self.infinite || other.infinite {
            return Ok(Rank::INFINITY);
        }
        match self.value.checked_add(other.value) {
            Some(sum) if sum <= Rank::MAX_FINITE => Ok(Rank {
                infinite: false,
                value: sum,
            }),
            _ => Err(Error::RankOverflow),
        }
    }

    /// Checked rank subtraction, defined only between finite ranks with
    /// `self >= other`.
    ///
    /// # Errors
    /// Returns [`Error::NotFinite`] when either operand is infinite, and
    /// [`Error::RankUnderflow`] when `self < other`.
    pub fn checked_sub(self, other: Rank) -> Result<Rank> {
        if self.infinite || other.infinite {
            return Err(Error::NotFinite);
        }
        if self.value < other.value {
            return Err(Error::RankUnderflow);
        }
        Ok(Rank {
            infinite: false,
            value: self.value - other.value,
        })
    }

    /// The smaller of two ranks.
    #[must_use]
    pub fn min(self, other: Rank) -> Rank {
        std::cmp::min(self, other)
    }

    /// The larger of two ranks.
    #[must_use]
    pub fn max(self, other: Rank) -> Rank {
        std::cmp::max(self, other)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.infinite {
            write!(f, "∞")
        } else {
            write!(f, "{}", self.value)
        }
    }
}
