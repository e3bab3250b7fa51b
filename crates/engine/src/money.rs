use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary arithmetic in the engine (installment
/// splitting, percentage shares) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "R$ 12,34");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Splits the amount into `count` near-equal parts that sum exactly to
    /// the original value.
    ///
    /// The base share is `total / count`; the first `total % count` parts
    /// carry one extra cent, so the leading parts absorb the rounding-up and
    /// the trailing parts get the shortfall:
    ///
    /// ```rust
    /// use engine::MoneyCents;
    ///
    /// let parts = MoneyCents::new(100_00).split_even(3).unwrap();
    /// let cents: Vec<i64> = parts.iter().map(|p| p.cents()).collect();
    /// assert_eq!(cents, [33_34, 33_33, 33_33]);
    /// ```
    pub fn split_even(self, count: u32) -> ResultEngine<Vec<MoneyCents>> {
        if count == 0 {
            return Err(EngineError::InvalidAmount(
                "split count must be > 0".to_string(),
            ));
        }
        if self.0 <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount to split must be > 0".to_string(),
            ));
        }

        let count = i64::from(count);
        let base = self.0 / count;
        let extra = self.0 % count;
        Ok((0..count)
            .map(|i| MoneyCents(base + i64::from(i < extra)))
            .collect())
    }

    /// Share of `total` in percent, rounded half away from zero at two
    /// decimal places. Returns 0.0 when `total` is zero.
    #[must_use]
    pub fn percent_of(self, total: MoneyCents) -> f64 {
        if total.is_zero() {
            return 0.0;
        }
        let raw = self.0 as f64 * 100.0 / total.0 as f64;
        (raw * 100.0).round() / 100.0
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let reais = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}R$ {reais},{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_reais() {
        assert_eq!(MoneyCents::new(0).to_string(), "R$ 0,00");
        assert_eq!(MoneyCents::new(1).to_string(), "R$ 0,01");
        assert_eq!(MoneyCents::new(1050).to_string(), "R$ 10,50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-R$ 10,50");
    }

    #[test]
    fn split_even_is_exact_with_leading_extra_cents() {
        let parts = MoneyCents::new(10_000).split_even(3).unwrap();
        let cents: Vec<i64> = parts.iter().map(|p| p.cents()).collect();
        assert_eq!(cents, [3334, 3333, 3333]);
        assert_eq!(cents.iter().sum::<i64>(), 10_000);

        let parts = MoneyCents::new(10_001).split_even(3).unwrap();
        let cents: Vec<i64> = parts.iter().map(|p| p.cents()).collect();
        assert_eq!(cents, [3334, 3334, 3333]);
        assert_eq!(cents.iter().sum::<i64>(), 10_001);
    }

    #[test]
    fn split_even_exact_division_has_equal_parts() {
        let parts = MoneyCents::new(9_000).split_even(3).unwrap();
        assert!(parts.iter().all(|p| p.cents() == 3000));
    }

    #[test]
    fn split_even_rejects_non_positive_input() {
        assert!(MoneyCents::new(0).split_even(2).is_err());
        assert!(MoneyCents::new(-100).split_even(2).is_err());
        assert!(MoneyCents::new(100).split_even(0).is_err());
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        assert_eq!(
            MoneyCents::new(1).percent_of(MoneyCents::new(3)),
            33.33
        );
        assert_eq!(
            MoneyCents::new(1).percent_of(MoneyCents::new(8)),
            12.5
        );
        // 1/6 of the total is 16.666...%, which rounds up.
        assert_eq!(
            MoneyCents::new(1).percent_of(MoneyCents::new(6)),
            16.67
        );
        assert_eq!(MoneyCents::new(5).percent_of(MoneyCents::ZERO), 0.0);
    }
}
