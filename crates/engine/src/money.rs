use std::{fmt, ops::AddAssign};

/// Money amount represented as **integer cents**.
///
/// The expense service sends amounts as JSON numbers in major units. They are
/// converted once with [`MoneyCents::from_major`] and every total after that is
/// an integer sum, so summaries do not drift no matter how many records are
/// added or in which order.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::from_major(12.34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(amount.format("₹"), "₹12.34");
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

    /// Converts an amount in major units, rounding to the nearest cent.
    ///
    /// The amount is scaled by 100 and rounded half away from zero, so
    /// `0.125` becomes 13 cents and `-0.125` becomes -13. The rounding sees the
    /// binary value of the product: a decimal like `2.005` lands on whichever
    /// side of the half its `f64` product falls. Non-finite input maps to zero.
    #[must_use]
    pub fn from_major(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::ZERO;
        }
        Self((amount * 100.0).round() as i64)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Formats the amount prefixed by a currency symbol, e.g. `₹12.50`.
    #[must_use]
    pub fn format(self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{symbol}{}", Self(self.0.saturating_abs()))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}
