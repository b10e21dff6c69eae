//! Fixed-point payout multipliers.
//!
//! Multipliers are stored in basis points (1/10000), so 1.3x is 13_000.
//! Winnings are always rounded down to whole credits.

use std::fmt;

/// Basis points in a 1.0x multiplier
pub const BASE_MULTIPLIER: u64 = 10_000;

/// Factor applied to a wager to compute the total return of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u64);

impl Multiplier {
    /// Total loss.
    pub const ZERO: Multiplier = Multiplier(0);
    /// Break-even.
    pub const ONE: Multiplier = Multiplier(BASE_MULTIPLIER);

    pub const fn from_bps(bps: u64) -> Self {
        Multiplier(bps)
    }

    pub const fn from_int(value: u64) -> Self {
        Multiplier(value * BASE_MULTIPLIER)
    }

    /// Create from tenths, e.g. `from_tenths(53)` is 5.3x.
    pub const fn from_tenths(tenths: u64) -> Self {
        Multiplier(tenths * (BASE_MULTIPLIER / 10))
    }

    pub fn bps(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Multiplier)
    }

    pub fn checked_mul_int(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Multiplier)
    }

    /// Credits returned for `wager`, rounded down. `None` on overflow.
    pub fn apply(self, wager: u64) -> Option<u64> {
        let scaled = (wager as u128).checked_mul(self.0 as u128)? / BASE_MULTIPLIER as u128;
        u64::try_from(scaled).ok()
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASE_MULTIPLIER;
        let frac = self.0 % BASE_MULTIPLIER;
        if frac == 0 {
            return write!(f, "{}x", whole);
        }
        let digits = format!("{:04}", frac);
        write!(f, "{}.{}x", whole, digits.trim_end_matches('0'))
    }
}
