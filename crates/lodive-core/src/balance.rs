//! Public credit balances
//!
//! The `credits.aleo/account` mapping stores balances as `u64` microcredits
//! (`"123456789u64"`). One credit is 1,000,000 microcredits.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::literal::parse_u64;

/// Microcredits per whole credit
pub const MICROCREDITS_PER_CREDIT: u64 = 1_000_000;

/// A balance in microcredits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Balance {
    microcredits: u64,
}

impl Balance {
    pub const ZERO: Balance = Balance { microcredits: 0 };

    pub const fn from_microcredits(microcredits: u64) -> Self {
        Self { microcredits }
    }

    /// Parse a `u64` literal as returned by the RPC (`"123456789u64"`)
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim().trim_matches('"');
        parse_u64(trimmed)
            .map(Self::from_microcredits)
            .map_err(|_| CoreError::InvalidBalance(raw.to_string()))
    }

    pub fn microcredits(&self) -> u64 {
        self.microcredits
    }

    /// Whole credits (integer part)
    pub fn whole(&self) -> u64 {
        self.microcredits / MICROCREDITS_PER_CREDIT
    }

    /// Fractional part in microcredits
    pub fn fraction(&self) -> u64 {
        self.microcredits % MICROCREDITS_PER_CREDIT
    }

    /// Balance in credits as a float, for display arithmetic only
    pub fn as_credits(&self) -> f64 {
        self.microcredits as f64 / MICROCREDITS_PER_CREDIT as f64
    }
}

/// Insert `,` between every group of three digits
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Display for Balance {
    /// `1234567890u64` renders as `1,234.56789`; whole amounts drop the point
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = group_thousands(self.whole());
        let fraction = self.fraction();
        if fraction == 0 {
            return f.write_str(&whole);
        }
        let decimals = format!("{:06}", fraction);
        write!(f, "{}.{}", whole, decimals.trim_end_matches('0'))
    }
}

impl FromStr for Balance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
