//! Signed fixed-point decimal with 18 fractional digits.
//!
//! Every oracle computation (medians, spreads, cross rates, reward shares) runs on
//! `Dec` so that independent validators derive bit-identical results. Products and
//! quotients go through a 256-bit intermediate and are rounded half-to-even.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const PRECISION: u32 = 18;

const ONE_RAW: u128 = 1_000_000_000_000_000_000;

/// A signed decimal stored as `value * 10^18` in an `i128`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(i128);

impl Dec {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW as i128);
    pub const MAX: Self = Self(i128::MAX);
    pub const MIN: Self = Self(i128::MIN);

    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i128 {
        self.0
    }

    pub fn from_int(value: i64) -> Self {
        Self(value as i128 * ONE_RAW as i128)
    }

    /// `value * 10^-prec`, e.g. `with_prec(25, 4)` is `0.0025`.
    ///
    /// # Panics
    /// Panics if `prec` exceeds [`PRECISION`].
    pub fn with_prec(value: i64, prec: u32) -> Self {
        assert!(prec <= PRECISION, "precision must be at most {PRECISION}");
        Self(value as i128 * 10i128.pow(PRECISION - prec))
    }

    /// `numerator / denominator`, rounded half-to-even.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let scaled = wide::mul(numerator, ONE_RAW);
        let magnitude = wide::div_round_half_even(scaled, denominator)?;
        Self::from_parts(false, magnitude)
    }

    fn from_parts(negative: bool, magnitude: u128) -> Option<Self> {
        if magnitude > i128::MAX as u128 {
            return None;
        }
        let value = magnitude as i128;
        Some(Self(if negative { -value } else { value }))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let product = wide::mul(self.0.unsigned_abs(), rhs.0.unsigned_abs());
        let magnitude = wide::div_round_half_even(product, ONE_RAW)?;
        Self::from_parts(self.is_negative() != rhs.is_negative(), magnitude)
    }

    pub fn checked_quo(self, rhs: Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        let scaled = wide::mul(self.0.unsigned_abs(), ONE_RAW);
        let magnitude = wide::div_round_half_even(scaled, rhs.0.unsigned_abs())?;
        Self::from_parts(self.is_negative() != rhs.is_negative(), magnitude)
    }

    pub fn checked_mul_int(self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(rhs as i128).map(Self)
    }

    /// Integer division of the raw value; truncates toward zero.
    pub fn checked_quo_int(self, rhs: i64) -> Option<Self> {
        self.0.checked_div(rhs as i128).map(Self)
    }

    /// Integer part, truncated toward zero.
    pub fn truncate_int(&self) -> i128 {
        self.0 / ONE_RAW as i128
    }

    /// Nearest integer, ties to even.
    pub fn round_int(&self) -> i128 {
        let magnitude = self.0.unsigned_abs();
        let mut quotient = magnitude / ONE_RAW;
        let remainder = magnitude % ONE_RAW;
        let rest = ONE_RAW - remainder;
        if remainder > rest || (remainder == rest && quotient & 1 == 1) {
            quotient += 1;
        }
        let value = quotient as i128;
        if self.is_negative() {
            -value
        } else {
            value
        }
    }

    /// Power-weighted population standard deviation around `center`:
    /// `sqrt(Σ power·(value − center)² / Σ power)`, floored.
    ///
    /// Samples with non-positive power are ignored. Squares are summed in a
    /// 384-bit accumulator, so `None` means the deviation itself does not fit
    /// in a `Dec`.
    pub fn weighted_std_dev<I>(samples: I, center: Dec) -> Option<Self>
    where
        I: IntoIterator<Item = (Dec, i64)>,
    {
        let mut sum = wide::U384::ZERO;
        let mut total: u64 = 0;
        for (value, power) in samples {
            if power <= 0 {
                continue;
            }
            let deviation = value.0.abs_diff(center.0);
            let square = wide::U384::from_u256(wide::mul(deviation, deviation));
            sum = sum.checked_add(square.checked_mul_u64(power as u64)?)?;
            total = total.checked_add(power as u64)?;
        }
        if total == 0 {
            return Some(Self::ZERO);
        }
        // raw(sd) = sqrt(Σ power·raw(dev)² / total); the 10^18 scales cancel.
        let variance = sum.div_u64(total).to_u256()?;
        Self::from_parts(false, wide::isqrt(variance))
    }

    /// Floor of the square root. `None` for negative values.
    pub fn approx_sqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let scaled = wide::mul(self.0 as u128, ONE_RAW);
        Self::from_parts(false, wide::isqrt(scaled))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{}{}.{:018}",
            sign,
            magnitude / ONE_RAW,
            magnitude % ONE_RAW
        )
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}

impl FromStr for Dec {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((_, "")) => return Err(invalid()),
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > PRECISION as usize || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let int_value: u128 = int_part.parse().map_err(|_| invalid())?;
        let frac_value: u128 = if frac_part.is_empty() {
            0
        } else {
            let digits: u128 = frac_part.parse().map_err(|_| invalid())?;
            digits * 10u128.pow(PRECISION - frac_part.len() as u32)
        };
        let magnitude = int_value
            .checked_mul(ONE_RAW)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or_else(invalid)?;
        Self::from_parts(negative, magnitude).ok_or_else(invalid)
    }
}

// Decimals travel as strings so TOML configs and bincode records agree on one form.
impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 256-bit helpers for products that overflow `u128`.
mod wide {
    const MASK64: u128 = u64::MAX as u128;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(super) struct U256 {
        pub hi: u128,
        pub lo: u128,
    }

    pub(super) fn mul(a: u128, b: u128) -> U256 {
        let (a_hi, a_lo) = (a >> 64, a & MASK64);
        let (b_hi, b_lo) = (b >> 64, b & MASK64);
        let ll = a_lo * b_lo;
        let lh = a_lo * b_hi;
        let hl = a_hi * b_lo;
        let hh = a_hi * b_hi;

        let mid = (ll >> 64) + (lh & MASK64) + (hl & MASK64);
        U256 {
            hi: hh + (lh >> 64) + (hl >> 64) + (mid >> 64),
            lo: (ll & MASK64) | (mid << 64),
        }
    }

    /// Binary long division. `d` must be non-zero.
    pub(super) fn div_rem(n: U256, d: u128) -> (U256, u128) {
        let mut q = U256 { hi: 0, lo: 0 };
        let mut r: u128 = 0;
        for i in (0..256u32).rev() {
            let bit = if i >= 128 {
                (n.hi >> (i - 128)) & 1
            } else {
                (n.lo >> i) & 1
            };
            let carry = r >> 127;
            r = (r << 1) | bit;
            if carry == 1 || r >= d {
                r = r.wrapping_sub(d);
                if i >= 128 {
                    q.hi |= 1 << (i - 128);
                } else {
                    q.lo |= 1 << i;
                }
            }
        }
        (q, r)
    }

    pub(super) fn div_round_half_even(n: U256, d: u128) -> Option<u128> {
        let (q, r) = div_rem(n, d);
        if q.hi != 0 {
            return None;
        }
        let rest = d - r;
        if r > rest || (r == rest && q.lo & 1 == 1) {
            q.lo.checked_add(1)
        } else {
            Some(q.lo)
        }
    }

    /// Little-endian 64-bit limbs; wide enough for a sum of power-weighted
    /// 256-bit squares.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(super) struct U384([u64; 6]);

    impl U384 {
        pub const ZERO: Self = Self([0; 6]);

        pub fn from_u256(v: U256) -> Self {
            Self([
                v.lo as u64,
                (v.lo >> 64) as u64,
                v.hi as u64,
                (v.hi >> 64) as u64,
                0,
                0,
            ])
        }

        pub fn checked_add(self, rhs: Self) -> Option<Self> {
            let mut out = [0u64; 6];
            let mut carry: u128 = 0;
            for (i, limb) in out.iter_mut().enumerate() {
                let t = self.0[i] as u128 + rhs.0[i] as u128 + carry;
                *limb = t as u64;
                carry = t >> 64;
            }
            (carry == 0).then_some(Self(out))
        }

        pub fn checked_mul_u64(self, m: u64) -> Option<Self> {
            let mut out = [0u64; 6];
            let mut carry: u128 = 0;
            for (i, limb) in out.iter_mut().enumerate() {
                let t = self.0[i] as u128 * m as u128 + carry;
                *limb = t as u64;
                carry = t >> 64;
            }
            (carry == 0).then_some(Self(out))
        }

        /// Floor division. `d` must be non-zero.
        pub fn div_u64(self, d: u64) -> Self {
            let mut out = [0u64; 6];
            let mut rem: u128 = 0;
            for i in (0..6).rev() {
                let cur = (rem << 64) | self.0[i] as u128;
                out[i] = (cur / d as u128) as u64;
                rem = cur % d as u128;
            }
            Self(out)
        }

        pub fn to_u256(self) -> Option<U256> {
            if self.0[4] != 0 || self.0[5] != 0 {
                return None;
            }
            Some(U256 {
                lo: self.0[0] as u128 | (self.0[1] as u128) << 64,
                hi: self.0[2] as u128 | (self.0[3] as u128) << 64,
            })
        }
    }

    /// Floor square root via Newton's method from above.
    pub(super) fn isqrt(n: U256) -> u128 {
        if n.hi == 0 && n.lo == 0 {
            return 0;
        }
        let bits = if n.hi != 0 {
            256 - n.hi.leading_zeros()
        } else {
            128 - n.lo.leading_zeros()
        };
        let shift = (bits + 1) / 2;
        let mut x: u128 = if shift >= 128 { u128::MAX } else { 1 << shift };
        loop {
            let (q, _) = div_rem(n, x);
            if q.hi != 0 || q.lo >= x {
                return x;
            }
            let y = q.lo + (x - q.lo) / 2;
            if y >= x {
                return x;
            }
            x = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(dec("10").to_string(), "10.000000000000000000");
        assert_eq!(dec("123.123").to_string(), "123.123000000000000000");
        assert_eq!(dec("-0.5").to_string(), "-0.500000000000000000");
        assert_eq!(dec("0.000000000000000001").raw(), 1);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", ".5", "1.", "abc", "1.2.3", "1e5", "0.0000000000000000001", "--1"] {
            assert!(bad.parse::<Dec>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn with_prec_matches_parse() {
        assert_eq!(Dec::with_prec(25, 4), dec("0.0025"));
        assert_eq!(Dec::with_prec(50, 2), dec("0.5"));
        assert_eq!(Dec::from_int(7), dec("7"));
    }

    #[test]
    fn mul_and_quo() {
        assert_eq!(dec("1.5").checked_mul(dec("1.5")), Some(dec("2.25")));
        assert_eq!(dec("-2").checked_mul(dec("3")), Some(dec("-6")));
        assert_eq!(dec("10").checked_quo(dec("4")), Some(dec("2.5")));
        assert_eq!(dec("1").checked_quo(Dec::ZERO), None);
    }

    #[test]
    fn quo_rounds_half_to_even() {
        assert_eq!(Dec::ONE.checked_quo(dec("3")), Some(dec("0.333333333333333333")));
        assert_eq!(dec("2").checked_quo(dec("3")), Some(dec("0.666666666666666667")));
        assert_eq!(Dec::from_raw(5).checked_mul(dec("0.1")), Some(Dec::ZERO));
        assert_eq!(Dec::from_raw(15).checked_mul(dec("0.1")), Some(Dec::from_raw(2)));
    }

    #[test]
    fn large_products_do_not_overflow_intermediate() {
        let big = dec("1000000000");
        assert_eq!(big.checked_mul(big), Some(dec("1000000000000000000")));
        assert_eq!(
            dec("1000000000000000000").checked_quo(big),
            Some(big)
        );
    }

    #[test]
    fn product_overflow_is_reported() {
        let huge = Dec::from_raw(i128::MAX);
        assert_eq!(huge.checked_mul(dec("2")), None);
        assert_eq!(huge.checked_add(Dec::ONE), None);
    }

    #[test]
    fn round_and_truncate() {
        assert_eq!(dec("2.5").round_int(), 2);
        assert_eq!(dec("3.5").round_int(), 4);
        assert_eq!(dec("-2.5").round_int(), -2);
        assert_eq!(dec("2.6").round_int(), 3);
        assert_eq!(dec("2.9").truncate_int(), 2);
        assert_eq!(dec("-2.9").truncate_int(), -2);
    }

    #[test]
    fn sqrt() {
        assert_eq!(dec("4").approx_sqrt(), Some(dec("2")));
        assert_eq!(dec("2").approx_sqrt(), Some(dec("1.414213562373095048")));
        assert_eq!(Dec::ZERO.approx_sqrt(), Some(Dec::ZERO));
        assert_eq!(dec("-1").approx_sqrt(), None);
    }

    #[test]
    fn weighted_std_dev_matches_definition() {
        let samples = [(dec("6"), 100), (dec("10"), 100), (dec("17"), 100)];
        let sd = Dec::weighted_std_dev(samples, dec("10")).unwrap();
        // sqrt(65 / 3)
        assert!(sd > dec("4.654") && sd < dec("4.655"), "{sd}");

        let weighted = [(dec("1"), 0), (dec("10"), 100), (dec("12"), 100)];
        assert_eq!(Dec::weighted_std_dev(weighted, dec("11")), Some(Dec::ONE));
        assert_eq!(
            Dec::weighted_std_dev(Vec::<(Dec, i64)>::new(), dec("1")),
            Some(Dec::ZERO)
        );
    }

    #[test]
    fn weighted_std_dev_handles_wide_spreads() {
        let big = dec("100000000000");
        let samples = [(Dec::ONE, 100), (big, 100), (big, 100)];
        let sd = Dec::weighted_std_dev(samples, big).unwrap();
        // (1e11 - 1) / sqrt(3)
        assert!(sd > dec("57735026918") && sd < dec("57735026919"), "{sd}");

        let extreme = [(Dec::from_raw(1), i64::MAX), (Dec::MAX, i64::MAX)];
        assert!(Dec::weighted_std_dev(extreme, Dec::from_raw(1)).is_some());
    }

    #[test]
    fn saturating_ops_clamp() {
        assert_eq!(Dec::MAX.saturating_add(Dec::ONE), Dec::MAX);
        assert_eq!(Dec::MIN.saturating_sub(Dec::ONE), Dec::MIN);
        assert_eq!(dec("1").saturating_add(dec("2")), dec("3"));
    }

    #[test]
    fn from_ratio() {
        assert_eq!(Dec::from_ratio(1, 4), Some(dec("0.25")));
        assert_eq!(Dec::from_ratio(1, 0), None);
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&dec("1.25")).unwrap();
        assert_eq!(json, "\"1.250000000000000000\"");
        let back: Dec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dec("1.25"));
    }
}
