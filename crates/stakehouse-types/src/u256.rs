use crate::error::TypesError;
use std::fmt;
use std::ops::{Add, Div, Mul, Rem, Sub};
use std::str::FromStr;

/// 256-bit unsigned integer for token amounts and reward indices.
///
/// Stored as 4 x u64 in little-endian limb order. Reward accounting
/// multiplies 18-decimal amounts by elapsed seconds and by the fixed-point
/// scale, which overflows u128; all hot-path arithmetic goes through the
/// checked methods so overflow surfaces as an error instead of wrapping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]);

impl U256 {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);
    pub const MAX: Self = Self([u64::MAX, u64::MAX, u64::MAX, u64::MAX]);

    /// Fixed-point scale: one whole token in 18-decimal base units (10^18).
    pub const UNIT: Self = Self([1_000_000_000_000_000_000, 0, 0, 0]);

    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    pub const fn as_limbs(&self) -> &[u64; 4] {
        &self.0
    }

    pub const fn from_u64(val: u64) -> Self {
        Self([val, 0, 0, 0])
    }

    pub const fn from_u128(val: u128) -> Self {
        Self([val as u64, (val >> 64) as u64, 0, 0])
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    /// Checked addition
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        let mut result = [0u64; 4];
        let mut carry = 0u64;

        for i in 0..4 {
            let (sum1, overflow1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum2, overflow2) = sum1.overflowing_add(carry);
            result[i] = sum2;
            carry = (overflow1 as u64) + (overflow2 as u64);
        }

        (carry == 0).then_some(Self(result))
    }

    /// Checked subtraction
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        if self < rhs {
            return None;
        }

        let mut result = [0u64; 4];
        let mut borrow = 0u64;

        for i in 0..4 {
            let (diff1, underflow1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff2, underflow2) = diff1.overflowing_sub(borrow);
            result[i] = diff2;
            borrow = (underflow1 as u64) | (underflow2 as u64);
        }

        Some(Self(result))
    }

    /// Checked multiplication
    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        if self.is_zero() || rhs.is_zero() {
            return Some(Self::ZERO);
        }

        let mut acc = [0u128; 4];

        for i in 0..4 {
            if self.0[i] == 0 {
                continue;
            }
            for j in 0..4 {
                let product = (self.0[i] as u128) * (rhs.0[j] as u128);
                if product == 0 {
                    continue;
                }
                if i + j >= 4 {
                    // A non-zero partial product past the top limb overflows.
                    return None;
                }
                acc[i + j] = acc[i + j].checked_add(product)?;
            }
        }

        let mut result = [0u64; 4];
        let mut carry = 0u128;
        for i in 0..4 {
            let sum = acc[i].checked_add(carry)?;
            result[i] = sum as u64;
            carry = sum >> 64;
        }

        (carry == 0).then_some(Self(result))
    }

    /// Checked division, truncating toward zero. None when `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        if self < rhs {
            return Some(Self::ZERO);
        }

        // Schoolbook shift-subtract long division.
        let mut quotient = Self::ZERO;
        let mut remainder = Self::ZERO;

        for i in (0..self.bit_len()).rev() {
            remainder = remainder.shl_one();
            if self.bit(i) {
                remainder.0[0] |= 1;
            }
            if remainder >= *rhs {
                remainder = remainder.checked_sub(rhs)?;
                quotient.set_bit(i);
            }
        }

        Some(quotient)
    }

    /// Checked remainder. None when `rhs` is zero.
    pub fn checked_rem(&self, rhs: &Self) -> Option<Self> {
        let div = self.checked_div(rhs)?;
        let mul = div.checked_mul(rhs)?;
        self.checked_sub(&mul)
    }

    /// Saturating addition
    pub fn saturating_add(&self, rhs: &Self) -> Self {
        self.checked_add(rhs).unwrap_or(Self::MAX)
    }

    /// Saturating subtraction
    pub fn saturating_sub(&self, rhs: &Self) -> Self {
        self.checked_sub(rhs).unwrap_or(Self::ZERO)
    }

    fn shl_one(&self) -> Self {
        let mut result = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            result[i] = (self.0[i] << 1) | carry;
            carry = self.0[i] >> 63;
        }
        Self(result)
    }

    fn bit(&self, pos: u32) -> bool {
        let limb = (pos / 64) as usize;
        let bit = pos % 64;
        (self.0[limb] >> bit) & 1 != 0
    }

    fn set_bit(&mut self, pos: u32) {
        let limb = (pos / 64) as usize;
        let bit = pos % 64;
        self.0[limb] |= 1 << bit;
    }

    /// Bit length (position of highest set bit + 1)
    fn bit_len(&self) -> u32 {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return (i as u32 + 1) * 64 - self.0[i].leading_zeros();
            }
        }
        0
    }

    /// Convert to u128, clamping to zero when the value does not fit
    pub fn as_u128(&self) -> u128 {
        (*self).try_into().unwrap_or(0)
    }

    /// Parse from decimal string
    pub fn from_decimal_str(s: &str) -> Result<Self, TypesError> {
        if s.is_empty() {
            return Err(TypesError::InvalidU256String(s.to_string()));
        }

        let mut result = Self::ZERO;
        for c in s.chars() {
            if !c.is_ascii_digit() {
                return Err(TypesError::InvalidU256String(s.to_string()));
            }
            let digit = c as u64 - '0' as u64;
            result = result
                .checked_mul(&Self::from_u64(10))
                .and_then(|r| r.checked_add(&Self::from_u64(digit)))
                .ok_or(TypesError::U256Overflow)?;
        }

        Ok(result)
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                std::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl From<u64> for U256 {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

impl From<u128> for U256 {
    fn from(val: u128) -> Self {
        Self::from_u128(val)
    }
}

impl From<u32> for U256 {
    fn from(val: u32) -> Self {
        Self::from_u64(val as u64)
    }
}

impl TryFrom<U256> for u64 {
    type Error = TypesError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[1] != 0 || value.0[2] != 0 || value.0[3] != 0 {
            Err(TypesError::U256Overflow)
        } else {
            Ok(value.0[0])
        }
    }
}

impl TryFrom<U256> for u128 {
    type Error = TypesError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[2] != 0 || value.0[3] != 0 {
            Err(TypesError::U256Overflow)
        } else {
            Ok((value.0[1] as u128) << 64 | value.0[0] as u128)
        }
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut n = *self;
        let ten = Self::from_u64(10);
        let mut s = String::new();

        while !n.is_zero() {
            let rem = n.checked_rem(&ten).map(|v| v.0[0]).unwrap_or(0);
            s.push((rem as u8 + b'0') as char);
            n = n.checked_div(&ten).unwrap_or(Self::ZERO);
        }

        write!(f, "{}", s.chars().rev().collect::<String>())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

impl FromStr for U256 {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

// Operator sugar for tests and non-critical paths: add saturates at MAX,
// sub clamps at zero. Accounting code uses the checked methods directly.

impl Add for U256 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(&rhs)
    }
}

impl Sub for U256 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(&rhs)
    }
}

impl Mul for U256 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(&rhs).unwrap_or(Self::MAX)
    }
}

impl Div for U256 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(&rhs).unwrap_or(Self::ZERO)
    }
}

impl Rem for U256 {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        self.checked_rem(&rhs).unwrap_or(Self::ZERO)
    }
}

impl std::ops::AddAssign for U256 {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(&rhs);
    }
}

impl std::ops::SubAssign for U256 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.saturating_sub(&rhs);
    }
}
