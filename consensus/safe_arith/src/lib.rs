//! Checked arithmetic for values that drive consensus.
//!
//! A silent overflow or an unnoticed division by zero in the reward engine
//! forks the chain just as surely as a bad signature. `SafeArith` gives the
//! integer types used throughout the state transition a `Result`-returning
//! alternative to the panicking/wrapping operators, so a genuine overflow is
//! an explicit `ArithError` instead of undefined consensus behaviour.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithError {
    Overflow,
    DivisionByZero,
}

impl fmt::Display for ArithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithError::Overflow => write!(f, "arithmetic overflow"),
            ArithError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for ArithError {}

pub trait SafeArith: Sized + Copy {
    fn safe_add(&self, other: Self) -> Result<Self, ArithError>;
    fn safe_sub(&self, other: Self) -> Result<Self, ArithError>;
    fn safe_mul(&self, other: Self) -> Result<Self, ArithError>;
    /// Floor division; truncates toward zero for non-negative operands, as
    /// required by every quotient in the reward engine.
    fn safe_div(&self, other: Self) -> Result<Self, ArithError>;

    fn safe_add_assign(&mut self, other: Self) -> Result<(), ArithError> {
        *self = self.safe_add(other)?;
        Ok(())
    }

    fn safe_sub_assign(&mut self, other: Self) -> Result<(), ArithError> {
        *self = self.safe_sub(other)?;
        Ok(())
    }
}

macro_rules! impl_safe_arith {
    ($ty:ty) => {
        impl SafeArith for $ty {
            fn safe_add(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_add(other).ok_or(ArithError::Overflow)
            }

            fn safe_sub(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_sub(other).ok_or(ArithError::Overflow)
            }

            fn safe_mul(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_mul(other).ok_or(ArithError::Overflow)
            }

            fn safe_div(&self, other: Self) -> Result<Self, ArithError> {
                self.checked_div(other).ok_or(ArithError::DivisionByZero)
            }
        }
    };
}

impl_safe_arith!(u64);
impl_safe_arith!(i64);
impl_safe_arith!(u32);
impl_safe_arith!(usize);
