//! Lane element types.
//!
//! [`Element`] is sealed: only `f32`, `f64`, `i32` and `i64` can be lanes.
//! Besides the usual numeric bounds it carries the scalar semantics every
//! backend must agree with. The array backend is written entirely in terms
//! of these methods, and the native backends are tested against them.

use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
}

/// A scalar that can occupy a vector lane.
pub trait Element:
    sealed::Sealed
    + Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// Rust name of the type, used in reports.
    const NAME: &'static str;
    /// Lane width in bits.
    const BITS: u32;
    const ZERO: Self;

    /// Raw bits, zero-extended to 64.
    fn to_bits(self) -> u64;
    /// Reinterprets the low [`Self::BITS`] bits.
    fn from_bits(bits: u64) -> Self;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    fn lane_div(self, rhs: Self) -> Self;
    fn lane_abs(self) -> Self;

    /// `a < b ? a : b`, as the hardware does it (NaN picks `rhs`).
    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    /// `a > b ? a : b`, as the hardware does it (NaN picks `rhs`).
    #[inline(always)]
    fn lane_max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }

    /// A lane with every bit set (a true mask lane).
    #[inline(always)]
    fn all_ones() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// The lane's sign bit, which is what movemask-style instructions read.
    #[inline(always)]
    fn sign_bit(self) -> bool {
        (self.to_bits() >> (Self::BITS - 1)) & 1 == 1
    }
}

/// Floating-point lanes.
pub trait Float: Element {
    fn lane_sqrt(self) -> Self;
    /// `1 / sqrt(x)`.
    fn lane_rsqrt(self) -> Self;
    fn lane_ceil(self) -> Self;
    fn lane_floor(self) -> Self;
    /// Round half to even.
    fn lane_round(self) -> Self;
}

/// Integer lanes.
pub trait Integer: Element {
    /// Logical left shift; counts past the lane width give 0.
    fn lane_shl(self, count: u32) -> Self;
    /// Arithmetic right shift; counts past the lane width fill with the sign.
    fn lane_shr(self, count: u32) -> Self;
}

/// A lane-wise numeric conversion between element types.
pub trait LaneCast<To: Element>: Element {
    fn cast(self) -> To;
}

macro_rules! float_element {
    ($t:ty, $bits_ty:ty, $bits:literal) => {
        impl Element for $t {
            const NAME: &'static str = stringify!($t);
            const BITS: u32 = $bits;
            const ZERO: Self = 0.0;

            #[inline(always)]
            fn to_bits(self) -> u64 {
                <$t>::to_bits(self) as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as $bits_ty)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                self / rhs
            }

            /// `max(0 - x, x)`.
            #[inline(always)]
            fn lane_abs(self) -> Self {
                (0.0 - self).lane_max(self)
            }
        }

        impl Float for $t {
            #[inline(always)]
            fn lane_sqrt(self) -> Self {
                self.sqrt()
            }

            #[inline(always)]
            fn lane_rsqrt(self) -> Self {
                1.0 / self.sqrt()
            }

            #[inline(always)]
            fn lane_ceil(self) -> Self {
                self.ceil()
            }

            #[inline(always)]
            fn lane_floor(self) -> Self {
                self.floor()
            }

            #[inline(always)]
            fn lane_round(self) -> Self {
                self.round_ties_even()
            }
        }
    };
}

macro_rules! int_element {
    ($t:ty, $bits_ty:ty, $bits:literal) => {
        impl Element for $t {
            const NAME: &'static str = stringify!($t);
            const BITS: u32 = $bits;
            const ZERO: Self = 0;

            #[inline(always)]
            fn to_bits(self) -> u64 {
                self as $bits_ty as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                bits as $bits_ty as $t
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            /// A zero divisor gives `MIN`, the x86 "integer indefinite" value.
            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                if rhs == 0 {
                    <$t>::MIN
                } else {
                    self.wrapping_div(rhs)
                }
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                self.wrapping_abs()
            }
        }

        impl Integer for $t {
            #[inline(always)]
            fn lane_shl(self, count: u32) -> Self {
                self.checked_shl(count).unwrap_or(0)
            }

            #[inline(always)]
            fn lane_shr(self, count: u32) -> Self {
                self.checked_shr(count).unwrap_or(if self < 0 { -1 } else { 0 })
            }
        }
    };
}

float_element!(f32, u32, 32);
float_element!(f64, u64, 64);
int_element!(i32, u32, 32);
int_element!(i64, u64, 64);

/// Round half to even, with NaN and out-of-range values going to `i32::MIN`.
#[inline(always)]
fn round_to_i32(x: f64) -> i32 {
    let rounded = x.round_ties_even();
    if (-2_147_483_648.0..2_147_483_648.0).contains(&rounded) {
        rounded as i32
    } else {
        i32::MIN
    }
}

impl LaneCast<f32> for i32 {
    #[inline(always)]
    fn cast(self) -> f32 {
        self as f32
    }
}

impl LaneCast<i32> for f32 {
    #[inline(always)]
    fn cast(self) -> i32 {
        round_to_i32(self as f64)
    }
}

impl LaneCast<f64> for i32 {
    #[inline(always)]
    fn cast(self) -> f64 {
        self as f64
    }
}

impl LaneCast<f64> for f32 {
    #[inline(always)]
    fn cast(self) -> f64 {
        self as f64
    }
}

impl LaneCast<f32> for f64 {
    #[inline(always)]
    fn cast(self) -> f32 {
        self as f32
    }
}

impl LaneCast<i32> for f64 {
    #[inline(always)]
    fn cast(self) -> i32 {
        round_to_i32(self)
    }
}

impl LaneCast<i64> for i32 {
    #[inline(always)]
    fn cast(self) -> i64 {
        self as i64
    }
}
