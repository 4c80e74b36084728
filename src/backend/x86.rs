//! x86_64 registers.
//!
//! One `#[repr(transparent)]` newtype per (lane type, width) over its
//! `core::arch` register. 128-bit registers exist from SSE/SSE2, 256-bit float
//! registers from AVX and 256-bit integer registers from AVX2. Operations
//! that need more than the register's own tier are gated with
//! `cfg(simd_tier = ...)`; below that tier they either fall back to an exact
//! sequence of lower-tier instructions or the capability is not implemented.

#[cfg(simd_tier = "sse4.1")]
use super::Rounding;
use super::{map_lanes, zip_lanes, Abs, Compare, Convert, FloatMath, MinMax, Register, Shift};
use crate::element::{Element, Integer};
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};

// ============================================================================
// Register shells
// ============================================================================

macro_rules! register_shell {
    ($(#[$attr:meta])* $name:ident($inner:ty): [$lane:ty; $lanes:literal]) => {
        $(#[$attr])*
        #[derive(Copy, Clone)]
        #[repr(transparent)]
        pub struct $name($inner);

        $(#[$attr])*
        impl $name {
            /// Wraps a raw register.
            #[inline(always)]
            pub fn from_native(raw: $inner) -> Self {
                Self(raw)
            }

            /// The raw register.
            #[inline(always)]
            pub fn into_native(self) -> $inner {
                self.0
            }
        }

        $(#[$attr])*
        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({:?})"),
                    <Self as Register<$lanes>>::to_array(*self)
                )
            }
        }
    };
}

// ============================================================================
// Float registers
// ============================================================================

macro_rules! float_register {
    (
        $(#[$attr:meta])*
        $name:ident($inner:ty): [$lane:ty; $lanes:literal] as $native:literal {
            zero: $zero:ident, set1: $set1:ident,
            loadu: $loadu:ident, load: $load:ident, storeu: $storeu:ident,
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
            and: $and:ident, or: $or:ident, xor: $xor:ident, andnot: $andnot:ident,
            ones: $ones:expr, movemask: $movemask:ident, blendv: $blendv:ident,
            min: $min:ident, max: $max:ident, sqrt: $sqrt:ident, rsqrt: |$r:ident| $rsqrt:expr,
            ceil: $ceil:ident, floor: $floor:ident, round: $round:ident,
        }
        $($extra:tt)*
    ) => {
        register_shell!($(#[$attr])* $name($inner): [$lane; $lanes]);

        $(#[$attr])*
        unsafe impl Register<$lanes> for $name {
            type Lane = $lane;
            const NATIVE: &'static str = $native;

            #[inline(always)]
            fn splat(value: $lane) -> Self {
                unsafe { Self($set1(value)) }
            }

            #[inline(always)]
            fn from_array(lanes: [$lane; $lanes]) -> Self {
                unsafe { Self($loadu(lanes.as_ptr())) }
            }

            #[inline(always)]
            fn to_array(self) -> [$lane; $lanes] {
                let mut out = [<$lane>::default(); $lanes];
                unsafe { $storeu(out.as_mut_ptr(), self.0) };
                out
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $lane) -> Self {
                unsafe { Self($loadu(ptr)) }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $lane) -> Self {
                unsafe { Self($load(ptr)) }
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                unsafe { Self($add(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                unsafe { Self($sub(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe { Self($mul(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                unsafe { Self($div(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                unsafe { Self($and(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                unsafe { Self($or(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                unsafe { Self($xor(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn andnot(self, rhs: Self) -> Self {
                unsafe { Self($andnot(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn not(self) -> Self {
                unsafe { Self($xor(self.0, $ones)) }
            }

            #[inline(always)]
            fn bitmask(self) -> u32 {
                unsafe { $movemask(self.0) as u32 }
            }

            #[cfg(simd_tier = "sse4.1")]
            #[inline(always)]
            fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
                unsafe { Self($blendv(if_false.0, if_true.0, mask.0)) }
            }

            $($extra)*
        }

        $(#[$attr])*
        impl MinMax<$lanes> for $name {
            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                unsafe { Self($min(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                unsafe { Self($max(self.0, rhs.0)) }
            }
        }

        $(#[$attr])*
        impl Abs<$lanes> for $name {
            #[inline(always)]
            fn abs(self) -> Self {
                unsafe { Self($max($sub($zero(), self.0), self.0)) }
            }
        }

        $(#[$attr])*
        impl FloatMath<$lanes> for $name {
            #[inline(always)]
            fn sqrt(self) -> Self {
                unsafe { Self($sqrt(self.0)) }
            }

            #[inline(always)]
            fn rsqrt(self) -> Self {
                let $r = self.0;
                unsafe { Self($rsqrt) }
            }
        }

        // The 256-bit forms are AVX, which sits above SSE4.1.
        $(#[$attr])*
        #[cfg(simd_tier = "sse4.1")]
        impl Rounding<$lanes> for $name {
            #[inline(always)]
            fn ceil(self) -> Self {
                unsafe { Self($ceil(self.0)) }
            }

            #[inline(always)]
            fn floor(self) -> Self {
                unsafe { Self($floor(self.0)) }
            }

            #[inline(always)]
            fn round(self) -> Self {
                const MODE: i32 = _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC;
                unsafe { Self($round::<MODE>(self.0)) }
            }
        }
    };
}

float_register! {
    /// Four `f32` lanes in an SSE register.
    F32x4(__m128): [f32; 4] as "__m128" {
        zero: _mm_setzero_ps, set1: _mm_set1_ps,
        loadu: _mm_loadu_ps, load: _mm_load_ps, storeu: _mm_storeu_ps,
        add: _mm_add_ps, sub: _mm_sub_ps, mul: _mm_mul_ps, div: _mm_div_ps,
        and: _mm_and_ps, or: _mm_or_ps, xor: _mm_xor_ps, andnot: _mm_andnot_ps,
        ones: _mm_castsi128_ps(_mm_set1_epi32(-1)), movemask: _mm_movemask_ps,
        blendv: _mm_blendv_ps,
        min: _mm_min_ps, max: _mm_max_ps, sqrt: _mm_sqrt_ps, rsqrt: |x| _mm_rsqrt_ps(x),
        ceil: _mm_ceil_ps, floor: _mm_floor_ps, round: _mm_round_ps,
    }

    #[cfg(simd_tier = "sse3")]
    #[inline(always)]
    fn pair_add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_hadd_ps(self.0, rhs.0)) }
    }

    #[cfg(simd_tier = "sse3")]
    #[inline(always)]
    fn pair_sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_hsub_ps(self.0, rhs.0)) }
    }

    #[cfg(simd_tier = "sse3")]
    #[inline(always)]
    fn reduce_add(self) -> f32 {
        unsafe {
            let pairs = _mm_hadd_ps(self.0, self.0);
            _mm_cvtss_f32(_mm_hadd_ps(pairs, pairs))
        }
    }

    #[cfg(simd_tier = "sse3")]
    #[inline(always)]
    fn reduce_sub(self) -> f32 {
        unsafe {
            let pairs = _mm_hsub_ps(self.0, self.0);
            _mm_cvtss_f32(_mm_hsub_ps(pairs, pairs))
        }
    }
}

float_register! {
    /// Two `f64` lanes in an SSE2 register.
    #[cfg(simd_tier = "sse2")]
    F64x2(__m128d): [f64; 2] as "__m128d" {
        zero: _mm_setzero_pd, set1: _mm_set1_pd,
        loadu: _mm_loadu_pd, load: _mm_load_pd, storeu: _mm_storeu_pd,
        add: _mm_add_pd, sub: _mm_sub_pd, mul: _mm_mul_pd, div: _mm_div_pd,
        and: _mm_and_pd, or: _mm_or_pd, xor: _mm_xor_pd, andnot: _mm_andnot_pd,
        ones: _mm_castsi128_pd(_mm_set1_epi32(-1)), movemask: _mm_movemask_pd,
        blendv: _mm_blendv_pd,
        min: _mm_min_pd, max: _mm_max_pd, sqrt: _mm_sqrt_pd,
        rsqrt: |x| _mm_div_pd(_mm_set1_pd(1.0), _mm_sqrt_pd(x)),
        ceil: _mm_ceil_pd, floor: _mm_floor_pd, round: _mm_round_pd,
    }

    #[cfg(simd_tier = "sse3")]
    #[inline(always)]
    fn pair_add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_hadd_pd(self.0, rhs.0)) }
    }

    #[cfg(simd_tier = "sse3")]
    #[inline(always)]
    fn pair_sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_hsub_pd(self.0, rhs.0)) }
    }
}

float_register! {
    /// Eight `f32` lanes in an AVX register.
    #[cfg(simd_tier = "avx")]
    F32x8(__m256): [f32; 8] as "__m256" {
        zero: _mm256_setzero_ps, set1: _mm256_set1_ps,
        loadu: _mm256_loadu_ps, load: _mm256_load_ps, storeu: _mm256_storeu_ps,
        add: _mm256_add_ps, sub: _mm256_sub_ps, mul: _mm256_mul_ps, div: _mm256_div_ps,
        and: _mm256_and_ps, or: _mm256_or_ps, xor: _mm256_xor_ps, andnot: _mm256_andnot_ps,
        ones: _mm256_castsi256_ps(_mm256_set1_epi32(-1)), movemask: _mm256_movemask_ps,
        blendv: _mm256_blendv_ps,
        min: _mm256_min_ps, max: _mm256_max_ps, sqrt: _mm256_sqrt_ps,
        rsqrt: |x| _mm256_rsqrt_ps(x),
        ceil: _mm256_ceil_ps, floor: _mm256_floor_ps, round: _mm256_round_ps,
    }
}

float_register! {
    /// Four `f64` lanes in an AVX register.
    #[cfg(simd_tier = "avx")]
    F64x4(__m256d): [f64; 4] as "__m256d" {
        zero: _mm256_setzero_pd, set1: _mm256_set1_pd,
        loadu: _mm256_loadu_pd, load: _mm256_load_pd, storeu: _mm256_storeu_pd,
        add: _mm256_add_pd, sub: _mm256_sub_pd, mul: _mm256_mul_pd, div: _mm256_div_pd,
        and: _mm256_and_pd, or: _mm256_or_pd, xor: _mm256_xor_pd, andnot: _mm256_andnot_pd,
        ones: _mm256_castsi256_pd(_mm256_set1_epi32(-1)), movemask: _mm256_movemask_pd,
        blendv: _mm256_blendv_pd,
        min: _mm256_min_pd, max: _mm256_max_pd, sqrt: _mm256_sqrt_pd,
        rsqrt: |x| _mm256_div_pd(_mm256_set1_pd(1.0), _mm256_sqrt_pd(x)),
        ceil: _mm256_ceil_pd, floor: _mm256_floor_pd, round: _mm256_round_pd,
    }
}

macro_rules! sse_float_compare {
    ($(#[$attr:meta])* $name:ident, $lanes:literal, $eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident) => {
        $(#[$attr])*
        impl Compare<$lanes> for $name {
            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Self {
                unsafe { Self($eq(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_ne(self, rhs: Self) -> Self {
                unsafe { Self($ne(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> Self {
                unsafe { Self($lt(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_le(self, rhs: Self) -> Self {
                unsafe { Self($le(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_gt(self, rhs: Self) -> Self {
                unsafe { Self($gt(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_ge(self, rhs: Self) -> Self {
                unsafe { Self($ge(self.0, rhs.0)) }
            }
        }
    };
}

sse_float_compare!(
    F32x4,
    4,
    _mm_cmpeq_ps,
    _mm_cmpneq_ps,
    _mm_cmplt_ps,
    _mm_cmple_ps,
    _mm_cmpgt_ps,
    _mm_cmpge_ps
);
sse_float_compare!(
    #[cfg(simd_tier = "sse2")]
    F64x2,
    2,
    _mm_cmpeq_pd,
    _mm_cmpneq_pd,
    _mm_cmplt_pd,
    _mm_cmple_pd,
    _mm_cmpgt_pd,
    _mm_cmpge_pd
);

macro_rules! avx_float_compare {
    ($name:ident, $lanes:literal, $cmp:ident) => {
        #[cfg(simd_tier = "avx")]
        impl Compare<$lanes> for $name {
            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Self {
                unsafe { Self($cmp::<_CMP_EQ_OQ>(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_ne(self, rhs: Self) -> Self {
                unsafe { Self($cmp::<_CMP_NEQ_UQ>(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> Self {
                unsafe { Self($cmp::<_CMP_LT_OQ>(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_le(self, rhs: Self) -> Self {
                unsafe { Self($cmp::<_CMP_LE_OQ>(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_gt(self, rhs: Self) -> Self {
                unsafe { Self($cmp::<_CMP_GT_OQ>(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn cmp_ge(self, rhs: Self) -> Self {
                unsafe { Self($cmp::<_CMP_GE_OQ>(self.0, rhs.0)) }
            }
        }
    };
}

avx_float_compare!(F32x8, 8, _mm256_cmp_ps);
avx_float_compare!(F64x4, 4, _mm256_cmp_pd);

// ============================================================================
// Integer registers
// ============================================================================

macro_rules! int_register {
    (
        $(#[$attr:meta])*
        $name:ident($inner:ty): [$lane:ty; $lanes:literal] as $native:literal {
            set1: $set1:ident, loadu: $loadu:ident, load: $load:ident, storeu: $storeu:ident,
            add: $add:ident, sub: $sub:ident,
            and: $and:ident, or: $or:ident, xor: $xor:ident, andnot: $andnot:ident,
            ones: $ones:expr, movemask: |$m:ident| $movemask:expr, blendv: $blendv:ident,
            blend_tier: $blend_tier:meta,
        }
        $($extra:tt)*
    ) => {
        register_shell!($(#[$attr])* $name($inner): [$lane; $lanes]);

        $(#[$attr])*
        unsafe impl Register<$lanes> for $name {
            type Lane = $lane;
            const NATIVE: &'static str = $native;

            #[inline(always)]
            fn splat(value: $lane) -> Self {
                unsafe { Self($set1(value)) }
            }

            #[inline(always)]
            fn from_array(lanes: [$lane; $lanes]) -> Self {
                unsafe { Self($loadu(lanes.as_ptr() as *const $inner)) }
            }

            #[inline(always)]
            fn to_array(self) -> [$lane; $lanes] {
                let mut out = [<$lane>::default(); $lanes];
                unsafe { $storeu(out.as_mut_ptr() as *mut $inner, self.0) };
                out
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $lane) -> Self {
                unsafe { Self($loadu(ptr as *const $inner)) }
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $lane) -> Self {
                unsafe { Self($load(ptr as *const $inner)) }
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                unsafe { Self($add(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                unsafe { Self($sub(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                unsafe { Self($and(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                unsafe { Self($or(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                unsafe { Self($xor(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn andnot(self, rhs: Self) -> Self {
                unsafe { Self($andnot(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn not(self) -> Self {
                unsafe { Self($xor(self.0, $ones)) }
            }

            #[inline(always)]
            fn bitmask(self) -> u32 {
                let $m = self.0;
                unsafe { $movemask as u32 }
            }

            #[cfg($blend_tier)]
            #[inline(always)]
            fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
                unsafe { Self($blendv(if_false.0, if_true.0, mask.0)) }
            }

            $($extra)*
        }
    };
}

int_register! {
    /// Four `i32` lanes in an SSE2 register.
    #[cfg(simd_tier = "sse2")]
    I32x4(__m128i): [i32; 4] as "__m128i" {
        set1: _mm_set1_epi32, loadu: _mm_loadu_si128, load: _mm_load_si128,
        storeu: _mm_storeu_si128,
        add: _mm_add_epi32, sub: _mm_sub_epi32,
        and: _mm_and_si128, or: _mm_or_si128, xor: _mm_xor_si128, andnot: _mm_andnot_si128,
        ones: _mm_set1_epi32(-1), movemask: |x| _mm_movemask_ps(_mm_castsi128_ps(x)),
        blendv: _mm_blendv_epi8, blend_tier: simd_tier = "sse4.1",
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(mullo_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(div_epi32(self.0, rhs.0)) }
    }

    #[cfg(simd_tier = "ssse3")]
    #[inline(always)]
    fn pair_add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_hadd_epi32(self.0, rhs.0)) }
    }

    #[cfg(simd_tier = "ssse3")]
    #[inline(always)]
    fn pair_sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_hsub_epi32(self.0, rhs.0)) }
    }
}

int_register! {
    /// Two `i64` lanes in an SSE2 register.
    #[cfg(simd_tier = "sse2")]
    I64x2(__m128i): [i64; 2] as "__m128i" {
        set1: _mm_set1_epi64x, loadu: _mm_loadu_si128, load: _mm_load_si128,
        storeu: _mm_storeu_si128,
        add: _mm_add_epi64, sub: _mm_sub_epi64,
        and: _mm_and_si128, or: _mm_or_si128, xor: _mm_xor_si128, andnot: _mm_andnot_si128,
        ones: _mm_set1_epi32(-1), movemask: |x| _mm_movemask_pd(_mm_castsi128_pd(x)),
        blendv: _mm_blendv_epi8, blend_tier: simd_tier = "sse4.1",
    }

    // No 64-bit lane multiply or divide below AVX-512.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        zip_lanes::<_, 2>(self, rhs, i64::lane_mul)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        zip_lanes::<_, 2>(self, rhs, i64::lane_div)
    }

    #[inline(always)]
    fn pair_add(self, rhs: Self) -> Self {
        unsafe {
            Self(_mm_add_epi64(
                _mm_unpacklo_epi64(self.0, rhs.0),
                _mm_unpackhi_epi64(self.0, rhs.0),
            ))
        }
    }

    #[inline(always)]
    fn pair_sub(self, rhs: Self) -> Self {
        unsafe {
            Self(_mm_sub_epi64(
                _mm_unpacklo_epi64(self.0, rhs.0),
                _mm_unpackhi_epi64(self.0, rhs.0),
            ))
        }
    }
}

int_register! {
    /// Eight `i32` lanes in an AVX2 register.
    #[cfg(simd_tier = "avx2")]
    I32x8(__m256i): [i32; 8] as "__m256i" {
        set1: _mm256_set1_epi32, loadu: _mm256_loadu_si256, load: _mm256_load_si256,
        storeu: _mm256_storeu_si256,
        add: _mm256_add_epi32, sub: _mm256_sub_epi32,
        and: _mm256_and_si256, or: _mm256_or_si256, xor: _mm256_xor_si256,
        andnot: _mm256_andnot_si256,
        ones: _mm256_set1_epi32(-1), movemask: |x| _mm256_movemask_ps(_mm256_castsi256_ps(x)),
        blendv: _mm256_blendv_epi8, blend_tier: simd_tier = "avx2",
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_mullo_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe {
            let lo = div_epi32(_mm256_castsi256_si128(self.0), _mm256_castsi256_si128(rhs.0));
            let hi = div_epi32(
                _mm256_extracti128_si256::<1>(self.0),
                _mm256_extracti128_si256::<1>(rhs.0),
            );
            Self(_mm256_set_m128i(hi, lo))
        }
    }
}

int_register! {
    /// Four `i64` lanes in an AVX2 register.
    #[cfg(simd_tier = "avx2")]
    I64x4(__m256i): [i64; 4] as "__m256i" {
        set1: _mm256_set1_epi64x, loadu: _mm256_loadu_si256, load: _mm256_load_si256,
        storeu: _mm256_storeu_si256,
        add: _mm256_add_epi64, sub: _mm256_sub_epi64,
        and: _mm256_and_si256, or: _mm256_or_si256, xor: _mm256_xor_si256,
        andnot: _mm256_andnot_si256,
        ones: _mm256_set1_epi32(-1), movemask: |x| _mm256_movemask_pd(_mm256_castsi256_pd(x)),
        blendv: _mm256_blendv_epi8, blend_tier: simd_tier = "avx2",
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        zip_lanes::<_, 4>(self, rhs, i64::lane_mul)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        zip_lanes::<_, 4>(self, rhs, i64::lane_div)
    }
}

/// Low 32 bits of each 32x32 lane product.
#[cfg(simd_tier = "sse4.1")]
#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_mullo_epi32(a, b) }
}

/// Low 32 bits of each 32x32 lane product, from two even-lane `pmuludq`s.
#[cfg(all(simd_tier = "sse2", not(simd_tier = "sse4.1")))]
#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let even = _mm_mul_epu32(a, b);
        let odd = _mm_mul_epu32(_mm_srli_epi64::<32>(a), _mm_srli_epi64::<32>(b));
        _mm_unpacklo_epi32(
            _mm_shuffle_epi32::<0b00_00_10_00>(even),
            _mm_shuffle_epi32::<0b00_00_10_00>(odd),
        )
    }
}

/// Divides the low two `i32` lanes through `f64`, which holds every `i32`
/// exactly. Truncation of an unrepresentable quotient yields `i32::MIN`.
#[cfg(simd_tier = "sse2")]
#[inline(always)]
unsafe fn div_epi32_pd(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_cvttpd_epi32(_mm_div_pd(_mm_cvtepi32_pd(a), _mm_cvtepi32_pd(b))) }
}

#[cfg(simd_tier = "sse2")]
#[inline(always)]
unsafe fn div_epi32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let lo = div_epi32_pd(a, b);
        let hi = div_epi32_pd(_mm_unpackhi_epi64(a, a), _mm_unpackhi_epi64(b, b));
        _mm_unpacklo_epi64(lo, hi)
    }
}

// ============================================================================
// Integer capabilities
// ============================================================================

#[cfg(simd_tier = "sse2")]
impl Compare<4> for I32x4 {
    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self {
        self.cmp_eq(rhs).not()
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmplt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        self.cmp_gt(rhs).not()
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        self.cmp_lt(rhs).not()
    }
}

#[cfg(simd_tier = "sse4.1")]
impl MinMax<4> for I32x4 {
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Self(_mm_min_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { Self(_mm_max_epi32(self.0, rhs.0)) }
    }
}

#[cfg(simd_tier = "ssse3")]
impl Abs<4> for I32x4 {
    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Self(_mm_abs_epi32(self.0)) }
    }
}

#[cfg(simd_tier = "sse2")]
impl Shift<4> for I32x4 {
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe { Self(_mm_sll_epi32(self.0, shift_count(count))) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe { Self(_mm_sra_epi32(self.0, shift_count(count))) }
    }
}

/// The whole trait is gated on SSE4.2 for `pcmpgtq`. `cmp_eq` alone would
/// only need SSE4.1 (`pcmpeqq`), but the ordered predicates as well as
/// `MinMax` and `Abs` below are built on `cmp_gt`.
#[cfg(simd_tier = "sse4.2")]
impl Compare<2> for I64x2 {
    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self {
        self.cmp_eq(rhs).not()
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        rhs.cmp_gt(self)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        self.cmp_gt(rhs).not()
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        rhs.cmp_gt(self).not()
    }
}

#[cfg(simd_tier = "sse4.2")]
impl MinMax<2> for I64x2 {
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        <Self as Register<2>>::select(self.cmp_lt(rhs), self, rhs)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        <Self as Register<2>>::select(self.cmp_gt(rhs), self, rhs)
    }
}

#[cfg(simd_tier = "sse4.2")]
impl Abs<2> for I64x2 {
    #[inline(always)]
    fn abs(self) -> Self {
        let zero = Self::splat(0);
        <Self as Register<2>>::select(self.cmp_lt(zero), zero.sub(self), self)
    }
}

#[cfg(simd_tier = "sse2")]
impl Shift<2> for I64x2 {
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe { Self(_mm_sll_epi64(self.0, shift_count(count))) }
    }

    // No 64-bit arithmetic right shift below AVX-512.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        map_lanes::<_, 2>(self, |x| x.lane_shr(count))
    }
}

#[cfg(simd_tier = "avx2")]
impl Compare<8> for I32x8 {
    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmpeq_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self {
        self.cmp_eq(rhs).not()
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        rhs.cmp_gt(self)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        self.cmp_gt(rhs).not()
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmpgt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        rhs.cmp_gt(self).not()
    }
}

#[cfg(simd_tier = "avx2")]
impl MinMax<8> for I32x8 {
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_min_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_max_epi32(self.0, rhs.0)) }
    }
}

#[cfg(simd_tier = "avx2")]
impl Abs<8> for I32x8 {
    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { Self(_mm256_abs_epi32(self.0)) }
    }
}

#[cfg(simd_tier = "avx2")]
impl Shift<8> for I32x8 {
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe { Self(_mm256_sll_epi32(self.0, shift_count(count))) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe { Self(_mm256_sra_epi32(self.0, shift_count(count))) }
    }
}

#[cfg(simd_tier = "avx2")]
impl Compare<4> for I64x4 {
    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmpeq_epi64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self {
        self.cmp_eq(rhs).not()
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        rhs.cmp_gt(self)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        self.cmp_gt(rhs).not()
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmpgt_epi64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        rhs.cmp_gt(self).not()
    }
}

#[cfg(simd_tier = "avx2")]
impl MinMax<4> for I64x4 {
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        <Self as Register<4>>::select(self.cmp_lt(rhs), self, rhs)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        <Self as Register<4>>::select(self.cmp_gt(rhs), self, rhs)
    }
}

#[cfg(simd_tier = "avx2")]
impl Abs<4> for I64x4 {
    #[inline(always)]
    fn abs(self) -> Self {
        let zero = Self::splat(0);
        <Self as Register<4>>::select(self.cmp_lt(zero), zero.sub(self), self)
    }
}

#[cfg(simd_tier = "avx2")]
impl Shift<4> for I64x4 {
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe { Self(_mm256_sll_epi64(self.0, shift_count(count))) }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        map_lanes::<_, 4>(self, |x| x.lane_shr(count))
    }
}

/// Shift count register. Counts past the lane width zero (`sll`) or
/// sign-fill (`sra`) the lanes, so clamping keeps that behavior.
#[cfg(simd_tier = "sse2")]
#[inline(always)]
fn shift_count(count: u32) -> __m128i {
    unsafe { _mm_cvtsi32_si128(count.min(64) as i32) }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! convert {
    ($(#[$attr:meta])* $from:ident => $to:ident, $intrinsic:ident) => {
        $(#[$attr])*
        impl Convert<$to> for $from {
            #[inline(always)]
            fn convert(self) -> $to {
                unsafe { $to($intrinsic(self.0)) }
            }
        }
    };
}

convert!(#[cfg(simd_tier = "sse2")] I32x4 => F32x4, _mm_cvtepi32_ps);
// Rounds with the default MXCSR mode, which is round half to even.
convert!(#[cfg(simd_tier = "sse2")] F32x4 => I32x4, _mm_cvtps_epi32);
convert!(#[cfg(simd_tier = "avx")] I32x4 => F64x4, _mm256_cvtepi32_pd);
convert!(#[cfg(simd_tier = "avx")] F32x4 => F64x4, _mm256_cvtps_pd);
convert!(#[cfg(simd_tier = "avx")] F64x4 => F32x4, _mm256_cvtpd_ps);
convert!(#[cfg(simd_tier = "avx")] F64x4 => I32x4, _mm256_cvtpd_epi32);
convert!(#[cfg(simd_tier = "avx2")] I32x8 => F32x8, _mm256_cvtepi32_ps);
convert!(#[cfg(simd_tier = "avx2")] F32x8 => I32x8, _mm256_cvtps_epi32);
convert!(#[cfg(simd_tier = "avx2")] I32x4 => I64x4, _mm256_cvtepi32_epi64);

#[cfg(all(test, simd_tier = "sse2"))]
mod tests {
    use super::*;
    use crate::backend::scalar::ScalarVec;

    const F32_LANES: [[f32; 8]; 2] = [
        [1.5, -0.0, f32::NAN, 3.0e38, -7.25, 0.0, f32::INFINITY, -1.0],
        [0.0, 0.0, 2.0, 3.0e38, -7.25, -0.0, f32::NAN, 1.0e-40],
    ];
    const F64_LANES: [[f64; 8]; 2] = [
        [1.5, -0.0, f64::NAN, 1.0e308, -7.25, 0.0, f64::INFINITY, -1.0],
        [0.0, 0.0, 2.0, 1.0e308, -7.25, -0.0, f64::NAN, 1.0e-310],
    ];
    const I32_LANES: [[i32; 8]; 2] = [
        [i32::MIN, 7, -7, 0, i32::MAX, -1, 100, 65_536],
        [-1, 0, 2, 0, 1, i32::MIN, -100, 65_536],
    ];
    const I64_LANES: [[i64; 8]; 2] = [
        [i64::MIN, 7, -7, 0, i64::MAX, -1, 100, 1 << 40],
        [-1, 0, 2, 0, 1, i64::MIN, -100, 1 << 33],
    ];

    fn take<T: Copy, const W: usize>(lanes: [T; 8]) -> [T; W] {
        core::array::from_fn(|i| lanes[i])
    }

    fn same_lanes<T: Element, const W: usize>(op: &str, native: [T; W], scalar: [T; W]) {
        for i in 0..W {
            let (n, s) = (native[i], scalar[i]);
            let both_nan = n.partial_cmp(&n).is_none() && s.partial_cmp(&s).is_none();
            assert!(
                n.to_bits() == s.to_bits() || both_nan,
                "{} lane {}: {:?} vs {:?}",
                op,
                i,
                native,
                scalar
            );
        }
    }

    /// Runs every `Register` operation on both orders of the operands.
    fn matches_scalar<R: Register<W>, const W: usize>(lanes: [[R::Lane; 8]; 2]) {
        for (a, b) in [(lanes[0], lanes[1]), (lanes[1], lanes[0])] {
            let (a, b) = (take::<_, W>(a), take::<_, W>(b));
            let (na, nb) = (R::from_array(a), R::from_array(b));
            let (sa, sb) = (ScalarVec(a), ScalarVec(b));
            macro_rules! binary {
                ($($op:ident)*) => {$(
                    same_lanes(stringify!($op), na.$op(nb).to_array(), sa.$op(sb).to_array());
                )*};
            }
            binary!(add sub mul div and or xor andnot pair_add pair_sub);
            same_lanes("not", na.not().to_array(), sa.not().to_array());
            same_lanes("reduce_add", [na.reduce_add()], [sa.reduce_add()]);
            same_lanes("reduce_sub", [na.reduce_sub()], [sa.reduce_sub()]);
            assert_eq!(na.bitmask(), sa.bitmask(), "bitmask of {:?}", a);
        }
    }

    fn compares_like_scalar<R: Register<W> + Compare<W>, const W: usize>(lanes: [[R::Lane; 8]; 2]) {
        for (a, b) in [(lanes[0], lanes[1]), (lanes[1], lanes[0]), (lanes[0], lanes[0])] {
            let (a, b) = (take::<_, W>(a), take::<_, W>(b));
            let (na, nb) = (R::from_array(a), R::from_array(b));
            let (sa, sb) = (ScalarVec(a), ScalarVec(b));
            macro_rules! compare {
                ($($op:ident)*) => {$(
                    same_lanes(stringify!($op), na.$op(nb).to_array(), sa.$op(sb).to_array());
                )*};
            }
            compare!(cmp_eq cmp_ne cmp_lt cmp_le cmp_gt cmp_ge);
        }
    }

    #[test]
    fn test_sse_registers_match_scalar() {
        matches_scalar::<F32x4, 4>(F32_LANES);
        matches_scalar::<F64x2, 2>(F64_LANES);
        matches_scalar::<I32x4, 4>(I32_LANES);
        matches_scalar::<I64x2, 2>(I64_LANES);
        compares_like_scalar::<F32x4, 4>(F32_LANES);
        compares_like_scalar::<F64x2, 2>(F64_LANES);
        compares_like_scalar::<I32x4, 4>(I32_LANES);
    }

    #[cfg(simd_tier = "sse4.2")]
    #[test]
    fn test_i64x2_compare_matches_scalar() {
        compares_like_scalar::<I64x2, 2>(I64_LANES);
    }

    #[cfg(simd_tier = "avx")]
    #[test]
    fn test_avx_registers_match_scalar() {
        matches_scalar::<F32x8, 8>(F32_LANES);
        matches_scalar::<F64x4, 4>(F64_LANES);
        compares_like_scalar::<F32x8, 8>(F32_LANES);
        compares_like_scalar::<F64x4, 4>(F64_LANES);
    }

    #[cfg(simd_tier = "avx2")]
    #[test]
    fn test_avx2_registers_match_scalar() {
        matches_scalar::<I32x8, 8>(I32_LANES);
        matches_scalar::<I64x4, 4>(I64_LANES);
        compares_like_scalar::<I32x8, 8>(I32_LANES);
        compares_like_scalar::<I64x4, 4>(I64_LANES);
    }

    #[test]
    fn test_sse2_registers_carry_registry_tier() {
        use crate::level::FeatureLevel;
        use crate::registry::Lanes;

        assert_eq!(<f32 as Lanes<4>>::REQUIRED, FeatureLevel::Sse);
        assert_eq!(<f64 as Lanes<2>>::REQUIRED, FeatureLevel::Sse2);
        assert_eq!(<i32 as Lanes<4>>::REQUIRED, FeatureLevel::Sse2);
        assert_eq!(<i64 as Lanes<2>>::REQUIRED, FeatureLevel::Sse2);
        let f: F32x4 = I32x4::from_array([1, -2, 3, -4]).convert();
        assert_eq!(f.to_array(), [1.0, -2.0, 3.0, -4.0]);
    }

    #[test]
    fn test_f32x4_arithmetic() {
        let a = F32x4::from_array([1.0, 2.0, -3.0, 4.0]);
        let b = F32x4::from_array([-5.0, -6.0, 7.0, 8.0]);
        assert_eq!(a.add(b).to_array(), [-4.0, -4.0, 4.0, 12.0]);
        assert_eq!(a.sub(b).to_array(), [6.0, 8.0, -10.0, -4.0]);
        assert_eq!(a.mul(b).to_array(), [-5.0, -12.0, -21.0, 32.0]);
        assert_eq!(a.div(b).to_array(), [1.0 / -5.0, 2.0 / -6.0, -3.0 / 7.0, 0.5]);
    }

    #[test]
    fn test_f32x4_movemask() {
        let v = F32x4::from_array([-1.0, 2.0, -0.0, 4.0]);
        assert_eq!(v.bitmask(), 0b0101);
    }

    #[test]
    fn test_i32x4_mul_wraps_like_scalar() {
        let a = [i32::MAX, -7, 65_536, 3];
        let b = [2, 9, 65_536, -11];
        let native = I32x4::from_array(a).mul(I32x4::from_array(b));
        let scalar = ScalarVec(a).mul(ScalarVec(b));
        assert_eq!(native.to_array(), scalar.to_array());
    }

    #[test]
    fn test_i32x4_div_matches_scalar() {
        let a = [7, -7, i32::MIN, 2_000_000_011];
        let b = [2, 2, -1, 0];
        let native = I32x4::from_array(a).div(I32x4::from_array(b));
        assert_eq!(native.to_array(), [3, -3, i32::MIN, i32::MIN]);
        assert_eq!(native.to_array(), ScalarVec(a).div(ScalarVec(b)).to_array());
    }

    #[test]
    fn test_i32x4_shifts() {
        let v = I32x4::from_array([1, -8, 1024, i32::MIN]);
        assert_eq!(v.shl(2).to_array(), [4, -32, 4096, 0]);
        assert_eq!(v.shr(2).to_array(), [0, -2, 256, i32::MIN >> 2]);
        assert_eq!(v.shr(40).to_array(), [0, -1, 0, -1]);
        assert_eq!(v.shl(32).to_array(), [0; 4]);
    }

    #[test]
    fn test_i64x2_fallbacks() {
        let a = I64x2::from_array([i64::MIN, 12]);
        let b = I64x2::from_array([-1, 0]);
        assert_eq!(a.div(b).to_array(), [i64::MIN, i64::MIN]);
        assert_eq!(a.mul(b).to_array(), [i64::MIN, 0]);
        assert_eq!(a.shr(3).to_array(), [i64::MIN >> 3, 1]);
        assert_eq!(a.shl(1).to_array(), [0, 24]);
        assert_eq!(a.pair_add(b).to_array(), [i64::MIN + 12, -1]);
    }

    #[test]
    fn test_f32x4_reductions_use_pair_tree() {
        let v = F32x4::from_array([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.reduce_add(), 10.0);
        assert_eq!(v.reduce_sub(), 0.0);
        let w = F32x4::from_array([10.0, 20.0, 30.0, 40.0]);
        assert_eq!(v.pair_add(w).to_array(), [3.0, 7.0, 30.0, 70.0]);
        assert_eq!(v.pair_sub(w).to_array(), [-1.0, -1.0, -10.0, -10.0]);
    }

    #[test]
    fn test_i32x4_compare_derived_predicates() {
        let a = I32x4::from_array([1, 5, 3, 7]);
        let b = I32x4::from_array([2, 5, 1, 9]);
        assert_eq!(a.cmp_ne(b).bitmask(), 0b1101);
        assert_eq!(a.cmp_le(b).bitmask(), 0b1011);
        assert_eq!(a.cmp_ge(b).bitmask(), 0b0110);
    }

    #[test]
    fn test_select_takes_true_lanes() {
        let mask = F64x2::from_array([f64::from_bits(!0), 0.0]);
        let t = F64x2::splat(1.0);
        let f = F64x2::splat(2.0);
        assert_eq!(<F64x2 as Register<2>>::select(mask, t, f).to_array(), [1.0, 2.0]);
    }

    #[test]
    fn test_f32x4_to_i32x4_rounds_half_even() {
        let v = F32x4::from_array([0.5, 1.5, -2.5, f32::NAN]);
        let i: I32x4 = v.convert();
        assert_eq!(i.to_array(), [0, 2, -2, i32::MIN]);
    }

    #[test]
    fn test_debug_shows_lanes() {
        let v = I32x4::from_array([1, 2, 3, 4]);
        assert_eq!(format!("{:?}", v), "I32x4([1, 2, 3, 4])");
    }

    #[cfg(simd_tier = "avx2")]
    #[test]
    fn test_i32x8_div_matches_scalar() {
        let a = [100, -100, 7, 0, i32::MIN, 9, -9, 1];
        let b = [3, 3, 0, 5, -1, -2, -2, 1];
        let native = I32x8::from_array(a).div(I32x8::from_array(b));
        assert_eq!(native.to_array(), ScalarVec(a).div(ScalarVec(b)).to_array());
    }
}
