//! Array backend for targets without a native one.
//!
//! `ScalarVec<T, W>` is a plain `[T; W]` and implements every capability by
//! applying the [`Element`] scalar semantics lane by lane. It is the backend
//! of emulated builds and the reference the native registers are tested
//! against.

use super::{
    map_lanes, zip_lanes, Abs, Compare, Convert, FloatMath, MinMax, Register, Rounding, Shift,
};
use crate::element::{Element, Float, Integer, LaneCast};

/// `W` lanes of `T` in a plain array.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct ScalarVec<T, const W: usize>(pub [T; W]);

impl<T: Element, const W: usize> Default for ScalarVec<T, W> {
    fn default() -> Self {
        Self([T::ZERO; W])
    }
}

#[inline(always)]
fn zip_bits<T: Element, const W: usize>(
    a: ScalarVec<T, W>,
    b: ScalarVec<T, W>,
    op: impl Fn(u64, u64) -> u64,
) -> ScalarVec<T, W> {
    zip_lanes::<_, W>(a, b, |x, y| T::from_bits(op(x.to_bits(), y.to_bits())))
}

#[inline(always)]
fn zip_test<T: Element, const W: usize>(
    a: ScalarVec<T, W>,
    b: ScalarVec<T, W>,
    test: impl Fn(T, T) -> bool,
) -> ScalarVec<T, W> {
    zip_lanes::<_, W>(a, b, |x, y| if test(x, y) { T::all_ones() } else { T::ZERO })
}

// ============================================================================
// Register
// ============================================================================

unsafe impl<T: Element, const W: usize> Register<W> for ScalarVec<T, W> {
    type Lane = T;
    const NATIVE: &'static str = "array";

    #[inline(always)]
    fn splat(value: T) -> Self {
        Self([value; W])
    }

    #[inline(always)]
    fn from_array(lanes: [T; W]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    fn to_array(self) -> [T; W] {
        self.0
    }

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        unsafe { Self(core::ptr::read_unaligned(ptr as *const [T; W])) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        unsafe { Self(core::ptr::read(ptr as *const [T; W])) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        zip_lanes::<_, W>(self, rhs, T::lane_add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        zip_lanes::<_, W>(self, rhs, T::lane_sub)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        zip_lanes::<_, W>(self, rhs, T::lane_mul)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        zip_lanes::<_, W>(self, rhs, T::lane_div)
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        zip_bits(self, rhs, |a, b| a & b)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        zip_bits(self, rhs, |a, b| a | b)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        zip_bits(self, rhs, |a, b| a ^ b)
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        zip_bits(self, rhs, |a, b| !a & b)
    }

    #[inline(always)]
    fn not(self) -> Self {
        map_lanes::<_, W>(self, |x| T::from_bits(!x.to_bits()))
    }

    #[inline(always)]
    fn bitmask(self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .fold(0, |bits, (i, lane)| bits | ((lane.sign_bit() as u32) << i))
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl<T: Element, const W: usize> Compare<W> for ScalarVec<T, W> {
    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        zip_test(self, rhs, |a, b| a == b)
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self {
        zip_test(self, rhs, |a, b| a != b)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        zip_test(self, rhs, |a, b| a < b)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        zip_test(self, rhs, |a, b| a <= b)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        zip_test(self, rhs, |a, b| a > b)
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        zip_test(self, rhs, |a, b| a >= b)
    }
}

impl<T: Element, const W: usize> MinMax<W> for ScalarVec<T, W> {
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        zip_lanes::<_, W>(self, rhs, T::lane_min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        zip_lanes::<_, W>(self, rhs, T::lane_max)
    }
}

impl<T: Element, const W: usize> Abs<W> for ScalarVec<T, W> {
    #[inline(always)]
    fn abs(self) -> Self {
        map_lanes::<_, W>(self, T::lane_abs)
    }
}

impl<T: Float, const W: usize> FloatMath<W> for ScalarVec<T, W> {
    #[inline(always)]
    fn sqrt(self) -> Self {
        map_lanes::<_, W>(self, T::lane_sqrt)
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        map_lanes::<_, W>(self, T::lane_rsqrt)
    }
}

impl<T: Float, const W: usize> Rounding<W> for ScalarVec<T, W> {
    #[inline(always)]
    fn ceil(self) -> Self {
        map_lanes::<_, W>(self, T::lane_ceil)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        map_lanes::<_, W>(self, T::lane_floor)
    }

    #[inline(always)]
    fn round(self) -> Self {
        map_lanes::<_, W>(self, T::lane_round)
    }
}

impl<T: Integer, const W: usize> Shift<W> for ScalarVec<T, W> {
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        map_lanes::<_, W>(self, |x| x.lane_shl(count))
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        map_lanes::<_, W>(self, |x| x.lane_shr(count))
    }
}

impl<S, D, const W: usize> Convert<ScalarVec<D, W>> for ScalarVec<S, W>
where
    S: LaneCast<D>,
    D: Element,
{
    #[inline(always)]
    fn convert(self) -> ScalarVec<D, W> {
        ScalarVec(self.0.map(<S as LaneCast<D>>::cast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = ScalarVec([1.0f32, 2.0, -3.0, 4.0]);
        let b = ScalarVec([-5.0f32, -6.0, 7.0, 8.0]);
        assert_eq!(a.add(b).to_array(), [-4.0, -4.0, 4.0, 12.0]);
        assert_eq!(a.mul(b).to_array(), [-5.0, -12.0, -21.0, 32.0]);
    }

    #[test]
    fn test_compare_produces_full_lanes() {
        let a = ScalarVec([1i32, 5, 3, 7]);
        let b = ScalarVec([2i32, 5, 1, 9]);
        assert_eq!(a.cmp_lt(b).to_array(), [-1, 0, 0, -1]);
        assert_eq!(a.cmp_eq(b).bitmask(), 0b0010);
    }

    #[test]
    fn test_float_ne_is_unordered() {
        let a = ScalarVec([f64::NAN, 1.0]);
        let b = ScalarVec([f64::NAN, 1.0]);
        assert_eq!(a.cmp_ne(b).bitmask(), 0b01);
        assert_eq!(a.cmp_eq(b).bitmask(), 0b10);
    }

    #[test]
    fn test_select_and_bit_ops() {
        let mask = ScalarVec([-1i64, 0]);
        let t = ScalarVec([10i64, 20]);
        let f = ScalarVec([30i64, 40]);
        assert_eq!(Register::select(mask, t, f).to_array(), [10, 40]);
        assert_eq!(mask.not().to_array(), [0, -1]);
        assert_eq!(mask.andnot(t).to_array(), [0, 20]);
    }

    #[test]
    fn test_load_unaligned() {
        let data = [0i32, 1, 2, 3, 4, 5];
        let v: ScalarVec<i32, 4> = unsafe { Register::load(data.as_ptr().add(1)) };
        assert_eq!(v.to_array(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_convert() {
        let v = ScalarVec([1.5f32, 2.5, -0.5, 1e10]);
        let i: ScalarVec<i32, 4> = v.convert();
        assert_eq!(i.to_array(), [2, 2, 0, i32::MIN]);
    }
}
