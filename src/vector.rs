//! `Vector<T, W>`: `W` lanes of `T` in the native register the registry
//! assigns to that pair.
//!
//! Everything here is generic over the registry entry. Operations that only
//! some registers provide are bounded on the matching capability trait, so
//! they are simply absent on types (or tiers) that lack them.

use crate::backend::{Abs, Compare, FloatMath, MinMax, Register, Rounding, Shift};
use crate::level::FeatureLevel;
use crate::mask::Mask;
use crate::registry::{spec_of, Lanes, VectorSpec};
use crate::storage::is_aligned_for;
use std::fmt;
use std::ops;

/// `W` lanes of `T` held in a native register.
///
/// Values are `Copy`; mutation goes through compound assignment, the
/// `*_in_place` transforms, or the lane views in [`crate::storage`].
#[repr(transparent)]
pub struct Vector<T, const W: usize>(pub(crate) T::Register)
where
    T: Lanes<W>;

// ============================================================================
// Construction and access
// ============================================================================

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
{
    pub const LANES: usize = W;

    /// Tier the type's register needs.
    pub const REQUIRED: FeatureLevel = T::REQUIRED;

    /// Registry entry for this type.
    pub fn spec() -> VectorSpec {
        spec_of::<T, W>()
    }

    /// Broadcasts `value` to every lane.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self(<T::Register as Register<W>>::splat(value))
    }

    #[inline(always)]
    pub fn from_array(lanes: [T; W]) -> Self {
        Self(<T::Register as Register<W>>::from_array(lanes))
    }

    #[inline(always)]
    pub fn from_register(register: T::Register) -> Self {
        Self(register)
    }

    #[inline(always)]
    pub fn register(self) -> T::Register {
        self.0
    }

    /// Loads the first `W` elements of `lanes`.
    ///
    /// # Panics
    ///
    /// If `lanes` is shorter than `W`.
    #[inline(always)]
    pub fn load(lanes: &[T]) -> Self {
        assert!(
            lanes.len() >= W,
            "load needs {} lanes, slice has {}",
            W,
            lanes.len()
        );
        unsafe { Self(<T::Register as Register<W>>::load(lanes.as_ptr())) }
    }

    /// Loads the first `W` elements of a register-aligned slice.
    ///
    /// # Panics
    ///
    /// If `lanes` is shorter than `W` or not aligned for the register.
    #[inline(always)]
    pub fn load_aligned(lanes: &[T]) -> Self {
        assert!(
            lanes.len() >= W,
            "load needs {} lanes, slice has {}",
            W,
            lanes.len()
        );
        assert!(
            is_aligned_for::<T::Register, T>(lanes.as_ptr()),
            "aligned load from {:p}, which is not {}-byte aligned",
            lanes.as_ptr(),
            std::mem::align_of::<T::Register>()
        );
        unsafe { Self(<T::Register as Register<W>>::load_aligned(lanes.as_ptr())) }
    }

    /// Loads `W` lanes from a raw pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `W` elements.
    #[inline(always)]
    pub unsafe fn load_ptr(ptr: *const T) -> Self {
        unsafe { Self(<T::Register as Register<W>>::load(ptr)) }
    }

    /// Loads `W` lanes from a register-aligned raw pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `W` elements and aligned to
    /// `align_of::<T::Register>()`.
    #[inline(always)]
    pub unsafe fn load_aligned_ptr(ptr: *const T) -> Self {
        unsafe { Self(<T::Register as Register<W>>::load_aligned(ptr)) }
    }

    /// Writes the lanes to the first `W` elements of `out`.
    ///
    /// # Panics
    ///
    /// If `out` is shorter than `W`.
    #[inline(always)]
    pub fn store(self, out: &mut [T]) {
        assert!(
            out.len() >= W,
            "store needs {} lanes, slice has {}",
            W,
            out.len()
        );
        out[..W].copy_from_slice(self.as_array());
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; W] {
        self.0.to_array()
    }

    /// Sign bit of every lane, lane 0 in bit 0.
    #[inline(always)]
    pub fn to_bitmask(self) -> u32 {
        self.0.bitmask()
    }

    /// `!self & rhs`, bitwise.
    #[inline(always)]
    pub fn andnot(self, rhs: Self) -> Self {
        Self(self.0.andnot(rhs.0))
    }

    /// `[a0+a1, a2+a3, .., b0+b1, b2+b3, ..]` for `a = self`, `b = rhs`.
    #[inline(always)]
    pub fn hadd(self, rhs: Self) -> Self {
        Self(self.0.pair_add(rhs.0))
    }

    /// `[a0-a1, a2-a3, .., b0-b1, b2-b3, ..]` for `a = self`, `b = rhs`.
    #[inline(always)]
    pub fn hsub(self, rhs: Self) -> Self {
        Self(self.0.pair_sub(rhs.0))
    }

    /// Sum of all lanes, folded pairwise: `(a0+a1)+(a2+a3)`.
    #[inline(always)]
    pub fn horizontal_sum(self) -> T {
        self.0.reduce_add()
    }

    /// Pairwise difference fold: `(a0-a1)-(a2-a3)`.
    #[inline(always)]
    pub fn horizontal_difference(self) -> T {
        self.0.reduce_sub()
    }

    /// Lanes of `primary` where `condition` is set, `alternate` elsewhere.
    ///
    /// `condition` lanes must be all-ones or all-zeros (a comparison result
    /// or a [`Mask`]); other patterns give unspecified lanes.
    #[inline(always)]
    pub fn select(primary: Self, alternate: Self, condition: impl Into<Mask<T, W>>) -> Self {
        condition.into().select(primary, alternate)
    }
}

// ============================================================================
// Capability-gated operations
// ============================================================================

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Compare<W>,
{
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Self {
        Self(self.0.cmp_eq(rhs.0))
    }

    /// Unordered on floats: NaN lanes compare unequal.
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Self {
        Self(self.0.cmp_ne(rhs.0))
    }

    #[inline(always)]
    pub fn cmp_lt(self, rhs: Self) -> Self {
        Self(self.0.cmp_lt(rhs.0))
    }

    #[inline(always)]
    pub fn cmp_le(self, rhs: Self) -> Self {
        Self(self.0.cmp_le(rhs.0))
    }

    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Self {
        Self(self.0.cmp_gt(rhs.0))
    }

    #[inline(always)]
    pub fn cmp_ge(self, rhs: Self) -> Self {
        Self(self.0.cmp_ge(rhs.0))
    }
}

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
    T::Register: MinMax<W>,
{
    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        Self(MinMax::min(self.0, rhs.0))
    }

    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        Self(MinMax::max(self.0, rhs.0))
    }
}

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Abs<W>,
{
    #[inline(always)]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline(always)]
    pub fn abs_in_place(&mut self) -> &mut Self {
        self.0 = self.0.abs();
        self
    }
}

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
    T::Register: FloatMath<W>,
{
    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(self.0.sqrt())
    }

    /// `1 / sqrt(x)`. Approximate (about 12 bits) on `f32` registers.
    #[inline(always)]
    pub fn rsqrt(self) -> Self {
        Self(self.0.rsqrt())
    }
}

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Rounding<W>,
{
    #[inline(always)]
    pub fn ceil(self) -> Self {
        Self(self.0.ceil())
    }

    #[inline(always)]
    pub fn floor(self) -> Self {
        Self(self.0.floor())
    }

    /// Round half to even.
    #[inline(always)]
    pub fn round(self) -> Self {
        Self(self.0.round())
    }

    #[inline(always)]
    pub fn ceil_in_place(&mut self) -> &mut Self {
        self.0 = self.0.ceil();
        self
    }

    #[inline(always)]
    pub fn floor_in_place(&mut self) -> &mut Self {
        self.0 = self.0.floor();
        self
    }

    #[inline(always)]
    pub fn round_in_place(&mut self) -> &mut Self {
        self.0 = self.0.round();
        self
    }
}

// ============================================================================
// Operators
// ============================================================================

macro_rules! binary_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $register_method:ident) => {
        impl<T, const W: usize> ops::$op for Vector<T, W>
        where
            T: Lanes<W>,
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(<T::Register as Register<W>>::$register_method(self.0, rhs.0))
            }
        }

        impl<T, const W: usize> ops::$assign for Vector<T, W>
        where
            T: Lanes<W>,
        {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                self.0 = <T::Register as Register<W>>::$register_method(self.0, rhs.0);
            }
        }
    };
}

binary_op!(Add, add, AddAssign, add_assign, add);
binary_op!(Sub, sub, SubAssign, sub_assign, sub);
binary_op!(Mul, mul, MulAssign, mul_assign, mul);
binary_op!(Div, div, DivAssign, div_assign, div);
binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, and);
binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, or);
binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor);

impl<T, const W: usize> ops::Not for Vector<T, W>
where
    T: Lanes<W>,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(<T::Register as Register<W>>::not(self.0))
    }
}

impl<T, const W: usize> ops::Shl<u32> for Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Shift<W>,
{
    type Output = Self;

    /// Logical left shift of every lane.
    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Self(self.0.shl(count))
    }
}

impl<T, const W: usize> ops::Shr<u32> for Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Shift<W>,
{
    type Output = Self;

    /// Arithmetic right shift of every lane.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Self(self.0.shr(count))
    }
}

impl<T, const W: usize> ops::ShlAssign<u32> for Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Shift<W>,
{
    #[inline(always)]
    fn shl_assign(&mut self, count: u32) {
        self.0 = self.0.shl(count);
    }
}

impl<T, const W: usize> ops::ShrAssign<u32> for Vector<T, W>
where
    T: Lanes<W>,
    T::Register: Shift<W>,
{
    #[inline(always)]
    fn shr_assign(&mut self, count: u32) {
        self.0 = self.0.shr(count);
    }
}

// ============================================================================
// Std traits
// ============================================================================

impl<T, const W: usize> Clone for Vector<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const W: usize> Copy for Vector<T, W> where T: Lanes<W> {}

impl<T, const W: usize> Default for Vector<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn default() -> Self {
        Self::splat(T::ZERO)
    }
}

/// Lane-wise equality of the lane values (so NaN lanes never compare equal).
impl<T, const W: usize> PartialEq for Vector<T, W>
where
    T: Lanes<W>,
{
    fn eq(&self, other: &Self) -> bool {
        self.as_array() == other.as_array()
    }
}

impl<T, const W: usize> From<[T; W]> for Vector<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn from(lanes: [T; W]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T, const W: usize> From<Vector<T, W>> for [T; W]
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn from(vector: Vector<T, W>) -> Self {
        vector.to_array()
    }
}

/// `(l0 l1 .. lW-1)`, each lane formatted with the caller's flags.
impl<T, const W: usize> fmt::Display for Vector<T, W>
where
    T: Lanes<W>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, lane) in self.as_array().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(lane, f)?;
        }
        f.write_str(")")
    }
}

impl<T, const W: usize> fmt::Debug for Vector<T, W>
where
    T: Lanes<W>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
