//! Lane masks.
//!
//! A [`Mask<T, W>`] has the physical layout of `Vector<T, W>` with every lane
//! either all bits set (true) or all bits clear (false). Comparison results
//! convert into masks, and masks drive [`Vector::select`].

use crate::backend::Register;
use crate::registry::Lanes;
use crate::vector::Vector;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A per-lane boolean over `W` lanes of `T`.
#[repr(transparent)]
pub struct Mask<T, const W: usize>(pub(crate) T::Register)
where
    T: Lanes<W>;

impl<T, const W: usize> Mask<T, W>
where
    T: Lanes<W>,
{
    /// Bitmask with all `W` lanes set.
    const FULL: u32 = ((1u64 << W) - 1) as u32;

    #[inline(always)]
    fn lane(value: bool) -> T {
        if value {
            T::all_ones()
        } else {
            T::ZERO
        }
    }

    /// Every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: bool) -> Self {
        Self(<T::Register as Register<W>>::splat(Self::lane(value)))
    }

    #[inline(always)]
    pub fn all_true() -> Self {
        Self::splat(true)
    }

    #[inline(always)]
    pub fn all_false() -> Self {
        Self::splat(false)
    }

    #[inline(always)]
    pub fn from_array(lanes: [bool; W]) -> Self {
        Self(<T::Register as Register<W>>::from_array(lanes.map(Self::lane)))
    }

    /// Reinterprets a vector whose lanes are all-ones or all-zeros.
    #[inline(always)]
    pub fn from_vector(vector: Vector<T, W>) -> Self {
        Self(vector.0)
    }

    /// The mask's bits as a vector.
    #[inline(always)]
    pub fn to_vector(self) -> Vector<T, W> {
        Vector(self.0)
    }

    /// One bit per lane, lane 0 in bit 0.
    #[inline(always)]
    pub fn bitmask(self) -> u32 {
        self.0.bitmask()
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        self.bitmask() == Self::FULL
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    pub fn none(self) -> bool {
        self.bitmask() == 0
    }

    /// Whether lane `lane` is set.
    ///
    /// # Panics
    ///
    /// If `lane >= W`.
    #[inline(always)]
    pub fn test(self, lane: usize) -> bool {
        assert!(lane < W, "lane {} out of range for a {}-lane mask", lane, W);
        (self.bitmask() >> lane) & 1 == 1
    }

    #[inline(always)]
    pub fn to_array(self) -> [bool; W] {
        let bits = self.bitmask();
        std::array::from_fn(|i| (bits >> i) & 1 == 1)
    }

    /// `!self & rhs`.
    #[inline(always)]
    pub fn andnot(self, rhs: Self) -> Self {
        Self(self.0.andnot(rhs.0))
    }

    /// Lanes where both masks agree.
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Self {
        let differ = <T::Register as Register<W>>::xor(self.0, rhs.0);
        Self(<T::Register as Register<W>>::not(differ))
    }

    /// Lanes where the masks differ.
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Self {
        Self(self.0.xor(rhs.0))
    }

    /// Per lane: `if_true` where set, `if_false` where clear.
    #[inline(always)]
    pub fn select(self, if_true: Vector<T, W>, if_false: Vector<T, W>) -> Vector<T, W> {
        Vector(<T::Register as Register<W>>::select(self.0, if_true.0, if_false.0))
    }
}

// ============================================================================
// Operators
// ============================================================================

macro_rules! mask_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $register_method:ident) => {
        impl<T, const W: usize> $op for Mask<T, W>
        where
            T: Lanes<W>,
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(<T::Register as Register<W>>::$register_method(self.0, rhs.0))
            }
        }

        impl<T, const W: usize> $assign for Mask<T, W>
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

mask_op!(BitAnd, bitand, BitAndAssign, bitand_assign, and);
mask_op!(BitOr, bitor, BitOrAssign, bitor_assign, or);
mask_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor);

impl<T, const W: usize> Not for Mask<T, W>
where
    T: Lanes<W>,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(<T::Register as Register<W>>::not(self.0))
    }
}

// ============================================================================
// Std traits
// ============================================================================

impl<T, const W: usize> Clone for Mask<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const W: usize> Copy for Mask<T, W> where T: Lanes<W> {}

impl<T, const W: usize> Default for Mask<T, W>
where
    T: Lanes<W>,
{
    fn default() -> Self {
        Self::all_false()
    }
}

impl<T, const W: usize> PartialEq for Mask<T, W>
where
    T: Lanes<W>,
{
    fn eq(&self, other: &Self) -> bool {
        self.bitmask() == other.bitmask()
    }
}

impl<T, const W: usize> Eq for Mask<T, W> where T: Lanes<W> {}

impl<T, const W: usize> From<Vector<T, W>> for Mask<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn from(vector: Vector<T, W>) -> Self {
        Self::from_vector(vector)
    }
}

impl<T, const W: usize> From<Mask<T, W>> for Vector<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn from(mask: Mask<T, W>) -> Self {
        mask.to_vector()
    }
}

impl<T, const W: usize> From<[bool; W]> for Mask<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn from(lanes: [bool; W]) -> Self {
        Self::from_array(lanes)
    }
}

/// Lanes as bits, lane 0 rightmost: `Mask(0101)`.
impl<T, const W: usize> fmt::Debug for Mask<T, W>
where
    T: Lanes<W>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({:0width$b})", self.bitmask(), width = W)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    #[test]
    fn test_from_array_round_trip() {
        let lanes = [true, false, false, true];
        let m = Mask::<i32, 4>::from_array(lanes);
        assert_eq!(m.to_array(), lanes);
        assert_eq!(m.bitmask(), 0b1001);
        assert!(m.test(3));
        assert!(!m.test(1));
        assert_eq!(m.to_vector().to_array(), [-1, 0, 0, -1]);
    }

    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    #[test]
    fn test_full_pattern_per_width() {
        assert_eq!(Mask::<f64, 2>::all_true().bitmask(), 0b11);
        assert!(Mask::<f32, 4>::all_true().all());
        assert!(Mask::<i64, 2>::all_false().none());
    }

    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    #[test]
    fn test_debug() {
        let m = Mask::<f32, 4>::from_array([true, false, true, false]);
        assert_eq!(format!("{:?}", m), "Mask(0101)");
    }

    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    #[test]
    #[should_panic(expected = "out of range")]
    fn test_lane_out_of_range() {
        Mask::<i32, 4>::all_true().test(4);
    }
}
