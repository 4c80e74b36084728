//! Register / lane-array aliasing.
//!
//! A vector's register and its `[T; W]` lane array are two views of the same
//! bits. The registry guarantees the register has the array's size and at
//! least its alignment, so a reference to one can be reinterpreted as a
//! reference to the other.

use crate::registry::Lanes;
use crate::vector::Vector;
use std::ops::{Deref, DerefMut, Index, IndexMut};

impl<T, const W: usize> Vector<T, W>
where
    T: Lanes<W>,
{
    /// The lanes, viewed in place.
    #[inline(always)]
    pub fn as_array(&self) -> &[T; W] {
        // SAFETY: `Register` guarantees the layout of `[T; W]`.
        unsafe { &*(&self.0 as *const T::Register as *const [T; W]) }
    }

    /// The lanes, mutable in place. Writes are visible to the register view.
    #[inline(always)]
    pub fn as_mut_array(&mut self) -> &mut [T; W] {
        // SAFETY: as above; every bit pattern is a valid `T`.
        unsafe { &mut *(&mut self.0 as *mut T::Register as *mut [T; W]) }
    }
}

impl<T, const W: usize> Index<usize> for Vector<T, W>
where
    T: Lanes<W>,
{
    type Output = T;

    #[inline(always)]
    fn index(&self, lane: usize) -> &T {
        debug_assert!(lane < W, "lane {} out of range for a {}-lane vector", lane, W);
        &self.as_array()[lane]
    }
}

impl<T, const W: usize> IndexMut<usize> for Vector<T, W>
where
    T: Lanes<W>,
{
    #[inline(always)]
    fn index_mut(&mut self, lane: usize) -> &mut T {
        debug_assert!(lane < W, "lane {} out of range for a {}-lane vector", lane, W);
        &mut self.as_mut_array()[lane]
    }
}

/// True if `ptr` is aligned for `A`.
#[inline(always)]
pub fn is_aligned_for<A, T>(ptr: *const T) -> bool {
    (ptr as usize) % std::mem::align_of::<A>() == 0
}

/// A buffer aligned for any register, for [`Vector::load_aligned`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C, align(32))]
pub struct Aligned<A>(pub A);

impl<A> Deref for Aligned<A> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.0
    }
}

impl<A> DerefMut for Aligned<A> {
    fn deref_mut(&mut self) -> &mut A {
        &mut self.0
    }
}
