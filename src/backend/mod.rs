//! Native register backends.
//!
//! A backend supplies one register type per supported (lane type, width)
//! pair. [`Register`] is the contract every register meets; the remaining
//! traits are capabilities. A register only implements a capability when the
//! operation has an instruction (or an exact fallback) at the build tier, so
//! calling it on a type that lacks it is a compile error rather than a
//! run-time failure.

use crate::element::Element;

pub mod scalar;
#[cfg(all(target_arch = "x86_64", not(simd_emulated)))]
pub mod x86;

// ============================================================================
// Register
// ============================================================================

/// A native register holding `W` lanes of [`Register::Lane`].
///
/// # Safety
///
/// Implementors must have exactly the size of `[Self::Lane; W]` and at least
/// its alignment, and their bits must be laid out as that array: lane `i`
/// at byte offset `i * size_of::<Lane>()`. Vectors reinterpret a register as
/// its lane array in place.
pub unsafe trait Register<const W: usize>: Copy + Send + Sync + 'static {
    type Lane: Element;

    /// Name of the native representation, for reports.
    const NATIVE: &'static str;

    /// Broadcasts one value to every lane.
    fn splat(value: Self::Lane) -> Self;

    fn from_array(lanes: [Self::Lane; W]) -> Self;

    fn to_array(self) -> [Self::Lane; W];

    /// Loads `W` lanes from an unaligned pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `W` lanes.
    unsafe fn load(ptr: *const Self::Lane) -> Self;

    /// Loads `W` lanes from a pointer aligned to `align_of::<Self>()`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `W` lanes and suitably aligned.
    unsafe fn load_aligned(ptr: *const Self::Lane) -> Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Self;

    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    /// `!self & rhs`.
    fn andnot(self, rhs: Self) -> Self;
    fn not(self) -> Self;

    /// Sign bit of every lane, lane 0 in bit 0.
    fn bitmask(self) -> u32;

    /// Per-lane `mask ? if_true : if_false`. Mask lanes must be all-ones or
    /// all-zeros.
    #[inline(always)]
    fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        mask.and(if_true).or(mask.andnot(if_false))
    }

    /// `[a0+a1, a2+a3, .., b0+b1, b2+b3, ..]`.
    #[inline(always)]
    fn pair_add(self, rhs: Self) -> Self {
        Self::from_array(pairwise(
            self.to_array(),
            rhs.to_array(),
            <Self::Lane as Element>::lane_add,
        ))
    }

    /// `[a0-a1, a2-a3, .., b0-b1, b2-b3, ..]`.
    #[inline(always)]
    fn pair_sub(self, rhs: Self) -> Self {
        Self::from_array(pairwise(
            self.to_array(),
            rhs.to_array(),
            <Self::Lane as Element>::lane_sub,
        ))
    }

    /// Sum of all lanes, folded as `(a0+a1)+(a2+a3)` and so on.
    #[inline(always)]
    fn reduce_add(self) -> Self::Lane {
        fold_pairs(self.to_array(), <Self::Lane as Element>::lane_add)
    }

    /// `(a0-a1)-(a2-a3)` and so on.
    #[inline(always)]
    fn reduce_sub(self) -> Self::Lane {
        fold_pairs(self.to_array(), <Self::Lane as Element>::lane_sub)
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Lane-wise comparisons producing all-ones / all-zeros lanes.
///
/// Float `cmp_ne` is unordered: NaN compares unequal to everything. The other
/// float predicates are ordered.
pub trait Compare<const W: usize>: Register<W> {
    fn cmp_eq(self, rhs: Self) -> Self;
    fn cmp_ne(self, rhs: Self) -> Self;
    fn cmp_lt(self, rhs: Self) -> Self;
    fn cmp_le(self, rhs: Self) -> Self;
    fn cmp_gt(self, rhs: Self) -> Self;
    fn cmp_ge(self, rhs: Self) -> Self;
}

/// Lane-wise minimum and maximum with the hardware NaN rule.
pub trait MinMax<const W: usize>: Register<W> {
    fn min(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;
}

pub trait Abs<const W: usize>: Register<W> {
    fn abs(self) -> Self;
}

/// Float-only lane math.
pub trait FloatMath<const W: usize>: Register<W> {
    fn sqrt(self) -> Self;
    /// Reciprocal square root; approximate where the hardware has a fast form.
    fn rsqrt(self) -> Self;
}

/// Float rounding to integral values.
pub trait Rounding<const W: usize>: Register<W> {
    fn ceil(self) -> Self;
    fn floor(self) -> Self;
    /// Round half to even.
    fn round(self) -> Self;
}

/// Integer lane shifts by a shared count.
pub trait Shift<const W: usize>: Register<W> {
    fn shl(self, count: u32) -> Self;
    /// Arithmetic (sign-filling) right shift.
    fn shr(self, count: u32) -> Self;
}

/// Lane-preserving conversion into another register.
pub trait Convert<Dst> {
    fn convert(self) -> Dst;
}

// ============================================================================
// Lane helpers
// ============================================================================

#[inline(always)]
pub(crate) fn map_lanes<R: Register<W>, const W: usize>(
    a: R,
    op: impl Fn(R::Lane) -> R::Lane,
) -> R {
    R::from_array(a.to_array().map(op))
}

#[inline(always)]
pub(crate) fn zip_lanes<R: Register<W>, const W: usize>(
    a: R,
    b: R,
    op: impl Fn(R::Lane, R::Lane) -> R::Lane,
) -> R {
    let a = a.to_array();
    let b = b.to_array();
    R::from_array(core::array::from_fn(|i| op(a[i], b[i])))
}

#[inline(always)]
fn pairwise<T: Element, const W: usize>(
    a: [T; W],
    b: [T; W],
    op: impl Fn(T, T) -> T,
) -> [T; W] {
    let half = W / 2;
    core::array::from_fn(|i| {
        let (src, j) = if i < half { (&a, i) } else { (&b, i - half) };
        op(src[2 * j], src[2 * j + 1])
    })
}

#[inline(always)]
fn fold_pairs<T: Element, const W: usize>(lanes: [T; W], op: impl Fn(T, T) -> T) -> T {
    let mut buf = lanes;
    let mut len = W;
    while len > 1 {
        for i in 0..len / 2 {
            buf[i] = op(buf[2 * i], buf[2 * i + 1]);
        }
        len /= 2;
    }
    buf[0]
}
