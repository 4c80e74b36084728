//! Conversions between vector types.
//!
//! Each edge is an explicit `From` impl that keeps the lane count. An edge is
//! only present when the tier provides a native instruction for it; there is
//! no chaining through intermediate types.
//!
//! Float to integer conversions round half to even. NaN and out-of-range
//! lanes become `i32::MIN`.

use crate::backend::Convert;
use crate::vector::Vector;

macro_rules! conversions {
    ($($(#[$attr:meta])* [$from:ty; $lanes:literal] => $to:ty;)*) => {
        $(
            $(#[$attr])*
            impl From<Vector<$from, $lanes>> for Vector<$to, $lanes> {
                #[inline(always)]
                fn from(vector: Vector<$from, $lanes>) -> Self {
                    Vector(Convert::convert(vector.0))
                }
            }
        )*
    };
}

conversions! {
    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    [i32; 4] => f32;
    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    [f32; 4] => i32;
    #[cfg(any(simd_emulated, simd_tier = "avx"))]
    [i32; 4] => f64;
    #[cfg(any(simd_emulated, simd_tier = "avx"))]
    [f32; 4] => f64;
    #[cfg(any(simd_emulated, simd_tier = "avx"))]
    [f64; 4] => f32;
    #[cfg(any(simd_emulated, simd_tier = "avx"))]
    [f64; 4] => i32;
    #[cfg(any(simd_emulated, simd_tier = "avx2"))]
    [i32; 8] => f32;
    #[cfg(any(simd_emulated, simd_tier = "avx2"))]
    [f32; 8] => i32;
    #[cfg(any(simd_emulated, simd_tier = "avx2"))]
    [i32; 4] => i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    #[test]
    fn test_int_float_round_trip_is_exact_for_integral_values() {
        let ints = Vector::<i32, 4>::from_array([1, -2, 16_777_216, -100]);
        let floats = Vector::<f32, 4>::from(ints);
        assert_eq!(floats.to_array(), [1.0, -2.0, 16_777_216.0, -100.0]);
        assert_eq!(Vector::<i32, 4>::from(floats), ints);
    }

    #[cfg(any(simd_emulated, simd_tier = "avx"))]
    #[test]
    fn test_widening_to_f64() {
        let f = Vector::<f32, 4>::from_array([0.5, -1.25, 3.0, 1e-3]);
        let d = Vector::<f64, 4>::from(f);
        assert_eq!(d.to_array(), [0.5, -1.25, 3.0, 1e-3f32 as f64]);
        let i = Vector::<i32, 4>::from(Vector::<f64, 4>::from_array([2.5, 3.5, -0.5, f64::NAN]));
        assert_eq!(i.to_array(), [2, 4, 0, i32::MIN]);
    }

    #[cfg(any(simd_emulated, simd_tier = "avx2"))]
    #[test]
    fn test_sign_extension() {
        let v = Vector::<i32, 4>::from_array([-1, 2, i32::MIN, i32::MAX]);
        let w = Vector::<i64, 4>::from(v);
        assert_eq!(w.to_array(), [-1, 2, i32::MIN as i64, i32::MAX as i64]);
    }
}
