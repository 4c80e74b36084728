//! Vector type registry.
//!
//! Maps each supported `(lane type, width)` pair to the native register that
//! backs it and the tier it needs. A pair only has an entry when the build
//! tier provides it, so naming `Vector<f32, 8>` in a build below AVX fails to
//! compile (`f32: Lanes<8>` is not implemented). Every entry also checks its
//! own tier and layout at compile time.

use crate::backend::Register;
use crate::element::Element;
use crate::level::FeatureLevel;
use serde::Serialize;

/// The registry entry for `W` lanes of `Self`.
pub trait Lanes<const W: usize>: Element {
    /// Lowest tier providing the native register.
    const REQUIRED: FeatureLevel;
    /// The native register.
    type Register: Register<W, Lane = Self>;
}

/// Registry facts about one vector type, for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VectorSpec {
    pub element: &'static str,
    pub lanes: usize,
    pub required: FeatureLevel,
    pub native: &'static str,
}

/// Looks up the registry entry for `Vector<T, W>`.
pub fn spec_of<T, const W: usize>() -> VectorSpec
where
    T: Lanes<W>,
{
    VectorSpec {
        element: T::NAME,
        lanes: W,
        required: T::REQUIRED,
        native: <T::Register as Register<W>>::NATIVE,
    }
}

macro_rules! registry {
    ($($(#[$attr:meta])* [$lane:ty; $lanes:literal] => $register:ty, $level:ident;)*) => {
        $(
            $(#[$attr])*
            impl Lanes<$lanes> for $lane {
                const REQUIRED: FeatureLevel = FeatureLevel::$level;
                type Register = $register;
            }

            $(#[$attr])*
            const _: () = {
                assert!(
                    FeatureLevel::current().satisfies(FeatureLevel::$level),
                    concat!("[", stringify!($lane), "; ", stringify!($lanes), "] needs a higher tier")
                );
                assert!(core::mem::size_of::<$register>() == $lanes * core::mem::size_of::<$lane>());
                assert!(core::mem::align_of::<$register>() >= core::mem::align_of::<$lane>());
            };
        )*

        /// Every vector type registered at the build tier, narrowest first.
        pub fn available() -> Vec<VectorSpec> {
            let mut specs = Vec::new();
            $(
                $(#[$attr])*
                specs.push(spec_of::<$lane, $lanes>());
            )*
            specs
        }
    };
}

#[cfg(simd_tier = "sse")]
use crate::backend::x86;

#[cfg(simd_emulated)]
use crate::backend::scalar::ScalarVec;

registry! {
    #[cfg(simd_tier = "sse")]
    [f32; 4] => x86::F32x4, Sse;
    #[cfg(simd_tier = "sse2")]
    [f64; 2] => x86::F64x2, Sse2;
    #[cfg(simd_tier = "sse2")]
    [i32; 4] => x86::I32x4, Sse2;
    #[cfg(simd_tier = "sse2")]
    [i64; 2] => x86::I64x2, Sse2;
    #[cfg(simd_tier = "avx")]
    [f32; 8] => x86::F32x8, Avx;
    #[cfg(simd_tier = "avx")]
    [f64; 4] => x86::F64x4, Avx;
    #[cfg(simd_tier = "avx2")]
    [i32; 8] => x86::I32x8, Avx2;
    #[cfg(simd_tier = "avx2")]
    [i64; 4] => x86::I64x4, Avx2;

    #[cfg(simd_emulated)]
    [f32; 4] => ScalarVec<f32, 4>, None;
    #[cfg(simd_emulated)]
    [f64; 2] => ScalarVec<f64, 2>, None;
    #[cfg(simd_emulated)]
    [i32; 4] => ScalarVec<i32, 4>, None;
    #[cfg(simd_emulated)]
    [i64; 2] => ScalarVec<i64, 2>, None;
    #[cfg(simd_emulated)]
    [f32; 8] => ScalarVec<f32, 8>, None;
    #[cfg(simd_emulated)]
    [f64; 4] => ScalarVec<f64, 4>, None;
    #[cfg(simd_emulated)]
    [i32; 8] => ScalarVec<i32, 8>, None;
    #[cfg(simd_emulated)]
    [i64; 4] => ScalarVec<i64, 4>, None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_entries_are_within_build_tier() {
        let specs = available();
        assert!(!specs.is_empty());
        for spec in &specs {
            assert!(
                FeatureLevel::current().satisfies(spec.required),
                "{:?} exceeds {}",
                spec,
                FeatureLevel::current()
            );
        }
    }

    #[cfg(simd_tier = "sse2")]
    #[test]
    fn test_sse2_entries() {
        let spec = spec_of::<f64, 2>();
        assert_eq!(spec.required, FeatureLevel::Sse2);
        assert_eq!(spec.native, "__m128d");
        assert_eq!(spec.element, "f64");
        assert_eq!(spec_of::<f32, 4>().required, FeatureLevel::Sse);
        assert_eq!(spec_of::<i64, 2>().native, "__m128i");
    }

    #[cfg(simd_tier = "avx2")]
    #[test]
    fn test_avx2_entries() {
        assert_eq!(spec_of::<i32, 8>().required, FeatureLevel::Avx2);
        assert_eq!(spec_of::<f32, 8>().required, FeatureLevel::Avx);
        assert_eq!(available().len(), 8);
    }

    #[cfg(simd_emulated)]
    #[test]
    fn test_emulated_entries() {
        let specs = available();
        assert_eq!(specs.len(), 8);
        assert!(specs
            .iter()
            .all(|s| s.native == "array" && s.required == FeatureLevel::None));
    }

    #[test]
    fn test_spec_serializes() {
        let json = serde_json::to_value(spec_of::<f32, 4>()).unwrap();
        assert_eq!(json["element"], "f32");
        assert_eq!(json["lanes"], 4);
    }
}
