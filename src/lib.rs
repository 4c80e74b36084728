//! Portable SIMD vectors.
//!
//! `Vector<T, W>` holds `W` lanes of `T` in one native SIMD register. The
//! register is chosen at compile time from the tier the crate is built for
//! (see [`FeatureLevel::current`]), so every operation compiles down to the
//! tier's instructions with no run-time dispatch. Types and operations the
//! build tier does not provide are simply absent and fail to compile.
//!
//! ```
//! use pixelflow_simd::Vector;
//!
//! let a = Vector::<f32, 4>::from_array([1.0, 2.0, -3.0, 4.0]);
//! let b = Vector::<f32, 4>::from_array([-5.0, -6.0, 7.0, 8.0]);
//! assert_eq!((a + b).to_array(), [-4.0, -4.0, 4.0, 12.0]);
//! assert_eq!(a.horizontal_sum(), 4.0);
//! ```
//!
//! Builds for targets without x86_64 SIMD, or with `PIXELFLOW_SIMD_EMULATE`
//! set at build time, use a plain array backend with the same semantics.

pub mod backend;
pub mod config;
pub mod convert;
pub mod element;
pub mod error;
pub mod level;
pub mod mask;
pub mod registry;
pub mod report;
pub mod runtime;
pub mod storage;
pub mod vector;

pub use element::{Element, Float, Integer};
pub use error::SimdError;
pub use level::FeatureLevel;
pub use mask::Mask;
pub use registry::{spec_of, Lanes, VectorSpec};
pub use runtime::{probe_runtime_level, CpuFeatures, RuntimeInfo};
pub use storage::{is_aligned_for, Aligned};
pub use vector::Vector;

// Short names for the registered shapes.

#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "sse"))]
pub type f32x4 = Vector<f32, 4>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "sse2"))]
pub type f64x2 = Vector<f64, 2>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "sse2"))]
pub type i32x4 = Vector<i32, 4>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "sse2"))]
pub type i64x2 = Vector<i64, 2>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "avx"))]
pub type f32x8 = Vector<f32, 8>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "avx"))]
pub type f64x4 = Vector<f64, 4>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "avx2"))]
pub type i32x8 = Vector<i32, 8>;
#[allow(non_camel_case_types)]
#[cfg(any(simd_emulated, simd_tier = "avx2"))]
pub type i64x4 = Vector<i64, 4>;
