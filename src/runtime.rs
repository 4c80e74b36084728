//! Run-time CPU probing.
//!
//! [`probe_runtime_level`] asks the executing CPU which tiers it supports.
//! [`init`] records that answer, together with the build tier, once per
//! process; [`get`] reads it back.

use crate::level::FeatureLevel;
use bitflags::bitflags;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

bitflags! {
    /// SIMD extensions reported by the CPU.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CpuFeatures: u16 {
        const SSE = 1 << 0;
        const SSE2 = 1 << 1;
        const SSE3 = 1 << 2;
        const SSSE3 = 1 << 3;
        const SSE4_1 = 1 << 4;
        const SSE4_2 = 1 << 5;
        const AVX = 1 << 6;
        const FMA3 = 1 << 7;
        const AVX2 = 1 << 8;
    }
}

impl CpuFeatures {
    /// Flag that grants `level`, for every tier above `None`.
    pub fn for_level(level: FeatureLevel) -> Self {
        match level {
            FeatureLevel::None => Self::empty(),
            FeatureLevel::Sse => Self::SSE,
            FeatureLevel::Sse2 => Self::SSE2,
            FeatureLevel::Sse3 => Self::SSE3,
            FeatureLevel::Ssse3 => Self::SSSE3,
            FeatureLevel::Sse41 => Self::SSE4_1,
            FeatureLevel::Sse42 => Self::SSE4_2,
            FeatureLevel::Avx => Self::AVX,
            FeatureLevel::Fma3 => Self::FMA3,
            FeatureLevel::Avx2 => Self::AVX2,
        }
    }

    /// Queries the executing CPU.
    #[cfg(target_arch = "x86_64")]
    pub fn detect() -> Self {
        let mut features = Self::empty();
        features.set(Self::SSE, is_x86_feature_detected!("sse"));
        features.set(Self::SSE2, is_x86_feature_detected!("sse2"));
        features.set(Self::SSE3, is_x86_feature_detected!("sse3"));
        features.set(Self::SSSE3, is_x86_feature_detected!("ssse3"));
        features.set(Self::SSE4_1, is_x86_feature_detected!("sse4.1"));
        features.set(Self::SSE4_2, is_x86_feature_detected!("sse4.2"));
        features.set(Self::AVX, is_x86_feature_detected!("avx"));
        features.set(Self::FMA3, is_x86_feature_detected!("fma"));
        features.set(Self::AVX2, is_x86_feature_detected!("avx2"));
        features
    }

    /// Queries the executing CPU.
    #[cfg(not(target_arch = "x86_64"))]
    pub fn detect() -> Self {
        Self::empty()
    }

    /// Highest tier such that it and every tier below it are present.
    pub fn level(self) -> FeatureLevel {
        let mut level = FeatureLevel::None;
        for candidate in &FeatureLevel::ALL[1..] {
            if !self.contains(Self::for_level(*candidate)) {
                break;
            }
            level = *candidate;
        }
        level
    }

    /// Display names of the present flags, lowest first.
    pub fn names(self) -> Vec<&'static str> {
        FeatureLevel::ALL[1..]
            .iter()
            .filter(|level| self.contains(Self::for_level(**level)))
            .map(|level| level.name())
            .collect()
    }
}

/// The tier of the executing CPU. Pure; the result does not change during
/// the life of the process.
pub fn probe_runtime_level() -> FeatureLevel {
    CpuFeatures::detect().level()
}

/// Build tier and CPU tier, side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeInfo {
    pub compiled: FeatureLevel,
    pub detected: FeatureLevel,
    pub features: CpuFeatures,
}

impl RuntimeInfo {
    /// Probes the CPU now.
    pub fn probe() -> Self {
        let features = CpuFeatures::detect();
        Self {
            compiled: FeatureLevel::current(),
            detected: features.level(),
            features,
        }
    }

    /// Whether the CPU can run code built at the compiled tier.
    pub fn is_compatible(&self) -> bool {
        self.detected.satisfies(self.compiled)
    }
}

static RUNTIME: OnceCell<RuntimeInfo> = OnceCell::new();

/// Probes the CPU on first call and records the result for the process.
pub fn init() -> &'static RuntimeInfo {
    RUNTIME.get_or_init(|| {
        let info = RuntimeInfo::probe();
        info!(
            "SIMD tier: compiled {}, detected {}",
            info.compiled, info.detected
        );
        debug!("CPU features: {:?}", info.features.names());
        if !info.is_compatible() {
            warn!(
                "CPU tier {} is below the compiled tier {}; vector code may fault",
                info.detected, info.compiled
            );
        }
        info
    })
}

/// The recorded runtime info, if [`init`] has run.
pub fn get() -> Option<&'static RuntimeInfo> {
    RUNTIME.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_stops_at_first_gap() {
        let features = CpuFeatures::SSE | CpuFeatures::SSE2 | CpuFeatures::SSSE3;
        assert_eq!(features.level(), FeatureLevel::Sse2);
        assert_eq!(CpuFeatures::empty().level(), FeatureLevel::None);
        assert_eq!(CpuFeatures::all().level(), FeatureLevel::Avx2);
    }

    #[test]
    fn test_avx2_without_fma_caps_at_avx() {
        let features = CpuFeatures::all() - CpuFeatures::FMA3;
        assert_eq!(features.level(), FeatureLevel::Avx);
    }

    #[test]
    fn test_names() {
        let features = CpuFeatures::SSE | CpuFeatures::SSE4_1;
        assert_eq!(features.names(), vec!["SSE", "SSE4.1"]);
    }

    #[test]
    fn test_probe_is_stable() {
        assert_eq!(probe_runtime_level(), probe_runtime_level());
    }

    #[test_log::test]
    fn test_init_is_idempotent() {
        let first = init();
        let second = init();
        assert!(std::ptr::eq(first, second));
        assert_eq!(get(), Some(first));
        assert_eq!(first.compiled, FeatureLevel::current());
    }

    #[test]
    fn test_machine_runs_compiled_tier() {
        assert!(RuntimeInfo::probe().is_compatible());
    }
}
