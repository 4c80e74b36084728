//! Instruction-set tiers.
//!
//! A [`FeatureLevel`] names a cumulative x86 SIMD tier. Tiers are totally
//! ordered: an operation that needs tier `L` is available whenever the active
//! tier is at least `L`.
//!
//! The build-time tier comes from the cfgs emitted by `build.rs` and is a
//! constant of the compiled crate ([`FeatureLevel::current`]). The tier of
//! the executing CPU is probed separately (see [`crate::runtime`]).

use crate::error::SimdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cumulative SIMD instruction-set tier.
///
/// The discriminants are the tier ordinals; comparison is by ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum FeatureLevel {
    /// No vector instructions; every vector type is an emulated array.
    #[default]
    #[serde(rename = "none")]
    None = 0,
    #[serde(rename = "SSE")]
    Sse = 10,
    #[serde(rename = "SSE2")]
    Sse2 = 20,
    #[serde(rename = "SSE3")]
    Sse3 = 30,
    #[serde(rename = "SSSE3")]
    Ssse3 = 31,
    #[serde(rename = "SSE4.1")]
    Sse41 = 41,
    #[serde(rename = "SSE4.2")]
    Sse42 = 42,
    #[serde(rename = "AVX")]
    Avx = 50,
    #[serde(rename = "FMA3")]
    Fma3 = 51,
    #[serde(rename = "AVX2")]
    Avx2 = 60,
}

impl FeatureLevel {
    /// Every tier, lowest first.
    pub const ALL: [FeatureLevel; 10] = [
        FeatureLevel::None,
        FeatureLevel::Sse,
        FeatureLevel::Sse2,
        FeatureLevel::Sse3,
        FeatureLevel::Ssse3,
        FeatureLevel::Sse41,
        FeatureLevel::Sse42,
        FeatureLevel::Avx,
        FeatureLevel::Fma3,
        FeatureLevel::Avx2,
    ];

    /// The tier this crate was compiled for.
    ///
    /// This is the highest tier that `build.rs` found enabled together with
    /// every tier below it. Emulated builds report [`FeatureLevel::None`].
    pub const fn current() -> Self {
        if cfg!(simd_tier = "avx2") {
            FeatureLevel::Avx2
        } else if cfg!(simd_tier = "fma3") {
            FeatureLevel::Fma3
        } else if cfg!(simd_tier = "avx") {
            FeatureLevel::Avx
        } else if cfg!(simd_tier = "sse4.2") {
            FeatureLevel::Sse42
        } else if cfg!(simd_tier = "sse4.1") {
            FeatureLevel::Sse41
        } else if cfg!(simd_tier = "ssse3") {
            FeatureLevel::Ssse3
        } else if cfg!(simd_tier = "sse3") {
            FeatureLevel::Sse3
        } else if cfg!(simd_tier = "sse2") {
            FeatureLevel::Sse2
        } else if cfg!(simd_tier = "sse") {
            FeatureLevel::Sse
        } else {
            FeatureLevel::None
        }
    }

    /// The tier's ordinal.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// True if code built for `self` may use an operation that needs `required`.
    ///
    /// `const` so it can back static assertions.
    #[inline]
    pub const fn satisfies(self, required: FeatureLevel) -> bool {
        self.ordinal() >= required.ordinal()
    }

    /// Short display name, e.g. `"SSE4.1"` or `"none"`.
    pub const fn name(self) -> &'static str {
        match self {
            FeatureLevel::None => "none",
            FeatureLevel::Sse => "SSE",
            FeatureLevel::Sse2 => "SSE2",
            FeatureLevel::Sse3 => "SSE3",
            FeatureLevel::Ssse3 => "SSSE3",
            FeatureLevel::Sse41 => "SSE4.1",
            FeatureLevel::Sse42 => "SSE4.2",
            FeatureLevel::Avx => "AVX",
            FeatureLevel::Fma3 => "FMA3",
            FeatureLevel::Avx2 => "AVX2",
        }
    }

    /// Looks a tier up by ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.ordinal() == ordinal)
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for FeatureLevel {
    type Err = SimdError;

    /// Parses a display name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SimdError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_strictly_increasing() {
        for pair in FeatureLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
            assert!(pair[0].ordinal() < pair[1].ordinal());
        }
        assert_eq!(FeatureLevel::Sse41.ordinal(), 41);
        assert_eq!(FeatureLevel::Fma3.ordinal(), 51);
    }

    #[test]
    fn test_name_parse_round_trip() {
        for level in FeatureLevel::ALL {
            assert_eq!(level.name().parse::<FeatureLevel>().unwrap(), level);
            assert_eq!(
                level.name().to_lowercase().parse::<FeatureLevel>().unwrap(),
                level
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "AVX512".parse::<FeatureLevel>().unwrap_err();
        assert!(matches!(err, SimdError::UnknownLevel(ref name) if name == "AVX512"));
    }

    #[test]
    fn test_satisfies() {
        assert!(FeatureLevel::Avx2.satisfies(FeatureLevel::Sse41));
        assert!(FeatureLevel::Sse2.satisfies(FeatureLevel::Sse2));
        assert!(!FeatureLevel::Sse3.satisfies(FeatureLevel::Ssse3));
        assert!(FeatureLevel::None.satisfies(FeatureLevel::None));
    }

    #[test]
    fn test_from_ordinal() {
        assert_eq!(FeatureLevel::from_ordinal(42), Some(FeatureLevel::Sse42));
        assert_eq!(FeatureLevel::from_ordinal(43), None);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&FeatureLevel::Sse41).unwrap();
        assert_eq!(json, "\"SSE4.1\"");
        let back: FeatureLevel = serde_json::from_str("\"AVX2\"").unwrap();
        assert_eq!(back, FeatureLevel::Avx2);
    }

    #[cfg(simd_emulated)]
    #[test]
    fn test_emulated_build_has_no_tier() {
        assert_eq!(FeatureLevel::current(), FeatureLevel::None);
    }

    #[cfg(simd_tier = "sse2")]
    #[test]
    fn test_native_build_is_at_least_sse2() {
        assert!(FeatureLevel::current() >= FeatureLevel::Sse2);
    }
}
