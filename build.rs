// build.rs

//! Resolves the build-time SIMD tier.
//!
//! The tier is derived from the target features the compiler was asked to
//! use (`-C target-cpu=...`, `-C target-feature=...`), not from the machine
//! running the build. Cargo exposes those as `CARGO_CFG_TARGET_FEATURE`.
//!
//! Emitted cfgs:
//! - `simd_tier = "<tier>"` once for every tier that is enabled together with
//!   all tiers below it.
//! - `simd_emulated` when there is no native backend for the target (or when
//!   `PIXELFLOW_SIMD_EMULATE` is set), in which case every vector type is
//!   backed by a plain array.

use std::env;

/// Tier cfg value and the rustc target feature that enables it, lowest first.
const TIERS: &[(&str, &str)] = &[
    ("sse", "sse"),
    ("sse2", "sse2"),
    ("sse3", "sse3"),
    ("ssse3", "ssse3"),
    ("sse4.1", "sse4.1"),
    ("sse4.2", "sse4.2"),
    ("avx", "avx"),
    ("fma3", "fma"),
    ("avx2", "avx2"),
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PIXELFLOW_SIMD_EMULATE");

    let values = TIERS
        .iter()
        .map(|(tier, _)| format!("\"{}\"", tier))
        .collect::<Vec<_>>()
        .join(", ");
    println!("cargo:rustc-check-cfg=cfg(simd_tier, values({}))", values);
    println!("cargo:rustc-check-cfg=cfg(simd_emulated)");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let forced = env::var_os("PIXELFLOW_SIMD_EMULATE").is_some();

    if arch != "x86_64" || forced {
        println!("cargo:rustc-cfg=simd_emulated");
        return;
    }

    let features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    let enabled: Vec<&str> = features.split(',').collect();

    // Tiers are cumulative: stop at the first gap.
    for (tier, feature) in TIERS {
        if !enabled.contains(feature) {
            break;
        }
        println!("cargo:rustc-cfg=simd_tier=\"{}\"", tier);
    }
}
