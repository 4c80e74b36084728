// In src/main.rs

//! `pixelflow-simd` diagnostic driver.
//!
//! Prints the tier the crate was built for, the tier the CPU supports, and
//! the vector types available, then exercises each type with a little
//! arithmetic.

use pixelflow_simd::{
    config::Config,
    report::Report,
    runtime,
    Lanes, SimdError, Vector,
};

// Logging
use anyhow::Context; // For context on Results
use log::{debug, info, warn};

/// Main entry point for the `pixelflow-simd` driver.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting pixelflow-simd...");

    // --- Configuration ---
    let config = Config::load().context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);

    // --- Tier check ---
    let info = runtime::init();
    if !info.is_compatible() {
        if config.strict {
            return Err(SimdError::TierMismatch {
                compiled: info.compiled,
                detected: info.detected,
            })
            .context("Strict mode refuses to run below the compiled tier");
        }
        warn!("Continuing below the compiled tier (strict mode is off)");
    }

    // --- Report ---
    let report = Report::new(info, &config.report);
    let rendered = report
        .render(config.report.format)
        .context("Failed to render report")?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }

    // --- Demo ---
    if config.demo.enabled {
        run_demo();
    } else {
        info!("Demo disabled by configuration.");
    }

    info!("pixelflow-simd finished.");
    Ok(())
}

/// Prints two operands and their lane-wise arithmetic.
fn demo<T, const W: usize>(name: &str, a1: [T; W], a2: [T; W], divide: bool)
where
    T: Lanes<W>,
{
    let spec = Vector::<T, W>::spec();
    let a1 = Vector::<T, W>::from_array(a1);
    let a2 = Vector::<T, W>::from_array(a2);
    println!();
    println!("{} ({}, {}):", name, spec.required, spec.native);
    println!("  a1      = {}", a1);
    println!("  a2      = {}", a2);
    println!("  a1 + a2 = {}", a1 + a2);
    println!("  a1 - a2 = {}", a1 - a2);
    println!("  a1 * a2 = {}", a1 * a2);
    if divide {
        println!("  a1 / a2 = {}", a1 / a2);
    }
    println!("  sum(a1) = {}", a1.horizontal_sum());
}

fn run_demo() {
    #[cfg(any(simd_emulated, simd_tier = "sse"))]
    demo::<f32, 4>("f32x4", [1.0, 2.0, -3.0, 4.0], [-5.0, -6.0, 7.0, 8.0], true);
    #[cfg(any(simd_emulated, simd_tier = "sse2"))]
    {
        demo::<f64, 2>("f64x2", [1.0, 2.0], [-3.0, 4.0], true);
        demo::<i32, 4>("i32x4", [1, 2, -3, 4], [-5, -6, 7, 8], false);
        demo::<i64, 2>("i64x2", [1, 2], [-3, 4], false);
    }
    #[cfg(any(simd_emulated, simd_tier = "avx"))]
    {
        demo::<f32, 8>(
            "f32x8",
            [1.0, 2.0, -3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
            true,
        );
        demo::<f64, 4>("f64x4", [1.0, 2.0, -3.0, 4.0], [-5.0, -6.0, 7.0, 8.0], true);
    }
    #[cfg(any(simd_emulated, simd_tier = "avx2"))]
    {
        demo::<i32, 8>(
            "i32x8",
            [1, 2, -3, 4, 5, 6, 7, 8],
            [9, 10, 11, 12, 13, 14, 15, 16],
            false,
        );
        demo::<i64, 4>("i64x4", [1, 2, -3, 4], [-5, -6, 7, 8], false);
    }
}
