use pixelflow_simd::{probe_runtime_level, registry, runtime, FeatureLevel, RuntimeInfo};

#[test]
fn test_levels_are_totally_ordered() {
    for pair in FeatureLevel::ALL.windows(2) {
        assert!(pair[0] < pair[1]);
        assert!(pair[1].satisfies(pair[0]));
        assert!(!pair[0].satisfies(pair[1]));
    }
}

#[test]
fn test_names_parse_back() {
    for level in FeatureLevel::ALL {
        assert_eq!(level.to_string().parse::<FeatureLevel>().unwrap(), level);
        assert_eq!(level.name().to_lowercase().parse::<FeatureLevel>().unwrap(), level);
    }
    assert!("AVX512".parse::<FeatureLevel>().is_err());
}

#[test]
fn test_compiled_level_matches_cfg() {
    let level = FeatureLevel::current();
    assert_eq!(cfg!(simd_tier = "sse2"), level.satisfies(FeatureLevel::Sse2));
    assert_eq!(cfg!(simd_tier = "avx"), level.satisfies(FeatureLevel::Avx));
    assert_eq!(cfg!(simd_tier = "avx2"), level.satisfies(FeatureLevel::Avx2));
    if cfg!(simd_emulated) {
        assert_eq!(level, FeatureLevel::None);
    }
}

#[test]
fn test_runtime_level_covers_compiled_level() {
    assert!(probe_runtime_level().satisfies(FeatureLevel::current()));
    assert!(RuntimeInfo::probe().is_compatible());
}

#[test_log::test]
fn test_runtime_info_is_recorded_once() {
    assert!(runtime::get().is_none() || runtime::get() == Some(runtime::init()));
    let info = runtime::init();
    assert_eq!(info.detected, probe_runtime_level());
    assert_eq!(runtime::get(), Some(info));
}

#[test]
fn test_registry_lists_every_available_shape() {
    let specs = registry::available();
    let shapes: Vec<(&str, usize)> = specs.iter().map(|s| (s.element, s.lanes)).collect();
    if cfg!(any(simd_emulated, simd_tier = "sse2")) {
        for shape in [("f32", 4), ("f64", 2), ("i32", 4), ("i64", 2)] {
            assert!(shapes.contains(&shape), "missing {:?}", shape);
        }
    }
    if cfg!(any(simd_emulated, simd_tier = "avx2")) {
        assert_eq!(specs.len(), 8);
    }
    for spec in specs {
        assert!(FeatureLevel::current().satisfies(spec.required));
    }
}
