#[cfg(any(simd_emulated, simd_tier = "sse2"))]
mod tests {
    use pixelflow_simd::{Mask, Vector};

    type M4 = Mask<f32, 4>;
    type M2 = Mask<i64, 2>;

    const PATTERNS: [[bool; 4]; 6] = [
        [false, false, false, false],
        [true, true, true, true],
        [true, false, false, false],
        [false, true, true, false],
        [false, false, true, false],
        [true, true, false, true],
    ];

    #[test]
    fn test_all_implies_any() {
        for lanes in PATTERNS {
            let m = M4::from_array(lanes);
            if m.all() {
                assert!(m.any(), "{:?}", m);
            }
            assert_eq!(m.none(), !m.any(), "{:?}", m);
        }
    }

    #[test]
    fn test_and_all_implies_both_all() {
        for l1 in PATTERNS {
            for l2 in PATTERNS {
                let m1 = M4::from_array(l1);
                let m2 = M4::from_array(l2);
                if (m1 & m2).all() {
                    assert!(m1.all() && m2.all());
                }
                assert_eq!((m1 | m2).to_array(), std::array::from_fn(|i| l1[i] || l2[i]));
                assert_eq!((m1 ^ m2).to_array(), std::array::from_fn(|i| l1[i] != l2[i]));
            }
        }
    }

    #[test]
    fn test_not_and_andnot() {
        let m = M4::from_array([true, false, true, false]);
        assert_eq!((!m).to_array(), [false, true, false, true]);
        let n = M4::from_array([true, true, false, false]);
        assert_eq!(m.andnot(n).to_array(), [false, true, false, false]);
        assert_eq!(!M4::all_true(), M4::all_false());
    }

    #[test]
    fn test_mask_comparisons() {
        let m = M2::from_array([true, false]);
        let n = M2::from_array([true, true]);
        assert_eq!(m.cmp_eq(n).to_array(), [true, false]);
        assert_eq!(m.cmp_ne(n).to_array(), [false, true]);
        assert!(m.cmp_eq(m).all());
    }

    #[test]
    fn test_compound_assignment() {
        let mut m = M4::all_true();
        m &= M4::from_array([true, false, true, true]);
        m |= M4::from_array([false, true, false, false]);
        m ^= M4::from_array([false, false, false, true]);
        assert_eq!(m.to_array(), [true, true, true, false]);
    }

    #[test]
    fn test_splat_and_default() {
        assert!(M4::splat(true).all());
        assert!(M4::splat(false).none());
        assert_eq!(M2::default(), M2::all_false());
    }

    #[test]
    fn test_from_bools_and_vector() {
        let m: Mask<i32, 4> = [false, true, false, true].into();
        assert_eq!(m.bitmask(), 0b1010);
        let v: Vector<i32, 4> = m.into();
        assert_eq!(v.to_array(), [0, -1, 0, -1]);
        assert_eq!(Mask::from_vector(v), m);
    }

    #[test]
    fn test_select_picks_per_lane() {
        let a = Vector::<f32, 4>::from_array([1.0, 2.0, 3.0, 4.0]);
        let b = Vector::<f32, 4>::from_array([-1.0, -2.0, -3.0, -4.0]);
        let m = M4::from_array([true, false, false, true]);
        assert_eq!(m.select(a, b).to_array(), [1.0, -2.0, -3.0, 4.0]);
        assert_eq!(Vector::select(a, b, !m).to_array(), [-1.0, 2.0, 3.0, -4.0]);
    }

    #[test]
    fn test_mask_lanes_hold_full_bit_patterns() {
        let v = M4::all_true().to_vector().to_array();
        for lane in v {
            assert_eq!(lane.to_bits(), u32::MAX);
        }
        let w = M2::all_true().to_vector().to_array();
        assert_eq!(w, [-1, -1]);
    }

    #[test]
    fn test_comparison_masks_match_scalar() {
        let a = [1.0f64, 5.25];
        let b = [-2.5f64, 5.25];
        let va = Vector::<f64, 2>::from_array(a);
        let vb = Vector::<f64, 2>::from_array(b);
        let cases: [(Vector<f64, 2>, fn(&f64, &f64) -> bool); 6] = [
            (va.cmp_eq(vb), f64::eq),
            (va.cmp_ne(vb), f64::ne),
            (va.cmp_lt(vb), f64::lt),
            (va.cmp_le(vb), f64::le),
            (va.cmp_gt(vb), f64::gt),
            (va.cmp_ge(vb), f64::ge),
        ];
        for (got, scalar) in cases {
            let want: [bool; 2] = std::array::from_fn(|i| scalar(&a[i], &b[i]));
            assert_eq!(Mask::from_vector(got).to_array(), want);
        }
    }
}
