use super::*;
use crate::lu::LuFactors;
use crate::traits::{Bosonic, Fermionic};

#[test]
fn test_param_validation() {
    assert!(build_dlr_rf(0.0, 1e-6).is_err());
    assert!(build_dlr_rf(-1.0, 1e-6).is_err());
    assert!(build_dlr_rf(f64::NAN, 1e-6).is_err());
    assert!(build_dlr_rf(10.0, 0.0).is_err());
    assert!(build_dlr_rf(10.0, 1.0).is_err());
    assert!(build_dlr_if::<Fermionic>(&[0.0], 0).is_err());
}

#[test]
fn test_fine_nmax() {
    assert_eq!(fine_nmax(1.0), 20);
    assert_eq!(fine_nmax(10.0), 20);
    assert_eq!(fine_nmax(10.2), 21);
    assert_eq!(fine_nmax(100.0), 200);
}

#[test]
fn test_fine_grid_layout() {
    let lambda = 10.0;
    let grid = FineGrid::new(lambda);
    // ceil(log2 10) = 4 → 2 τ panels, 4 ω panels, each mirrored
    assert_eq!(grid.tau.len(), 2 * 2 * FINE_ORDER);
    assert_eq!(grid.omega.len(), 2 * 4 * FINE_ORDER);

    for w in grid.omega.windows(2) {
        assert!(w[0] < w[1]);
    }
    assert!(grid.omega.iter().all(|&w| w.abs() < lambda));
    assert!(grid.tau.iter().all(|&t| t.abs() <= 0.5));

    // Mirrored grid
    let n = grid.omega.len();
    for i in 0..n {
        assert!((grid.omega[i] + grid.omega[n - 1 - i]).abs() < 1e-12);
    }
}

#[test]
fn test_rf_sorted_and_in_range() {
    let lambda = 10.0;
    let rf = build_dlr_rf(lambda, 1e-6).unwrap();
    assert!(!rf.is_empty());
    for w in rf.windows(2) {
        assert!(w[0] < w[1]);
    }
    assert!(rf.iter().all(|&w| w.abs() <= lambda));
}

#[test]
fn test_rank_grows() {
    let r_small_lambda = build_dlr_rf(4.0, 1e-6).unwrap().len();
    let r_large_lambda = build_dlr_rf(40.0, 1e-6).unwrap().len();
    assert!(r_large_lambda > r_small_lambda);

    let r_loose = build_dlr_rf(10.0, 1e-4).unwrap().len();
    let r_tight = build_dlr_rf(10.0, 1e-10).unwrap().len();
    assert!(r_tight > r_loose);
}

#[test]
fn test_if_nodes() {
    let rf = build_dlr_rf(10.0, 1e-6).unwrap();
    let nmax = fine_nmax(10.0);

    let f = build_dlr_if::<Fermionic>(&rf, nmax).unwrap();
    assert_eq!(f.len(), rf.len());
    for w in f.windows(2) {
        assert!(w[0] < w[1]);
    }
    assert!(f.iter().all(|&n| n >= -nmax && n < nmax));

    let b = build_dlr_if::<Bosonic>(&rf, nmax).unwrap();
    assert_eq!(b.len(), rf.len());
    assert!(b.iter().all(|&n| n >= -nmax && n <= nmax));
}

fn check_1d_fit<S: StatisticsType>(omega0: f64) {
    let lambda = 10.0;
    let rf = build_dlr_rf(lambda, 1e-8).unwrap();
    let nodes = build_dlr_if::<S>(&rf, fine_nmax(lambda)).unwrap();
    let r = rf.len();

    // Fit the single pole K^S(n, ω0) on the nodes
    let a = matsubara_matrix::<S>(&nodes, &rf);
    let lu = LuFactors::factorize(&a).unwrap();
    let mut coeffs: Vec<Complex64> = nodes
        .iter()
        .map(|&n| matsubara_kernel::<S>(n, omega0))
        .collect();
    lu.solve_in_place(&mut coeffs, 1).unwrap();

    // Check away from the nodes
    for n in -60..60 {
        let exact = matsubara_kernel::<S>(n, omega0);
        let approx: Complex64 = (0..r).map(|k| coeffs[k] * matsubara_kernel::<S>(n, rf[k])).sum();
        assert!(
            (exact - approx).norm() < 1e-6,
            "n={}: {} vs {}",
            n,
            exact,
            approx
        );
    }
}

#[test]
fn test_fermionic_fit_off_grid_pole() {
    check_1d_fit::<Fermionic>(2.345);
    check_1d_fit::<Fermionic>(-7.1);
}

#[test]
fn test_bosonic_fit_off_grid_pole() {
    check_1d_fit::<Bosonic>(1.234);
}
