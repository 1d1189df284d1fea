//! Integration tests for transport distances

use guidelog_similarity::{Assignment, CostMatrix, EarthMovers, TransportError, TransportStrategy};

#[test]
fn emd_of_rectangular_matrix() {
    // Two rows spread evenly over four columns.
    let costs = CostMatrix::new(2, 4, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]).unwrap();
    let distance = EarthMovers::new().distance(&costs).unwrap();
    assert!(distance.abs() < 1e-12);
}

#[test]
fn emd_and_assignment_agree_on_permutations() {
    let costs = CostMatrix::new(3, 3, vec![0.9, 0.1, 0.5, 0.2, 0.8, 0.7, 0.6, 0.4, 0.3]).unwrap();
    let emd = EarthMovers::new().distance(&costs).unwrap();
    let assignment = Assignment.distance(&costs).unwrap();
    assert!((emd - assignment).abs() < 1e-9);
    assert!((assignment - 0.2).abs() < 1e-9);
}

#[test]
fn iteration_limit_reports_non_convergence() {
    let costs = CostMatrix::from_fn(4, 4, |r, c| if r == c { 0.0 } else { 1.0 });
    let err = EarthMovers::new()
        .with_max_iterations(1)
        .distance(&costs)
        .unwrap_err();
    assert!(matches!(err, TransportError::NotConverged { .. }));
}

#[test]
fn non_finite_costs_are_rejected() {
    let costs = CostMatrix::new(1, 2, vec![0.0, f64::NAN]).unwrap();
    let err = EarthMovers::new().distance(&costs).unwrap_err();
    assert!(matches!(err, TransportError::NonFiniteCost { row: 0, col: 1 }));
}
