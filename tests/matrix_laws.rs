use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_neuralnet::{Error, Matrix};

fn random(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    let mut m = Matrix::new(rows, cols);
    m.randomize_with(rng, -5.0, 5.0).unwrap();
    m
}

#[test]
fn transpose_is_an_involution() {
    let mut rng = StdRng::seed_from_u64(11);
    for (rows, cols) in [(1, 1), (2, 3), (5, 1), (4, 4)] {
        let a = random(&mut rng, rows, cols);
        assert_eq!(a.transpose().transpose(), a);
    }
}

#[test]
fn product_with_identity() {
    let mut rng = StdRng::seed_from_u64(12);
    let a = random(&mut rng, 3, 4);
    let identity = Matrix::new(4, 4).mapped(|_, row, col| if row == col { 1.0 } else { 0.0 });
    assert_eq!(a.dot(&identity).unwrap(), a);

    let b = random(&mut rng, 4, 2);
    let ab = a.dot(&b).unwrap();
    let bt_at = b.transpose().dot(&a.transpose()).unwrap();
    for (x, y) in ab.transpose().iter().zip(bt_at.iter()) {
        assert!((x - y).abs() < 1e-9);
    }
}

#[test]
fn non_mutating_operations_leave_operands_alone() {
    let mut rng = StdRng::seed_from_u64(13);
    let a = random(&mut rng, 3, 3);
    let b = random(&mut rng, 3, 3);
    let (a0, b0) = (a.clone(), b.clone());

    let _ = a.mapped(|x, _, _| x * 10.0);
    let _ = a.multiplied(&b).unwrap();
    let _ = a.scaled(3.0);
    let _ = a.added(&b).unwrap();
    let _ = a.subtract(&b).unwrap();
    let _ = a.dot(&b).unwrap();
    let _ = a.transpose();

    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

#[test]
fn failed_operations_leave_operands_alone() {
    let mut rng = StdRng::seed_from_u64(14);
    let mut a = random(&mut rng, 2, 3);
    let b = random(&mut rng, 2, 2);
    let (a0, b0) = (a.clone(), b.clone());

    assert!(matches!(a.dot(&b), Err(Error::ShapeMismatch(_))));
    assert!(matches!(a.add_in_place(&b), Err(Error::ShapeMismatch(_))));
    assert!(matches!(a.multiply_in_place(&b), Err(Error::ShapeMismatch(_))));
    assert!(matches!(a.subtract(&b), Err(Error::ShapeMismatch(_))));

    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

#[test]
fn randomize_samples_stay_in_closed_interval() {
    let mut rng = StdRng::seed_from_u64(15);
    let mut m = Matrix::new(100, 100);
    m.randomize_with(&mut rng, -0.25, 0.75).unwrap();
    assert_eq!(m.iter().count(), 10_000);
    assert!(m.iter().all(|&x| (-0.25..=0.75).contains(&x)));

    m.randomize_with(&mut rng, 2.5, 2.5).unwrap();
    assert!(m.iter().all(|&x| x == 2.5));
}
