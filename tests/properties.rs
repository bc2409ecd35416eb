//! Randomised algebraic properties of Matrix operations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use redeem_linalg::Matrix;

const TRIALS: usize = 50;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    let data = (0..rows * cols).map(|_| rng.gen_range(-100.0..100.0)).collect();
    Matrix::from_shape_vec((rows, cols), data).unwrap()
}

fn random_shape(rng: &mut StdRng) -> (usize, usize) {
    (rng.gen_range(1..7), rng.gen_range(1..7))
}

#[test]
fn transpose_twice_is_identity() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..TRIALS {
        let (r, c) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, r, c);
        assert_eq!(a.transpose().transpose(), a);
    }
}

#[test]
fn add_is_commutative() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..TRIALS {
        let (r, c) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, r, c);
        let b = random_matrix(&mut rng, r, c);
        assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
    }
}

#[test]
fn swap_rows_is_self_inverse() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..TRIALS {
        let (r, c) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, r, c);
        let i = rng.gen_range(1..=r);
        let j = rng.gen_range(1..=r);
        let twice = a.swap_rows(i, j).unwrap().swap_rows(i, j).unwrap();
        assert_eq!(twice.as_slice(), a.as_slice());
    }
}

#[test]
fn concatenation_splits_back_into_operands() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..TRIALS {
        let (r, c) = random_shape(&mut rng);
        let extra = rng.gen_range(1..5);
        let a = random_matrix(&mut rng, r, c);
        let b = random_matrix(&mut rng, r, extra);
        let joined = a.concatenate_rows(&b).unwrap();
        assert_eq!(joined.cols(), c + extra);
        assert_eq!(joined.sub_matrix(1, 1, r, c).unwrap(), a);
        assert_eq!(joined.sub_matrix(1, c + 1, r, c + extra).unwrap(), b);
    }
}

#[test]
fn delete_col_drops_exactly_one_column() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..TRIALS {
        let rows = rng.gen_range(1..6);
        let cols = rng.gen_range(2..7);
        let a = random_matrix(&mut rng, rows, cols);
        let drop = rng.gen_range(1..=cols);
        let d = a.delete_col(drop).unwrap();
        assert_eq!(d.shape(), (rows, cols - 1));
        let kept: Vec<usize> = (1..=cols).filter(|&j| j != drop).collect();
        for (new_j, &old_j) in kept.iter().enumerate() {
            assert_eq!(d.col(new_j + 1).unwrap(), a.col(old_j).unwrap());
        }
    }
}

#[test]
fn replace_col_then_read_back() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..TRIALS {
        let (r, c) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, r, c);
        let column = random_matrix(&mut rng, r, 1);
        let j = rng.gen_range(1..=c);
        let replaced = a.replace_col(j, &column).unwrap();
        assert_eq!(replaced.col(j).unwrap(), column.to_vec());
    }
}

#[test]
fn add_scalar_then_subtract_round_trips() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..TRIALS {
        let (r, c) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, r, c);
        let shift = rng.gen_range(-10.0..10.0);
        assert!(a.add_scalar(shift).add_scalar(-shift).approx_eq_with(
            &a,
            &redeem_linalg::EqualityConfig::new(1e-9, Default::default())
        ));
    }
}
