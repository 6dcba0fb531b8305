//! Random inputs for work requests that don't supply their own.

use rand::Rng;

use crate::matrix::Matrix2x2;

/// `count` values drawn uniformly from `[low, high)`.
pub fn uniform<R: Rng>(rng: &mut R, count: usize, low: f64, high: f64) -> Vec<f64> {
    (0..count).map(|_| rng.random_range(low..high)).collect()
}

/// `count` integers drawn uniformly from `[low, high]`.
pub fn integers<R: Rng>(rng: &mut R, count: usize, low: i64, high: i64) -> Vec<i64> {
    (0..count).map(|_| rng.random_range(low..=high)).collect()
}

/// A matrix whose entries are drawn uniformly from `[low, high)`.
pub fn matrix<R: Rng>(rng: &mut R, low: f64, high: f64) -> Matrix2x2 {
    Matrix2x2([
        rng.random_range(low..high),
        rng.random_range(low..high),
        rng.random_range(low..high),
        rng.random_range(low..high),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);

        let floats = uniform(&mut rng, 50, 0.0, 10.0);
        assert_eq!(floats.len(), 50);
        assert!(floats.iter().all(|v| (0.0..10.0).contains(v)));

        let ints = integers(&mut rng, 200, 0, 100);
        assert_eq!(ints.len(), 200);
        assert!(ints.iter().all(|v| (0..=100).contains(v)));

        let m = matrix(&mut rng, 0.0, 10.0);
        assert!(m.values().iter().all(|v| (0.0..10.0).contains(v)));
    }
}
