//! Uniform random samples in `[-1, 1]` for tests and benchmarks.

use glam::{DVec3, DVec4};
use rand::Rng;
use rigid_linalg::mat6::Vec6;

/// A 3-vector with components drawn uniformly from `[-1, 1]`.
pub fn random_vec3<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    DVec3::new(
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
    )
}

/// A 4-vector with components drawn uniformly from `[-1, 1]`.
pub fn random_vec4<R: Rng + ?Sized>(rng: &mut R) -> DVec4 {
    random_vec3(rng).extend(rng.random_range(-1.0..=1.0))
}

/// A 6-vector with components drawn uniformly from `[-1, 1]`.
pub fn random_vec6<R: Rng + ?Sized>(rng: &mut R) -> Vec6 {
    let mut v = [0.0; 6];
    v.iter_mut()
        .for_each(|x| *x = rng.random_range(-1.0..=1.0));
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_range_and_seed() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let v = random_vec6(&mut rng);
            assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
            assert!(random_vec4(&mut rng).abs().max_element() <= 1.0);
        }

        let a = random_vec3(&mut StdRng::seed_from_u64(42));
        let b = random_vec3(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
