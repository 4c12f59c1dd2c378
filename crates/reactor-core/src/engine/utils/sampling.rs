use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use tracing::instrument;

/// Draws a vector of independent ±1 signs (Rademacher distribution).
#[instrument(level = "trace", skip_all, fields(dimensions = dimensions))]
pub fn rademacher(dimensions: usize, rng: &mut impl Rng) -> Vec<f64> {
    (0..dimensions)
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect()
}

/// Draws a point uniformly from the unit hypercube `[0, 1)^dimensions`.
pub fn unit_point(dimensions: usize, rng: &mut impl Rng) -> Vec<f64> {
    let unit = Uniform::new(0.0, 1.0);
    (0..dimensions).map(|_| unit.sample(rng)).collect()
}

/// Moves `point` by `offset * direction` and clips every coordinate into `[0, 1]`.
pub fn shifted(point: &[f64], direction: &[f64], offset: f64) -> Vec<f64> {
    point
        .iter()
        .zip(direction)
        .map(|(x, d)| (x + offset * d).clamp(0.0, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rademacher_draws_only_signs_and_both_appear() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws = rademacher(200, &mut rng);
        assert!(draws.iter().all(|d| *d == 1.0 || *d == -1.0));
        assert!(draws.contains(&1.0));
        assert!(draws.contains(&-1.0));
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        assert_eq!(rademacher(16, &mut a), rademacher(16, &mut b));
        assert_eq!(unit_point(16, &mut a), unit_point(16, &mut b));
    }

    #[test]
    fn unit_points_stay_in_the_cube() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(unit_point(4, &mut rng).iter().all(|x| (0.0..1.0).contains(x)));
        }
    }

    #[test]
    fn shifted_points_are_clipped() {
        let moved = shifted(&[0.5, 0.98, 0.01], &[1.0, 1.0, -1.0], 0.05);
        assert!((moved[0] - 0.55).abs() < 1e-12);
        assert_eq!(moved[1], 1.0);
        assert_eq!(moved[2], 0.0);
    }
}
