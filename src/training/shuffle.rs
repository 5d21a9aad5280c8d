use rand::Rng;

/// Generates a uniformly random permutation of `0..n`.
///
/// Starts from the identity and swaps every position `i` with one picked uniformly from `i..n`.
pub fn shuffled_indices<R>(n: usize, rng: &mut R) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let mut indices: Vec<usize> = (0..n).collect();

    for i in 0..n {
        let j = rng.random_range(i..n);
        indices.swap(i, j);
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(shuffled_indices(0, &mut rng).is_empty());
    }

    #[test]
    fn is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut indices = shuffled_indices(100, &mut rng);
        indices.sort_unstable();

        assert_eq!(indices, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_order() {
        let a = shuffled_indices(50, &mut StdRng::seed_from_u64(9));
        let b = shuffled_indices(50, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn every_position_gets_visited() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut firsts = [0usize; 4];

        for _ in 0..4000 {
            firsts[shuffled_indices(4, &mut rng)[0]] += 1;
        }

        // ~1000 each for a uniform shuffle
        assert!(firsts.iter().all(|&n| (800..1200).contains(&n)), "{firsts:?}");
    }
}
