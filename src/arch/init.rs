use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;

use crate::Result;

/// Samples a matrix of independent values following an inclusive uniform distribution.
///
/// # Arguments
/// * `dim` - The `(rows, cols)` shape of the matrix.
/// * `low` - The inclusive lower limit.
/// * `high` - The inclusive upper limit.
/// * `rng` - The random source to sample from.
///
/// # Returns
/// An error if the range is invalid (low > high or not finite).
pub fn uniform<R>(dim: (usize, usize), low: f64, high: f64, rng: &mut R) -> Result<Array2<f64>>
where
    R: Rng + ?Sized,
{
    let distribution = Uniform::new_inclusive(low, high)?;
    Ok(Array2::random_using(dim, distribution, rng))
}

/// Returns a zero filled matrix with the same shape as `m`.
pub fn zeros_like(m: &Array2<f64>) -> Array2<f64> {
    Array2::zeros(m.raw_dim())
}
