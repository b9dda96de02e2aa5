/*!
# Utilities

Small helper traits shared by the covering algorithms.
*/

use num::{Float, One, Zero};

/// Helper trait for probalities
pub trait Probability {
    /// Returns *true* if the probality is valid (ie. between `0` and `1`)
    fn is_valid_probability(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_valid_probability(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}

/// Returns the arithmetic mean and the (population) variance of a sample.
/// An empty sample has mean and variance `0`.
pub fn mean_and_variance<F>(values: &[F]) -> (F, F)
where
    F: Float,
{
    if values.is_empty() {
        return (F::zero(), F::zero());
    }

    let len = F::from(values.len()).unwrap_or_else(F::one);
    let mean = values.iter().fold(F::zero(), |acc, &x| acc + x) / len;
    let variance = values
        .iter()
        .fold(F::zero(), |acc, &x| acc + (x - mean) * (x - mean))
        / len;
    (mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability() {
        assert!(0.0f64.is_valid_probability());
        assert!(1.0f64.is_valid_probability());
        assert!(0.3f64.is_valid_probability());
        assert!(!(-0.1f64).is_valid_probability());
        assert!(!1.5f64.is_valid_probability());
    }

    #[test]
    fn mean_variance() {
        assert_eq!(mean_and_variance::<f64>(&[]), (0.0, 0.0));
        assert_eq!(mean_and_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), (5.0, 4.0));
    }
}
