use num::Num;

use crate::error::{Error, Result};
use crate::utils::math;

pub trait Compare<N>
where
    N: Num + Copy,
{
    /// cosine similarity
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// 0.0 when either norm is zero
    fn cosine_similarity(vec: &[N], other: &[N]) -> Result<f64>;
}

#[derive(Debug)]
pub struct DefaultCompare;

impl<N> Compare<N> for DefaultCompare
where
    N: Num + Copy + Into<f64>,
{
    fn cosine_similarity(vec: &[N], other: &[N]) -> Result<f64> {
        check_dims(vec, other)?;
        let norm_a = math::norm_sq(vec);
        let norm_b = math::norm_sq(other);
        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }
        let cos = math::dot(vec, other) / (norm_a.sqrt() * norm_b.sqrt());
        // rounding can push |cos| a hair past 1
        Ok(cos.clamp(-1.0, 1.0))
    }
}

#[inline]
fn check_dims<N>(a: &[N], b: &[N]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// Cosine similarity of two equal-length vectors.
/// Zero vectors compare as 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    <DefaultCompare as Compare<f64>>::cosine_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors() {
        let v = [0.3, 0.0, 1.7, 2.2];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn symmetric() {
        let v = [0.1, 0.9, 0.0, 0.4];
        let w = [0.7, 0.2, 0.5, 0.0];
        assert_eq!(cosine_similarity(&v, &w).unwrap(), cosine_similarity(&w, &v).unwrap());
    }

    #[test]
    fn orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).unwrap(), 0.0);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_falls_back_to_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_lengths() {
        match cosine_similarity(&[1.0, 2.0, 3.0], &[1.0]) {
            Err(Error::DimensionMismatch { expected, found }) => {
                assert_eq!((expected, found), (3, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn generic_over_numeric_types() {
        let counts = <DefaultCompare as Compare<u16>>::cosine_similarity(&[2, 0, 1], &[4, 0, 2]).unwrap();
        assert!((counts - 1.0).abs() < 1e-12);
        let weights = <DefaultCompare as Compare<f32>>::cosine_similarity(&[1.0, 0.0], &[1.0, 1.0]).unwrap();
        assert!((weights - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }
}
