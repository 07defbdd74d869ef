use num::Num;

/// Σ(a_i * b_i) over the shorter of the two slices
#[inline]
pub fn dot<N>(a: &[N], b: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.into() * y.into())
        .sum()
}

/// Σ(a_i^2)
#[inline]
pub fn norm_sq<N>(a: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter()
        .map(|&x| {
            let x: f64 = x.into();
            x * x
        })
        .sum()
}

/// Σ((a_i - b_i)^2)
#[inline]
pub fn sq_euclidean<N>(a: &[N], b: &[N]) -> f64
where
    N: Num + Copy + Into<f64>,
{
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x.into() - y.into();
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_products() {
        let a = [1.0f64, 2.0, 3.0];
        let b = [4.0f64, -5.0, 6.0];
        assert_eq!(dot(&a, &b), 12.0);
        assert_eq!(norm_sq(&a), 14.0);
        assert_eq!(sq_euclidean(&a, &b), 9.0 + 49.0 + 9.0);
    }

    #[test]
    fn works_for_integer_and_f32() {
        let a = [1u8, 2, 3];
        assert_eq!(norm_sq(&a), 14.0);
        let b = [0.5f32, 0.5];
        assert_eq!(dot(&b, &b), 0.5);
    }
}
