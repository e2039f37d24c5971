/// A distance function over points of type `P`.
///
/// Implementations must be non-negative, symmetric and satisfy the triangle
/// inequality; every pruning decision of the tree relies on it.
pub trait Metric<P: ?Sized> {
    fn distance(&self, a: &P, b: &P) -> f64;
}

impl<P: ?Sized, F> Metric<P> for F
where
    F: Fn(&P, &P) -> f64,
{
    fn distance(&self, a: &P, b: &P) -> f64 {
        self(a, b)
    }
}

pub fn euclidean<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        sum += (x - y).powi(2);
    }
    sum.sqrt()
}

/// Euclidean distance for points whose dimension is only known at runtime.
///
/// Only the common prefix of the two slices is compared.
pub fn euclidean_slice(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

pub fn manhattan<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::{euclidean, euclidean_slice, manhattan, Metric};

    #[test]
    fn distances() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_slice(&[1.0, 1.0, 1.0], &[1.0, 1.0, 3.0]), 2.0);
        assert_eq!(manhattan(&[0.0, 0.0], &[3.0, -4.0]), 7.0);
    }

    #[test]
    fn closures_are_metrics() {
        let absolute = |a: &f64, b: &f64| (a - b).abs();
        assert_eq!(absolute.distance(&1.0, &-2.5), 3.5);
        assert_eq!(euclidean::<2>.distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }
}
