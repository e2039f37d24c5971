/// Error type for tree queries and estimators.
///
/// A query that finds nothing is not an error: it returns `Ok(None)` or an
/// empty vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NearTreeError {
    #[error("the tree holds no points")]
    EmptyStructure,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("at least {required} points are required, found {found}")]
    TooFewPoints { required: usize, found: usize },
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, NearTreeError>;

pub(crate) fn check_radius(name: &str, radius: f64) -> Result<()> {
    if radius.is_nan() || radius < 0.0 {
        return Err(NearTreeError::InvalidParameter(format!(
            "{name} must be non-negative, got {radius}"
        )));
    }
    Ok(())
}

pub(crate) fn check_count(k: usize) -> Result<()> {
    if k == 0 {
        return Err(NearTreeError::InvalidParameter(
            "k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_checks() {
        assert!(check_radius("radius", 0.0).is_ok());
        assert!(check_radius("radius", f64::INFINITY).is_ok());
        assert!(matches!(
            check_radius("radius", -1.0),
            Err(NearTreeError::InvalidParameter(_))
        ));
        assert!(check_radius("radius", f64::NAN).is_err());
        assert!(check_count(1).is_ok());
        assert!(check_count(0).is_err());
    }

    #[test]
    fn messages() {
        let error = NearTreeError::TooFewPoints {
            required: 2,
            found: 1,
        };
        assert!(error.to_string().contains('2'));
        assert!(check_radius("outer radius", -3.0)
            .unwrap_err()
            .to_string()
            .contains("outer radius"));
    }
}
