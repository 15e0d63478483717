use crate::BhError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, BhError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BhError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, BhError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(BhError::NotPositive { what, value: v })
    }
}

/// Finite and not below zero.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, BhError> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(BhError::Negative { what, value: v })
    }
}

/// Largest entry of a field, `NEG_INFINITY` for an empty slice.
pub fn max_value(values: &[Real]) -> Real {
    values.iter().copied().fold(Real::NEG_INFINITY, Real::max)
}

/// Largest absolute pointwise difference between two fields of equal length.
pub fn max_abs_diff(a: &[Real], b: &[Real]) -> Result<Real, BhError> {
    if a.len() != b.len() {
        return Err(BhError::LengthMismatch {
            what: "max_abs_diff operands",
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, Real::max))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn max_abs_diff_is_symmetric(
            pairs in prop::collection::vec((-1e3_f64..1e3, -1e3_f64..1e3), 1..20)
        ) {
            let a: Vec<Real> = pairs.iter().map(|p| p.0).collect();
            let b: Vec<Real> = pairs.iter().map(|p| p.1).collect();
            let ab = max_abs_diff(&a, &b).unwrap();
            let ba = max_abs_diff(&b, &a).unwrap();
            prop_assert!(nearly_equal(ab, ba, Tolerances::default()));
            prop_assert!(ab >= 0.0);
        }
    }
}
