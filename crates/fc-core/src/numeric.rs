use crate::FcError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
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

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FcError::NonFinite { what, value: v })
    }
}

/// Weighted RMS norm of a step `dx` relative to the magnitudes in `x`.
///
/// Entry `i` is scaled by `tols[i].rel * |x_i| + tols[i].abs`, so a norm below
/// 1.0 means the step is, on average, inside the tolerance bands.
pub fn weighted_rms(dx: &[Real], x: &[Real], tols: &[Tolerances]) -> Real {
    if dx.is_empty() {
        return 0.0;
    }
    let sum: Real = dx
        .iter()
        .zip(x)
        .zip(tols)
        .map(|((d, v), tol)| {
            let w = tol.rel * v.abs() + tol.abs;
            let s = d / w;
            s * s
        })
        .sum();
    (sum / dx.len() as Real).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn weighted_rms_inside_band() {
        let tol = Tolerances {
            abs: 1e-3,
            rel: 1e-2,
        };
        let x = [100.0, 0.0];
        let dx = [0.5, 0.0005];
        assert!(weighted_rms(&dx, &x, &[tol; 2]) < 1.0);
        assert!(weighted_rms(&[2.0, 0.0], &x, &[tol; 2]) > 1.0);
        assert_eq!(weighted_rms(&[], &[], &[]), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
