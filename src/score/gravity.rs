use crate::ScoreError;

/// Floor applied to every value before it is raised to the friction
/// coefficient. Coincident points would otherwise divide by zero.
pub const MIN_DISTANCE_KM: f64 = 0.001;

/// How distances are rescaled before the power-law decay is applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Normalization {
    /// Exponentiate raw kilometres.
    #[default]
    Off,
    /// Rescale with `(d - min) / (max - min)` and exponentiate the result.
    Bounds { min: f64, max: f64 },
}

impl Normalization {
    /// The fixed [0, 1] bounds, which leave kilometre values unchanged.
    pub const UNIT: Self = Self::Bounds { min: 0.0, max: 1.0 };

    pub fn bounds(min: f64, max: f64) -> Result<Self, ScoreError> {
        let normalization = Self::Bounds { min, max };
        normalization.check()?;
        Ok(normalization)
    }

    pub fn check(&self) -> Result<(), ScoreError> {
        match *self {
            Self::Off => Ok(()),
            Self::Bounds { min, max } => {
                if min.is_finite() && max.is_finite() && max > min {
                    Ok(())
                } else {
                    Err(ScoreError::InvalidNormalization { min, max })
                }
            }
        }
    }

    pub fn apply(&self, distance: f64) -> f64 {
        match *self {
            Self::Off => distance,
            Self::Bounds { min, max } => (distance - min) / (max - min),
        }
    }
}

/// `1 / v^coeff`, kept inside the positive finite range so that every
/// retained amenity contributes something, whatever the coefficient.
fn decay(v: f64, coeff: f64) -> f64 {
    (-coeff * v.ln()).exp().clamp(f64::MIN_POSITIVE, f64::MAX)
}

/// Hansen gravity score: the sum of `1 / v^coeff` over the (normalized,
/// clamped) distances. Empty input scores zero; anything else scores a
/// positive finite value.
pub fn hansen_score(distances: &[f64], coeff: f64, normalization: Normalization) -> f64 {
    distances
        .iter()
        .map(|d| normalization.apply(*d).max(MIN_DISTANCE_KM))
        .map(|v| decay(v, coeff))
        .sum::<f64>()
        .min(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < 1e-9
    }

    #[test]
    fn empty_scores_zero() {
        assert_eq!(hansen_score(&[], 1.75, Normalization::Off), 0.0);
        assert_eq!(hansen_score(&[], 2.0, Normalization::UNIT), 0.0);
    }

    #[test]
    fn sums_inverse_powers() {
        let score = hansen_score(&[2.0, 4.0], 2.0, Normalization::Off);
        assert!(close(score, 0.25 + 0.0625));

        let score = hansen_score(&[3.0943], 1.75, Normalization::Off);
        assert!(close(score, 3.0943f64.powf(-1.75)));
    }

    #[test]
    fn unit_bounds_match_raw_distances() {
        let distances = [0.4, 1.3, 7.9];
        assert_eq!(
            hansen_score(&distances, 1.75, Normalization::UNIT),
            hansen_score(&distances, 1.75, Normalization::Off)
        );
    }

    #[test]
    fn custom_bounds_rescale_before_decay() {
        let normalization = Normalization::bounds(0.0, 10.0).unwrap();
        assert_eq!(normalization.apply(5.0), 0.5);

        let score = hansen_score(&[5.0], 2.0, normalization);
        assert!(close(score, 4.0));
    }

    #[test]
    fn rejects_bad_bounds() {
        assert_eq!(
            Normalization::bounds(1.0, 1.0),
            Err(ScoreError::InvalidNormalization { min: 1.0, max: 1.0 })
        );
        assert!(Normalization::bounds(0.0, f64::INFINITY).is_err());
        assert!(Normalization::Off.check().is_ok());
    }

    #[test]
    fn zero_distance_is_clamped() {
        let score = hansen_score(&[0.0], 1.75, Normalization::Off);
        assert!(score.is_finite());
        assert!(close(score, MIN_DISTANCE_KM.powf(-1.75)));

        // values below the lower bound normalize to negatives and clamp too
        let normalization = Normalization::bounds(1.0, 2.0).unwrap();
        assert_eq!(
            hansen_score(&[0.5], 1.75, normalization),
            hansen_score(&[0.0], 1.75, Normalization::Off)
        );
    }

    #[test]
    fn extreme_coefficients_stay_finite() {
        // 9 km to the 400th power overflows a plain powf
        let far = hansen_score(&[9.0], 400.0, Normalization::Off);
        assert!(far > 0.0);
        assert!(far.is_finite());

        // a clamped coincident point to the 120th power underflows one
        let near = hansen_score(&[0.0, 0.0], 120.0, Normalization::Off);
        assert!(near > 0.0);
        assert_eq!(near, f64::MAX);
    }

    #[test]
    fn coefficient_monotonicity() {
        // beyond 1 km a larger exponent shrinks each term
        let far = [1.5, 3.0, 9.0];
        let mut last = f64::INFINITY;
        for coeff in [0.5, 1.0, 1.75, 2.0, 3.0] {
            let score = hansen_score(&far, coeff, Normalization::Off);
            assert!(score <= last);
            last = score;
        }

        // under 1 km the inversion flips the ordering
        let near = [0.2, 0.5, 0.9];
        let mut last = 0.0;
        for coeff in [0.5, 1.0, 1.75, 2.0, 3.0] {
            let score = hansen_score(&near, coeff, Normalization::Off);
            assert!(score >= last);
            last = score;
        }
    }
}
