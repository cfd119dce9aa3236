//! Skill scores relative to a baseline model.

use crate::error::{ForecastError, Result};

/// Percentage improvement of `model_crps` over `baseline_crps`.
///
/// `100 * (1 - model / baseline)`: positive when the model beats the
/// baseline, zero when they tie. A zero or non-finite baseline yields
/// `UndefinedSkillScore` rather than an infinite or NaN result.
///
/// # Example
/// ```
/// use pathcast::scoring::skill_score;
///
/// assert_eq!(skill_score(15.0, 20.0).unwrap(), 25.0);
/// assert_eq!(skill_score(20.0, 20.0).unwrap(), 0.0);
/// ```
pub fn skill_score(model_crps: f64, baseline_crps: f64) -> Result<f64> {
    if baseline_crps == 0.0 || !baseline_crps.is_finite() {
        return Err(ForecastError::UndefinedSkillScore {
            baseline: baseline_crps,
        });
    }
    if baseline_crps < 0.0 || model_crps < 0.0 || !model_crps.is_finite() {
        return Err(ForecastError::InvalidParameter(format!(
            "CRPS values must be finite and non-negative, got {model_crps} and {baseline_crps}"
        )));
    }
    Ok(100.0 * (1.0 - model_crps / baseline_crps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn baseline_against_itself_is_zero() {
        for c in [0.001, 1.0, 37.5, 1e6] {
            assert_eq!(skill_score(c, c).unwrap(), 0.0);
        }
    }

    #[test]
    fn worse_models_score_negative() {
        assert_relative_eq!(skill_score(30.0, 20.0).unwrap(), -50.0, epsilon = 1e-12);
        assert_relative_eq!(skill_score(0.0, 20.0).unwrap(), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_baseline_is_undefined() {
        assert_eq!(
            skill_score(1.0, 0.0).unwrap_err(),
            ForecastError::UndefinedSkillScore { baseline: 0.0 }
        );
        assert!(matches!(
            skill_score(1.0, f64::INFINITY),
            Err(ForecastError::UndefinedSkillScore { .. })
        ));
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(matches!(
            skill_score(-1.0, 2.0),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            skill_score(1.0, -2.0),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
