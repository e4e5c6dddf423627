use crate::errors::AppError;
use crate::models::profile::{validate_gpa, GPA_SCALE};

/// Internship count at which the feature saturates.
pub const INTERNSHIP_CAP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcademicFeatures {
    pub gpa_normalized: f64,
    pub internship_normalized: f64,
}

/// GPA on the 10-point scale and internship count, both normalized to [0, 1].
/// Out-of-range GPA is rejected rather than clamped.
pub fn academic_features(gpa: f64, internships: u32) -> Result<AcademicFeatures, AppError> {
    validate_gpa(gpa)?;
    Ok(AcademicFeatures {
        gpa_normalized: gpa / GPA_SCALE,
        internship_normalized: (f64::from(internships) / f64::from(INTERNSHIP_CAP)).min(1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpa_is_divided_by_scale() {
        let f = academic_features(8.7, 0).unwrap();
        assert!((f.gpa_normalized - 0.87).abs() < 1e-12);
        assert_eq!(f.internship_normalized, 0.0);
    }

    #[test]
    fn test_internships_saturate_at_cap() {
        assert_eq!(academic_features(5.0, 1).unwrap().internship_normalized, 0.5);
        assert_eq!(academic_features(5.0, INTERNSHIP_CAP).unwrap().internship_normalized, 1.0);
        assert_eq!(academic_features(5.0, 7).unwrap().internship_normalized, 1.0);
    }

    #[test]
    fn test_out_of_range_gpa_is_rejected() {
        assert!(matches!(academic_features(11.0, 0), Err(AppError::Validation(_))));
        assert!(matches!(academic_features(-1.0, 0), Err(AppError::Validation(_))));
    }
}
