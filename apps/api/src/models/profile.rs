use serde::Deserialize;

use crate::errors::AppError;

/// Highest GPA on the accepted grading scale.
pub const GPA_SCALE: f64 = 10.0;

/// The subject of a scoring request. Built per request, never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub github_username: String,
    pub gpa: f64,
    pub internships: u32,
    #[serde(default)]
    pub resume_text: String,
}

impl Profile {
    /// Rejects caller input that must not reach the scoring computation.
    pub fn validate(&self) -> Result<(), AppError> {
        let username = self.github_username.trim();
        if username.is_empty() {
            return Err(AppError::Validation(
                "github_username cannot be empty".to_string(),
            ));
        }
        // GitHub logins are alphanumeric with single hyphens; the value lands in a URL path
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(AppError::Validation(format!(
                "github_username '{username}' contains invalid characters"
            )));
        }
        validate_gpa(self.gpa)?;
        if self.resume_text.trim().is_empty() {
            return Err(AppError::Validation(
                "resume_text cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn validate_gpa(gpa: f64) -> Result<(), AppError> {
    if !gpa.is_finite() || !(0.0..=GPA_SCALE).contains(&gpa) {
        return Err(AppError::Validation(format!(
            "gpa must be between 0 and {GPA_SCALE}, got {gpa}"
        )));
    }
    Ok(())
}
