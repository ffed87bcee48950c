//! Report creation input and client-side validation.
//!
//! Validation runs before any network call; a rejected input never reaches
//! the transport.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Highest mileage accepted for a report.
pub const MAX_MILEAGE: i64 = 1_000_000;

/// Earliest model year accepted for a report.
pub const MIN_YEAR: i32 = 1900;

const VIN_LEN: usize = 17;
const MIN_ZIP_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Signed so out-of-range input can be represented and rejected.
    pub mileage: i64,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub listing_link: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl ReportInput {
    /// Premium reports carry location or free-text context and cost a credit.
    #[must_use]
    pub fn is_premium(&self) -> bool {
        [&self.zip_code, &self.listing_link, &self.additional_info]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Validate against the client-side rules.
    ///
    /// `current_year` bounds the model year at `current_year + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] describing the first rule violated.
    pub fn validate(&self, current_year: i32) -> Result<(), CoreError> {
        if self.make.trim().is_empty() {
            return Err(CoreError::Validation("make is required".into()));
        }
        if self.model.trim().is_empty() {
            return Err(CoreError::Validation("model is required".into()));
        }
        validate_mileage(self.mileage)?;
        if self.year < MIN_YEAR || self.year > current_year + 1 {
            return Err(CoreError::Validation(format!(
                "year must be between {MIN_YEAR} and {}",
                current_year + 1
            )));
        }
        if let Some(vin) = self.vin.as_deref().filter(|v| !v.trim().is_empty()) {
            validate_vin(vin)?;
        }
        if let Some(zip) = self.zip_code.as_deref().filter(|v| !v.trim().is_empty()) {
            if zip.trim().chars().count() < MIN_ZIP_LEN {
                return Err(CoreError::Validation(format!(
                    "zip code must be at least {MIN_ZIP_LEN} characters"
                )));
            }
        }
        Ok(())
    }

    /// Mileage as sent on the wire. Only meaningful after [`Self::validate`].
    #[must_use]
    pub fn wire_mileage(&self) -> u32 {
        u32::try_from(self.mileage).unwrap_or(0)
    }
}

/// Mileage must be a positive integer no greater than [`MAX_MILEAGE`].
///
/// # Errors
///
/// Returns [`CoreError::Validation`] when out of range.
pub fn validate_mileage(mileage: i64) -> Result<(), CoreError> {
    if mileage <= 0 || mileage > MAX_MILEAGE {
        return Err(CoreError::Validation(format!(
            "mileage must be between 1 and {MAX_MILEAGE}, got {mileage}"
        )));
    }
    Ok(())
}

fn validate_vin(vin: &str) -> Result<(), CoreError> {
    let vin = vin.trim();
    let ok = vin.len() == VIN_LEN
        && vin
            .chars()
            .all(|c| c.is_ascii_alphanumeric() && !matches!(c.to_ascii_uppercase(), 'I' | 'O' | 'Q'));
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "VIN must be {VIN_LEN} characters (letters I, O, Q are not allowed)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civic() -> ReportInput {
        ReportInput {
            make: "Honda".into(),
            model: "Civic".into(),
            year: 2018,
            mileage: 60_000,
            ..Default::default()
        }
    }

    #[test]
    fn valid_input_passes() {
        civic().validate(2026).expect("valid");
    }

    #[test]
    fn mileage_bounds() {
        for bad in [0, -5, MAX_MILEAGE + 1] {
            let input = ReportInput { mileage: bad, ..civic() };
            assert!(
                matches!(input.validate(2026), Err(CoreError::Validation(_))),
                "mileage {bad} should be rejected"
            );
        }
        for good in [1, MAX_MILEAGE] {
            let input = ReportInput { mileage: good, ..civic() };
            input.validate(2026).expect("in range");
        }
    }

    #[test]
    fn year_ceiling_is_next_model_year() {
        let input = ReportInput { year: 2027, ..civic() };
        input.validate(2026).expect("next model year allowed");
        let input = ReportInput { year: 2028, ..civic() };
        assert!(input.validate(2026).is_err());
    }

    #[test]
    fn vin_rules() {
        let input = ReportInput {
            vin: Some("1HGCM82633A004352".into()),
            ..civic()
        };
        input.validate(2026).expect("valid VIN");

        let input = ReportInput {
            vin: Some("1HGCM82633A00435O".into()),
            ..civic()
        };
        assert!(input.validate(2026).is_err());
    }

    #[test]
    fn zip_needs_five_characters() {
        for zip in ["94107", "90210-1234", "SW1A 1AA"] {
            let input = ReportInput {
                zip_code: Some(zip.into()),
                ..civic()
            };
            input.validate(2026).expect(zip);
        }
        let input = ReportInput {
            zip_code: Some("9410".into()),
            ..civic()
        };
        assert!(input.validate(2026).is_err());
    }

    #[test]
    fn premium_detection_ignores_blank_fields() {
        let input = ReportInput {
            zip_code: Some("  ".into()),
            ..civic()
        };
        assert!(!input.is_premium());
        let input = ReportInput {
            additional_info: Some("one owner".into()),
            ..civic()
        };
        assert!(input.is_premium());
    }

    #[test]
    fn blank_make_rejected() {
        let input = ReportInput {
            make: " ".into(),
            ..civic()
        };
        assert!(input.validate(2026).is_err());
    }
}
