use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::organizations::models::Organization;
use crate::shared::geo::Coordinates;
use crate::shared::validation::{validate_categories, KRS_REGEX, PHONE_REGEX, POSTAL_CODE_REGEX};

/// Request DTO for organization registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterOrganizationDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(regex(
        path = *KRS_REGEX,
        message = "KRS number must be exactly 10 digits"
    ))]
    pub krs: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Invalid phone number"
    ))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Street must not exceed 255 characters"))]
    pub street: Option<String>,

    #[validate(length(max = 128, message = "City must not exceed 128 characters"))]
    pub city: Option<String>,

    #[validate(regex(
        path = *POSTAL_CODE_REGEX,
        message = "Postal code must match NN-NNN"
    ))]
    pub postal_code: Option<String>,

    /// Skips geocoding when present
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(default = "default_accepts_reports")]
    pub accepts_reports: bool,

    #[validate(custom(function = validate_categories))]
    pub animal_categories: Vec<String>,
}

impl RegisterOrganizationDto {
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

fn default_accepts_reports() -> bool {
    true
}

/// Request DTO for changing assignment-relevant settings
///
/// Omitted fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrganizationSettingsDto {
    pub accepts_reports: Option<bool>,
    pub animal_categories: Option<Vec<String>>,
}

/// Response DTO for organization
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationResponseDto {
    pub id: Uuid,
    pub name: String,
    pub krs: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub location: Option<Coordinates>,
    pub accepts_reports: bool,
    pub animal_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponseDto {
    fn from(o: Organization) -> Self {
        Self {
            location: o.location(),
            id: o.id,
            name: o.name,
            krs: o.krs,
            email: o.email,
            phone: o.phone,
            street: o.street,
            city: o.city,
            postal_code: o.postal_code,
            accepts_reports: o.accepts_reports,
            animal_categories: o.animal_categories,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}
