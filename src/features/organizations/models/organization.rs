use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::geo::Coordinates;

/// Database model for organization
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub krs: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accepts_reports: bool,
    pub animal_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn location(&self) -> Option<Coordinates> {
        Coordinates::from_columns(self.latitude, self.longitude)
    }

    /// Accepts reports and handles at least one of the given categories
    pub fn is_eligible_for(&self, categories: &[String]) -> bool {
        self.accepts_reports
            && self
                .animal_categories
                .iter()
                .any(|handled| categories.contains(handled))
    }
}

/// Data for registering a new organization
#[derive(Debug, Clone)]
pub struct CreateOrganization {
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
}

/// Partial update of the assignment-relevant settings
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganizationSettings {
    pub accepts_reports: Option<bool>,
    pub animal_categories: Option<Vec<String>>,
}

/// Organization as seen by the assignment engine
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleOrganization {
    pub id: Uuid,
    pub name: String,
    pub location: Option<Coordinates>,
}

impl From<Organization> for EligibleOrganization {
    fn from(o: Organization) -> Self {
        Self {
            location: o.location(),
            id: o.id,
            name: o.name,
        }
    }
}

/// Keep the organizations eligible for `categories`.
///
/// Unlocated organizations are kept; the assignment engine drops them.
pub fn filter_eligible<I>(organizations: I, categories: &[String]) -> Vec<EligibleOrganization>
where
    I: IntoIterator<Item = Organization>,
{
    organizations
        .into_iter()
        .filter(|o| o.is_eligible_for(categories))
        .map(EligibleOrganization::from)
        .collect()
}
