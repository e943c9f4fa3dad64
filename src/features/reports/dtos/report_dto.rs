use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{
    AssignedReport, Report, ReportAssignment, ReportStatus, ReportWithAssignments,
};
use crate::shared::geo::Coordinates;
use crate::shared::validation::{validate_categories, PHONE_REGEX, POSTAL_CODE_REGEX};

/// Request DTO for submitting a report
///
/// Either coordinates or an address must be supplied; the address is
/// geocoded only when coordinates are missing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be 10-5000 characters"
    ))]
    pub description: String,

    #[validate(length(max = 255, message = "Street must not exceed 255 characters"))]
    pub street: Option<String>,

    #[validate(length(max = 128, message = "City must not exceed 128 characters"))]
    pub city: Option<String>,

    #[validate(regex(
        path = *POSTAL_CODE_REGEX,
        message = "Postal code must match NN-NNN"
    ))]
    pub postal_code: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(length(max = 255, message = "Name must not exceed 255 characters"))]
    pub reporter_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub reporter_email: Option<String>,

    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Invalid phone number"
    ))]
    pub reporter_phone: Option<String>,

    #[validate(custom(function = validate_categories))]
    pub animal_categories: Vec<String>,
}

impl CreateReportDto {
    /// Strip surrounding whitespace from the free-text fields so length
    /// checks see what will be stored
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

/// Full report, including reporter contact details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub location: Coordinates,
    pub image_url: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub reporter_phone: Option<String>,
    pub status: ReportStatus,
    pub animal_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            street: r.street,
            city: r.city,
            postal_code: r.postal_code,
            location: Coordinates {
                latitude: r.latitude,
                longitude: r.longitude,
            },
            image_url: r.image_url,
            reporter_name: r.reporter_name,
            reporter_email: r.reporter_email,
            reporter_phone: r.reporter_phone,
            status: r.status,
            animal_categories: r.animal_categories,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Response DTO for a single assignment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponseDto {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub position: i32,
    pub distance_km: f64,
    pub viewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ReportAssignment> for AssignmentResponseDto {
    fn from(a: ReportAssignment) -> Self {
        Self {
            id: a.id,
            organization_id: a.organization_id,
            position: a.position,
            distance_km: a.distance_km,
            viewed_at: a.viewed_at,
            created_at: a.created_at,
        }
    }
}

/// Report with the organizations it was assigned to, nearest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub assignments: Vec<AssignmentResponseDto>,
}

impl From<ReportWithAssignments> for ReportDetailResponseDto {
    fn from(r: ReportWithAssignments) -> Self {
        Self {
            report: r.report.into(),
            assignments: r.assignments.into_iter().map(|a| a.into()).collect(),
        }
    }
}

/// Public view of a report; reporter contact details are withheld
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub city: Option<String>,
    pub location: Coordinates,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub animal_categories: Vec<String>,
    pub assignment_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<ReportWithAssignments> for PublicReportResponseDto {
    fn from(r: ReportWithAssignments) -> Self {
        let report = r.report;
        Self {
            id: report.id,
            title: report.title,
            description: report.description,
            city: report.city,
            location: Coordinates {
                latitude: report.latitude,
                longitude: report.longitude,
            },
            image_url: report.image_url,
            status: report.status,
            animal_categories: report.animal_categories,
            assignment_count: r.assignments.len(),
            created_at: report.created_at,
        }
    }
}

/// A report in an organization's inbox
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignedReportResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub position: i32,
    pub distance_km: f64,
    pub viewed_at: Option<DateTime<Utc>>,
    pub assigned_at: DateTime<Utc>,
}

impl From<AssignedReport> for AssignedReportResponseDto {
    fn from(a: AssignedReport) -> Self {
        Self {
            report: a.report.into(),
            position: a.assignment.position,
            distance_km: a.assignment.distance_km,
            viewed_at: a.assignment.viewed_at,
            assigned_at: a.assignment.created_at,
        }
    }
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateReportDto {
        CreateReportDto {
            title: "Injured dog".to_string(),
            description: "Limping dog near the tram stop".to_string(),
            street: Some("Marszałkowska 1".to_string()),
            city: Some("Warszawa".to_string()),
            postal_code: Some("00-624".to_string()),
            latitude: None,
            longitude: None,
            image_url: Some("https://example.org/dog.jpg".to_string()),
            reporter_name: None,
            reporter_email: Some("jan@example.org".to_string()),
            reporter_phone: Some("+48 600 700 800".to_string()),
            animal_categories: vec!["dogs".to_string()],
        }
    }

    fn report() -> Report {
        Report {
            id: Uuid::now_v7(),
            title: "Cat on a roof".to_string(),
            description: "Stuck for two days".to_string(),
            street: None,
            city: Some("Łódź".to_string()),
            postal_code: None,
            latitude: 51.7592,
            longitude: 19.4560,
            image_url: None,
            reporter_name: Some("Anna".to_string()),
            reporter_email: Some("anna@example.org".to_string()),
            reporter_phone: None,
            status: ReportStatus::Open,
            animal_categories: vec!["cats".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_report_passes() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn test_invalid_fields_are_reported() {
        let mut dto = create_dto();
        dto.reporter_email = Some("not-an-email".to_string());
        dto.image_url = Some("dog.jpg".to_string());
        dto.animal_categories = vec![" ".to_string()];

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("reporter_email"));
        assert!(fields.contains_key("image_url"));
        assert!(fields.contains_key("animal_categories"));
    }

    #[test]
    fn test_length_checks_apply_to_trimmed_text() {
        let mut dto = create_dto();
        dto.title = "  ab  ".to_string();
        dto.description = "   too short   ".to_string();
        assert!(dto.clone().validate().is_ok());

        let trimmed = dto.trimmed();
        assert_eq!(trimmed.title, "ab");
        let errors = trimmed.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn test_public_view_hides_contact() {
        let dto = PublicReportResponseDto::from(ReportWithAssignments {
            report: report(),
            assignments: vec![],
        });

        let json = serde_json::to_value(&dto).unwrap();

        assert!(json.get("reporter_email").is_none());
        assert!(json.get("reporter_name").is_none());
        assert_eq!(json["assignment_count"], 0);
    }

    #[test]
    fn test_detail_flattens_report_fields() {
        let dto = ReportDetailResponseDto::from(ReportWithAssignments {
            report: report(),
            assignments: vec![],
        });

        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["reporter_email"], "anna@example.org");
        assert_eq!(json["location"]["latitude"], 51.7592);
        assert!(json["assignments"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_assignment_exposes_its_id() {
        let assignment = ReportAssignment {
            id: Uuid::now_v7(),
            report_id: Uuid::now_v7(),
            organization_id: Uuid::now_v7(),
            position: 1,
            distance_km: 2.5,
            viewed_at: None,
            created_at: Utc::now(),
        };
        let id = assignment.id;

        let json = serde_json::to_value(AssignmentResponseDto::from(assignment)).unwrap();

        assert_eq!(json["id"], serde_json::json!(id));
        assert_eq!(json["position"], 1);
    }
}
