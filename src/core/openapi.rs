use utoipa::{Modify, OpenApi};

use crate::features::organizations::{
    dtos as organizations_dtos, handlers as organizations_handlers,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::geo::Coordinates;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Organizations
        organizations_handlers::organization_handler::register_organization,
        organizations_handlers::organization_handler::list_organizations,
        organizations_handlers::organization_handler::get_organization,
        organizations_handlers::organization_handler::update_organization_settings,
        // Reports (public)
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::get_report,
        // Reports (organization)
        reports_handlers::report_handler::list_organization_reports,
        reports_handlers::report_handler::get_organization_report,
        reports_handlers::report_handler::update_report_status,
        reports_handlers::report_handler::mark_report_viewed,
        reports_handlers::report_handler::delete_report,
    ),
    components(
        schemas(
            // Shared
            Meta,
            Coordinates,
            // Organizations
            organizations_dtos::RegisterOrganizationDto,
            organizations_dtos::UpdateOrganizationSettingsDto,
            organizations_dtos::OrganizationResponseDto,
            ApiResponse<organizations_dtos::OrganizationResponseDto>,
            ApiResponse<Vec<organizations_dtos::OrganizationResponseDto>>,
            // Reports
            reports_models::ReportStatus,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::AssignmentResponseDto,
            reports_dtos::ReportDetailResponseDto,
            reports_dtos::PublicReportResponseDto,
            reports_dtos::AssignedReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            ApiResponse<reports_dtos::PublicReportResponseDto>,
            ApiResponse<reports_dtos::AssignmentResponseDto>,
            ApiResponse<Vec<reports_dtos::AssignedReportResponseDto>>,
        )
    ),
    tags(
        (name = "organizations", description = "Animal welfare organizations receiving reports"),
        (name = "reports", description = "Animal abuse reports and their assignments"),
    ),
    info(
        title = "AnimalAllies API",
        version = "0.1.0",
        description = "API documentation for AnimalAllies",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/organizations",
            "/api/organizations/{id}",
            "/api/organizations/{id}/settings",
            "/api/reports",
            "/api/reports/{id}",
            "/api/organizations/{id}/reports",
            "/api/organizations/{id}/reports/{report_id}",
            "/api/organizations/{id}/reports/{report_id}/status",
            "/api/organizations/{id}/reports/{report_id}/viewed",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_info_modifier_overrides_defaults() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging build".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
