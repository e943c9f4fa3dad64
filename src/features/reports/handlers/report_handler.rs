use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::reports::dtos::{
    AssignedReportResponseDto, AssignmentResponseDto, CreateReportDto, PublicReportResponseDto,
    ReportDetailResponseDto, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a new report
///
/// The report is assigned to the nearest organizations that accept
/// reports for at least one of its animal categories.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created and assigned", body = ApiResponse<ReportDetailResponseDto>),
        (status = 400, description = "Validation error or location could not be resolved")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportDetailResponseDto>>)> {
    let dto = dto.trimmed();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.submit(dto).await?;
    let message = format!(
        "Report submitted to {} organization(s)",
        report.assignments.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report), Some(message), None)),
    ))
}

/// Get public report details
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<PublicReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<PublicReportResponseDto>>> {
    let report = service.get_public(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// List reports assigned to an organization, newest first
#[utoipa::path(
    get,
    path = "/api/organizations/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Assigned reports", body = ApiResponse<Vec<AssignedReportResponseDto>>),
        (status = 404, description = "Organization not found")
    ),
    tag = "reports"
)]
pub async fn list_organization_reports(
    State(service): State<Arc<ReportService>>,
    AppPath(org_id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<AssignedReportResponseDto>>>> {
    let reports = service.list_for_organization(org_id).await?;
    let meta = Meta::total(reports.len());
    Ok(Json(ApiResponse::success(Some(reports), None, Some(meta))))
}

/// Get full report details for an assigned organization
#[utoipa::path(
    get,
    path = "/api/organizations/{id}/reports/{report_id}",
    params(
        ("id" = Uuid, Path, description = "Organization ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 403, description = "Report is not assigned to the organization"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_organization_report(
    State(service): State<Arc<ReportService>>,
    AppPath((org_id, report_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = service.get_for_organization(org_id, report_id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update report status
#[utoipa::path(
    patch,
    path = "/api/organizations/{id}/reports/{report_id}/status",
    params(
        ("id" = Uuid, Path, description = "Organization ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Report is not assigned to the organization"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn update_report_status(
    State(service): State<Arc<ReportService>>,
    AppPath((org_id, report_id)): AppPath<(Uuid, Uuid)>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_status(org_id, report_id, dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(report),
        Some("Status updated".to_string()),
        None,
    )))
}

/// Mark a report as viewed by the organization
#[utoipa::path(
    post,
    path = "/api/organizations/{id}/reports/{report_id}/viewed",
    params(
        ("id" = Uuid, Path, description = "Organization ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Assignment marked viewed", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Report is not assigned to the organization"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn mark_report_viewed(
    State(service): State<Arc<ReportService>>,
    AppPath((org_id, report_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.mark_viewed(org_id, report_id).await?;
    Ok(Json(ApiResponse::success(Some(assignment), None, None)))
}

/// Delete a report and all of its assignments
#[utoipa::path(
    delete,
    path = "/api/organizations/{id}/reports/{report_id}",
    params(
        ("id" = Uuid, Path, description = "Organization ID"),
        ("report_id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 403, description = "Report is not assigned to the organization"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(service): State<Arc<ReportService>>,
    AppPath((org_id, report_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(org_id, report_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}
