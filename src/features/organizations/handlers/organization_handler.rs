use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::organizations::dtos::{
    OrganizationResponseDto, RegisterOrganizationDto, UpdateOrganizationSettingsDto,
};
use crate::features::organizations::services::OrganizationService;
use crate::shared::types::{ApiResponse, Meta};

/// Register a new organization
///
/// When no coordinates are given the address is geocoded; organizations
/// without a location never receive report assignments.
#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = RegisterOrganizationDto,
    responses(
        (status = 201, description = "Organization registered", body = ApiResponse<OrganizationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "KRS number already registered")
    ),
    tag = "organizations"
)]
pub async fn register_organization(
    State(service): State<Arc<OrganizationService>>,
    AppJson(dto): AppJson<RegisterOrganizationDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrganizationResponseDto>>)> {
    let dto = dto.trimmed();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let organization = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(organization),
            Some("Organization registered".to_string()),
            None,
        )),
    ))
}

/// List all organizations
#[utoipa::path(
    get,
    path = "/api/organizations",
    responses(
        (status = 200, description = "List of organizations", body = ApiResponse<Vec<OrganizationResponseDto>>)
    ),
    tag = "organizations"
)]
pub async fn list_organizations(
    State(service): State<Arc<OrganizationService>>,
) -> Result<Json<ApiResponse<Vec<OrganizationResponseDto>>>> {
    let organizations = service.list().await?;
    let meta = Meta::total(organizations.len());
    Ok(Json(ApiResponse::success(Some(organizations), None, Some(meta))))
}

/// Get organization by ID
#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    params(
        ("id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Organization found", body = ApiResponse<OrganizationResponseDto>),
        (status = 404, description = "Organization not found")
    ),
    tag = "organizations"
)]
pub async fn get_organization(
    State(service): State<Arc<OrganizationService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<OrganizationResponseDto>>> {
    let organization = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(organization), None, None)))
}

/// Update whether the organization accepts reports and which animals it handles
#[utoipa::path(
    patch,
    path = "/api/organizations/{id}/settings",
    params(
        ("id" = Uuid, Path, description = "Organization ID")
    ),
    request_body = UpdateOrganizationSettingsDto,
    responses(
        (status = 200, description = "Settings updated", body = ApiResponse<OrganizationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Organization not found")
    ),
    tag = "organizations"
)]
pub async fn update_organization_settings(
    State(service): State<Arc<OrganizationService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateOrganizationSettingsDto>,
) -> Result<Json<ApiResponse<OrganizationResponseDto>>> {
    let organization = service.update_settings(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(organization),
        Some("Settings updated".to_string()),
        None,
    )))
}
