use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::organizations::OrganizationRegistry;
use crate::features::reports::dtos::{
    AssignedReportResponseDto, AssignmentResponseDto, CreateReportDto, PublicReportResponseDto,
    ReportDetailResponseDto, ReportResponseDto,
};
use crate::features::reports::models::{NewAssignment, NewReport, ReportStatus};
use crate::features::reports::services::{ReportAssignmentEngine, ReportStore};
use crate::modules::geocoding::{Geocoder, PostalAddress};
use crate::shared::geo::{parse_location, Coordinates};
use crate::shared::validation::normalize_categories;

/// Service for report submission and organization-side report handling
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    organizations: Arc<dyn OrganizationRegistry>,
    geocoder: Arc<dyn Geocoder>,
    engine: Arc<ReportAssignmentEngine>,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        organizations: Arc<dyn OrganizationRegistry>,
        geocoder: Arc<dyn Geocoder>,
        engine: Arc<ReportAssignmentEngine>,
    ) -> Self {
        Self {
            store,
            organizations,
            geocoder,
            engine,
        }
    }

    /// Submit a report and assign it to the nearest eligible organizations.
    ///
    /// The location is resolved first; if that fails nothing is stored.
    /// Zero eligible organizations still creates the report.
    pub async fn submit(&self, dto: CreateReportDto) -> Result<ReportDetailResponseDto> {
        let animal_categories = normalize_categories(&dto.animal_categories);
        if animal_categories.is_empty() {
            return Err(AppError::Validation(
                "At least one animal category is required".to_string(),
            ));
        }

        let location = self.resolve_location(&dto).await?;

        let selected = self.engine.select(&location, &animal_categories).await?;
        let assignments: Vec<NewAssignment> = selected
            .iter()
            .enumerate()
            .map(|(index, ranked)| NewAssignment {
                organization_id: ranked.organization_id,
                position: index as i32 + 1,
                distance_km: ranked.distance_km,
            })
            .collect();

        if assignments.is_empty() {
            tracing::warn!(
                "No eligible organization for categories {:?}; report stored unassigned",
                animal_categories
            );
        }

        let report = NewReport {
            title: dto.title.trim().to_string(),
            description: dto.description.trim().to_string(),
            street: dto.street,
            city: dto.city,
            postal_code: dto.postal_code,
            location,
            image_url: dto.image_url,
            reporter_name: dto.reporter_name,
            reporter_email: dto.reporter_email,
            reporter_phone: dto.reporter_phone,
            animal_categories,
        };

        let created = self
            .store
            .create_with_assignments(report, &assignments)
            .await?;

        Ok(created.into())
    }

    /// Explicit coordinates win; otherwise the address is geocoded
    async fn resolve_location(&self, dto: &CreateReportDto) -> Result<Coordinates> {
        if let Some(location) = parse_location(dto.latitude, dto.longitude)? {
            return Ok(location);
        }

        let address = PostalAddress::new(
            dto.street.clone(),
            dto.city.clone(),
            dto.postal_code.clone(),
        );
        if address.is_empty() {
            return Err(AppError::GeolocationUnresolvable(
                "Either an address or coordinates must be provided".to_string(),
            ));
        }

        self.geocoder.resolve(&address).await.ok_or_else(|| {
            AppError::GeolocationUnresolvable(
                "The given address could not be located".to_string(),
            )
        })
    }

    pub async fn get_public(&self, id: Uuid) -> Result<PublicReportResponseDto> {
        Ok(self.store.get_by_id(id).await?.into())
    }

    pub async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<AssignedReportResponseDto>> {
        // 404 for unknown organizations rather than an empty inbox
        self.organizations.get_by_id(organization_id).await?;

        let reports = self.store.list_for_organization(organization_id).await?;
        Ok(reports.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_for_organization(
        &self,
        organization_id: Uuid,
        report_id: Uuid,
    ) -> Result<ReportDetailResponseDto> {
        let report = self.store.get_by_id(report_id).await?;
        if !report
            .assignments
            .iter()
            .any(|a| a.organization_id == organization_id)
        {
            return Err(not_assigned(organization_id, report_id));
        }
        Ok(report.into())
    }

    pub async fn update_status(
        &self,
        organization_id: Uuid,
        report_id: Uuid,
        status: ReportStatus,
    ) -> Result<ReportResponseDto> {
        self.ensure_assigned(organization_id, report_id).await?;
        Ok(self.store.update_status(report_id, status).await?.into())
    }

    pub async fn mark_viewed(
        &self,
        organization_id: Uuid,
        report_id: Uuid,
    ) -> Result<AssignmentResponseDto> {
        self.ensure_assigned(organization_id, report_id).await?;
        Ok(self
            .store
            .mark_viewed(report_id, organization_id)
            .await?
            .into())
    }

    pub async fn delete(&self, organization_id: Uuid, report_id: Uuid) -> Result<()> {
        self.ensure_assigned(organization_id, report_id).await?;
        self.store.delete(report_id).await?;

        tracing::info!(
            "Report {} deleted by organization {}",
            report_id,
            organization_id
        );
        Ok(())
    }

    /// 404 if the report is missing, 403 if it exists but is not assigned
    async fn ensure_assigned(&self, organization_id: Uuid, report_id: Uuid) -> Result<()> {
        self.store.get_by_id(report_id).await?;

        match self
            .store
            .find_assignment(report_id, organization_id)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(not_assigned(organization_id, report_id)),
        }
    }
}

fn not_assigned(organization_id: Uuid, report_id: Uuid) -> AppError {
    AppError::Forbidden(format!(
        "Report {} is not assigned to organization {}",
        report_id, organization_id
    ))
}
