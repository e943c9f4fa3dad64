use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::organizations::models::{
    filter_eligible, CreateOrganization, EligibleOrganization, Organization,
    UpdateOrganizationSettings,
};

/// Read access used by the assignment engine
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Organizations accepting reports that handle at least one of `categories`
    async fn find_eligible(&self, categories: &[String]) -> Result<Vec<EligibleOrganization>>;
}

/// Registration and lookup of organizations
#[async_trait]
pub trait OrganizationRegistry: Send + Sync {
    async fn create(&self, data: &CreateOrganization) -> Result<Organization>;
    async fn get_by_id(&self, id: Uuid) -> Result<Organization>;
    async fn list(&self) -> Result<Vec<Organization>>;
    async fn update_settings(
        &self,
        id: Uuid,
        data: &UpdateOrganizationSettings,
    ) -> Result<Organization>;
}

const ORGANIZATION_COLUMNS: &str = r#"
    id, name, krs, email, phone, street, city, postal_code,
    latitude, longitude, accepts_reports, animal_categories,
    created_at, updated_at
"#;

/// PostgreSQL-backed organization storage
pub struct PgOrganizationRepository {
    pool: PgPool,
}

impl PgOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationDirectory for PgOrganizationRepository {
    async fn find_eligible(&self, categories: &[String]) -> Result<Vec<EligibleOrganization>> {
        let accepting = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations WHERE accepts_reports = TRUE ORDER BY id",
            ORGANIZATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find eligible organizations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(filter_eligible(accepting, categories))
    }
}

#[async_trait]
impl OrganizationRegistry for PgOrganizationRepository {
    async fn create(&self, data: &CreateOrganization) -> Result<Organization> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            r#"
            INSERT INTO organizations (
                id, name, krs, email, phone, street, city, postal_code,
                latitude, longitude, accepts_reports, animal_categories
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            ORGANIZATION_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(&data.krs)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.street)
        .bind(&data.city)
        .bind(&data.postal_code)
        .bind(data.location.map(|c| c.latitude))
        .bind(data.location.map(|c| c.longitude))
        .bind(data.accepts_reports)
        .bind(&data.animal_categories)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create organization: {:?}", e);
            AppError::from_write(e, "An organization with this KRS number already exists")
        })?;

        tracing::info!(
            "Registered organization: {} ({})",
            organization.id,
            organization.name
        );

        Ok(organization)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Organization> {
        sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations WHERE id = $1",
            ORGANIZATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get organization: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }

    async fn list(&self) -> Result<Vec<Organization>> {
        sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations ORDER BY name, id",
            ORGANIZATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list organizations: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update_settings(
        &self,
        id: Uuid,
        data: &UpdateOrganizationSettings,
    ) -> Result<Organization> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            r#"
            UPDATE organizations
            SET accepts_reports = COALESCE($2, accepts_reports),
                animal_categories = COALESCE($3, animal_categories),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ORGANIZATION_COLUMNS
        ))
        .bind(id)
        .bind(data.accepts_reports)
        .bind(&data.animal_categories)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update organization settings: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))?;

        tracing::info!(
            "Updated organization {} settings: accepts_reports={}, categories={:?}",
            id,
            organization.accepts_reports,
            organization.animal_categories
        );

        Ok(organization)
    }
}
