use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    AssignedReport, NewAssignment, NewReport, Report, ReportAssignment, ReportStatus,
    ReportWithAssignments,
};

/// Persistence for reports and their organization assignments
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert the report and all its assignments in a single transaction.
    ///
    /// On any failure nothing is persisted.
    async fn create_with_assignments(
        &self,
        report: NewReport,
        assignments: &[NewAssignment],
    ) -> Result<ReportWithAssignments>;

    async fn get_by_id(&self, id: Uuid) -> Result<ReportWithAssignments>;

    async fn find_assignment(
        &self,
        report_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<ReportAssignment>>;

    /// Reports assigned to an organization, newest first
    async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<AssignedReport>>;

    async fn update_status(&self, report_id: Uuid, status: ReportStatus) -> Result<Report>;

    /// Set `viewed_at` if unset; an earlier timestamp is kept
    async fn mark_viewed(&self, report_id: Uuid, organization_id: Uuid)
        -> Result<ReportAssignment>;

    /// Delete a report; its assignments go with it
    async fn delete(&self, report_id: Uuid) -> Result<()>;
}

const REPORT_COLUMNS: &str = r#"
    id, title, description, street, city, postal_code, latitude, longitude,
    image_url, reporter_name, reporter_email, reporter_phone, status,
    animal_categories, created_at, updated_at
"#;

const ASSIGNMENT_COLUMNS: &str = r#"
    id, report_id, organization_id, position, distance_km, viewed_at, created_at
"#;

/// PostgreSQL-backed report storage
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn assignments_for(&self, report_id: Uuid) -> Result<Vec<ReportAssignment>> {
        sqlx::query_as::<_, ReportAssignment>(&format!(
            "SELECT {} FROM report_assignments WHERE report_id = $1 ORDER BY position",
            ASSIGNMENT_COLUMNS
        ))
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report assignments: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn create_with_assignments(
        &self,
        report: NewReport,
        assignments: &[NewAssignment],
    ) -> Result<ReportWithAssignments> {
        // Dropping `tx` without commit rolls everything back
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let created = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (
                id, title, description, street, city, postal_code,
                latitude, longitude, image_url,
                reporter_name, reporter_email, reporter_phone,
                status, animal_categories
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(&report.title)
        .bind(&report.description)
        .bind(&report.street)
        .bind(&report.city)
        .bind(&report.postal_code)
        .bind(report.location.latitude)
        .bind(report.location.longitude)
        .bind(&report.image_url)
        .bind(&report.reporter_name)
        .bind(&report.reporter_email)
        .bind(&report.reporter_phone)
        .bind(ReportStatus::Open)
        .bind(&report.animal_categories)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        let mut saved = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let row = sqlx::query_as::<_, ReportAssignment>(&format!(
                r#"
                INSERT INTO report_assignments (id, report_id, organization_id, position, distance_km)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {}
                "#,
                ASSIGNMENT_COLUMNS
            ))
            .bind(Uuid::now_v7())
            .bind(created.id)
            .bind(assignment.organization_id)
            .bind(assignment.position)
            .bind(assignment.distance_km)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report assignment: {:?}", e);
                AppError::from_write(
                    e,
                    "Organization is already assigned to this report",
                )
            })?;
            saved.push(row);
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit report transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Created report {} with {} assignment(s)",
            created.id,
            saved.len()
        );

        Ok(ReportWithAssignments {
            report: created,
            assignments: saved,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<ReportWithAssignments> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {} FROM reports WHERE id = $1",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        let assignments = self.assignments_for(id).await?;

        Ok(ReportWithAssignments {
            report,
            assignments,
        })
    }

    async fn find_assignment(
        &self,
        report_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<ReportAssignment>> {
        sqlx::query_as::<_, ReportAssignment>(&format!(
            "SELECT {} FROM report_assignments WHERE report_id = $1 AND organization_id = $2",
            ASSIGNMENT_COLUMNS
        ))
        .bind(report_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find report assignment: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<AssignedReport>> {
        let assignments = sqlx::query_as::<_, ReportAssignment>(&format!(
            "SELECT {} FROM report_assignments WHERE organization_id = $1",
            ASSIGNMENT_COLUMNS
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list organization assignments: {:?}", e);
            AppError::Database(e)
        })?;

        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let report_ids: Vec<Uuid> = assignments.iter().map(|a| a.report_id).collect();
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {} FROM reports WHERE id = ANY($1) ORDER BY created_at DESC, id DESC",
            REPORT_COLUMNS
        ))
        .bind(&report_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list assigned reports: {:?}", e);
            AppError::Database(e)
        })?;

        // Keep the report ordering; a report deleted in between is skipped
        let mut by_report: std::collections::HashMap<Uuid, ReportAssignment> = assignments
            .into_iter()
            .map(|a| (a.report_id, a))
            .collect();

        Ok(reports
            .into_iter()
            .filter_map(|report| {
                by_report
                    .remove(&report.id)
                    .map(|assignment| AssignedReport { assignment, report })
            })
            .collect())
    }

    async fn update_status(&self, report_id: Uuid, status: ReportStatus) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(report_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;

        tracing::info!("Report {} status changed to {}", report_id, status);

        Ok(report)
    }

    async fn mark_viewed(
        &self,
        report_id: Uuid,
        organization_id: Uuid,
    ) -> Result<ReportAssignment> {
        sqlx::query_as::<_, ReportAssignment>(&format!(
            r#"
            UPDATE report_assignments
            SET viewed_at = COALESCE(viewed_at, NOW())
            WHERE report_id = $1 AND organization_id = $2
            RETURNING {}
            "#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(report_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark report viewed: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Report {} is not assigned to organization {}",
                report_id, organization_id
            ))
        })
    }

    async fn delete(&self, report_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report {} not found", report_id)));
        }

        tracing::info!("Deleted report {}", report_id);
        Ok(())
    }
}
