use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Report;

/// Database model for the report-organization link
#[derive(Debug, Clone, FromRow)]
pub struct ReportAssignment {
    pub id: Uuid,
    pub report_id: Uuid,
    pub organization_id: Uuid,
    /// 1-based rank, nearest organization first
    pub position: i32,
    pub distance_km: f64,
    pub viewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating an assignment alongside its report
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub organization_id: Uuid,
    pub position: i32,
    pub distance_km: f64,
}

/// A report together with its assignments, ordered by position
#[derive(Debug, Clone)]
pub struct ReportWithAssignments {
    pub report: Report,
    pub assignments: Vec<ReportAssignment>,
}

/// A report as seen from one assigned organization
#[derive(Debug, Clone)]
pub struct AssignedReport {
    pub assignment: ReportAssignment,
    pub report: Report,
}
