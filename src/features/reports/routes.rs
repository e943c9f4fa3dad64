use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// Submission and the public view are open; the organization routes
/// check that the report is assigned to the organization in the path.
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::create_report))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route(
            "/api/organizations/{id}/reports",
            get(handlers::list_organization_reports),
        )
        .route(
            "/api/organizations/{id}/reports/{report_id}",
            get(handlers::get_organization_report).delete(handlers::delete_report),
        )
        .route(
            "/api/organizations/{id}/reports/{report_id}/status",
            patch(handlers::update_report_status),
        )
        .route(
            "/api/organizations/{id}/reports/{report_id}/viewed",
            post(handlers::mark_report_viewed),
        )
        .with_state(service)
}
