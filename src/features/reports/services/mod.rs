mod assignment_engine;
mod report_service;
mod report_store;

pub use assignment_engine::ReportAssignmentEngine;
pub use report_service::ReportService;
pub use report_store::{PgReportStore, ReportStore};
