mod report;
mod report_assignment;

pub use report::{NewReport, Report, ReportStatus};
pub use report_assignment::{
    AssignedReport, NewAssignment, ReportAssignment, ReportWithAssignments,
};
