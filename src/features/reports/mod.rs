//! Animal abuse reports and their assignment to nearby organizations.
//!
//! A submitted report is geolocated (explicit coordinates or a geocoded
//! address), matched against organizations that accept reports for its
//! animal categories, and assigned to the nearest of them in one transaction.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports` | Submit a report |
//! | GET | `/api/reports/{id}` | Public report view |
//! | GET | `/api/organizations/{id}/reports` | Reports assigned to an organization |
//! | GET | `/api/organizations/{id}/reports/{report_id}` | Full report for an assigned organization |
//! | PATCH | `/api/organizations/{id}/reports/{report_id}/status` | Update status |
//! | POST | `/api/organizations/{id}/reports/{report_id}/viewed` | Mark as viewed |
//! | DELETE | `/api/organizations/{id}/reports/{report_id}` | Delete report |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{PgReportStore, ReportAssignmentEngine, ReportService};
