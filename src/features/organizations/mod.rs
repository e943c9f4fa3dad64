//! Organizations registered to receive animal abuse reports.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/organizations` | Register an organization |
//! | GET | `/api/organizations` | List organizations |
//! | GET | `/api/organizations/{id}` | Get organization |
//! | PATCH | `/api/organizations/{id}/settings` | Update report intake settings |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{
    OrganizationDirectory, OrganizationRegistry, OrganizationService, PgOrganizationRepository,
};
