mod organization_repository;
mod organization_service;

pub use organization_repository::{
    OrganizationDirectory, OrganizationRegistry, PgOrganizationRepository,
};
pub use organization_service::OrganizationService;
