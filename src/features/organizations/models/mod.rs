mod organization;

pub use organization::{
    filter_eligible, CreateOrganization, EligibleOrganization, Organization,
    UpdateOrganizationSettings,
};
