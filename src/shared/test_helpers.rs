//! In-memory fakes of the storage and geocoding collaborators.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use fake::{faker::company::en::CompanyName, Fake};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::organizations::models::{
    filter_eligible, CreateOrganization, EligibleOrganization, Organization,
    UpdateOrganizationSettings,
};
use crate::features::organizations::{OrganizationDirectory, OrganizationRegistry};
use crate::features::reports::models::{
    AssignedReport, NewAssignment, NewReport, Report, ReportAssignment, ReportStatus,
    ReportWithAssignments,
};
use crate::features::reports::services::ReportStore;
use crate::modules::geocoding::{Geocoder, PostalAddress};
use crate::shared::geo::Coordinates;

/// Organization with a generated name at the given location
pub fn organization_at(
    location: Coordinates,
    accepts_reports: bool,
    categories: &[&str],
) -> Organization {
    Organization {
        id: Uuid::new_v4(),
        name: CompanyName().fake(),
        krs: None,
        email: None,
        phone: None,
        street: None,
        city: None,
        postal_code: None,
        latitude: Some(location.latitude),
        longitude: Some(location.longitude),
        accepts_reports,
        animal_categories: categories.iter().map(|c| c.to_string()).collect(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct InMemoryOrganizations {
    organizations: Mutex<Vec<Organization>>,
}

impl InMemoryOrganizations {
    pub fn insert(&self, organization: Organization) -> Organization {
        self.organizations.lock().unwrap().push(organization.clone());
        organization
    }

    pub fn count(&self) -> usize {
        self.organizations.lock().unwrap().len()
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryOrganizations {
    async fn find_eligible(&self, categories: &[String]) -> Result<Vec<EligibleOrganization>> {
        let organizations = self.organizations.lock().unwrap().clone();
        Ok(filter_eligible(organizations, categories))
    }
}

#[async_trait]
impl OrganizationRegistry for InMemoryOrganizations {
    async fn create(&self, data: &CreateOrganization) -> Result<Organization> {
        let mut organizations = self.organizations.lock().unwrap();
        if data.krs.is_some() && organizations.iter().any(|o| o.krs == data.krs) {
            return Err(AppError::Conflict(
                "An organization with this KRS number already exists".to_string(),
            ));
        }

        let organization = Organization {
            id: Uuid::now_v7(),
            name: data.name.clone(),
            krs: data.krs.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            street: data.street.clone(),
            city: data.city.clone(),
            postal_code: data.postal_code.clone(),
            latitude: data.location.map(|c| c.latitude),
            longitude: data.location.map(|c| c.longitude),
            accepts_reports: data.accepts_reports,
            animal_categories: data.animal_categories.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        organizations.push(organization.clone());
        Ok(organization)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Organization> {
        self.organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }

    async fn list(&self) -> Result<Vec<Organization>> {
        let mut organizations = self.organizations.lock().unwrap().clone();
        organizations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(organizations)
    }

    async fn update_settings(
        &self,
        id: Uuid,
        data: &UpdateOrganizationSettings,
    ) -> Result<Organization> {
        let mut organizations = self.organizations.lock().unwrap();
        let organization = organizations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))?;

        if let Some(accepts_reports) = data.accepts_reports {
            organization.accepts_reports = accepts_reports;
        }
        if let Some(categories) = &data.animal_categories {
            organization.animal_categories = categories.clone();
        }
        organization.updated_at = Utc::now();
        Ok(organization.clone())
    }
}

/// Geocoder returning a fixed answer and counting calls
pub struct StubGeocoder {
    result: Option<Coordinates>,
    calls: Arc<AtomicUsize>,
}

impl StubGeocoder {
    pub fn found(location: Coordinates) -> Self {
        Self {
            result: Some(location),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn not_found() -> Self {
        Self {
            result: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, _address: &PostalAddress) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

#[derive(Default)]
struct StoredReports {
    reports: Vec<Report>,
    assignments: Vec<ReportAssignment>,
}

/// Report store enforcing the unique (report, organization) pair.
///
/// `fail_writes` makes every create fail the way a dropped connection would.
#[derive(Default)]
pub struct InMemoryReportStore {
    state: Mutex<StoredReports>,
    fail_writes: AtomicBool,
}

impl InMemoryReportStore {
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn report_count(&self) -> usize {
        self.state.lock().unwrap().reports.len()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn create_with_assignments(
        &self,
        report: NewReport,
        assignments: &[NewAssignment],
    ) -> Result<ReportWithAssignments> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut organization_ids: Vec<Uuid> =
            assignments.iter().map(|a| a.organization_id).collect();
        organization_ids.sort();
        organization_ids.dedup();
        if organization_ids.len() != assignments.len() {
            return Err(AppError::Conflict(
                "Organization is already assigned to this report".to_string(),
            ));
        }

        let now = Utc::now();
        let created = Report {
            id: Uuid::now_v7(),
            title: report.title,
            description: report.description,
            street: report.street,
            city: report.city,
            postal_code: report.postal_code,
            latitude: report.location.latitude,
            longitude: report.location.longitude,
            image_url: report.image_url,
            reporter_name: report.reporter_name,
            reporter_email: report.reporter_email,
            reporter_phone: report.reporter_phone,
            status: ReportStatus::Open,
            animal_categories: report.animal_categories,
            created_at: now,
            updated_at: now,
        };
        let saved: Vec<ReportAssignment> = assignments
            .iter()
            .map(|a| ReportAssignment {
                id: Uuid::now_v7(),
                report_id: created.id,
                organization_id: a.organization_id,
                position: a.position,
                distance_km: a.distance_km,
                viewed_at: None,
                created_at: now,
            })
            .collect();

        let mut state = self.state.lock().unwrap();
        state.reports.push(created.clone());
        state.assignments.extend(saved.iter().cloned());

        Ok(ReportWithAssignments {
            report: created,
            assignments: saved,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<ReportWithAssignments> {
        let state = self.state.lock().unwrap();
        let report = state
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        let mut assignments: Vec<ReportAssignment> = state
            .assignments
            .iter()
            .filter(|a| a.report_id == id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.position);

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
        Ok(self
            .state
            .lock()
            .unwrap()
            .assignments
            .iter()
            .find(|a| a.report_id == report_id && a.organization_id == organization_id)
            .cloned())
    }

    async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<AssignedReport>> {
        let state = self.state.lock().unwrap();
        let mut assigned: Vec<AssignedReport> = state
            .assignments
            .iter()
            .filter(|a| a.organization_id == organization_id)
            .filter_map(|a| {
                state
                    .reports
                    .iter()
                    .find(|r| r.id == a.report_id)
                    .map(|r| AssignedReport {
                        assignment: a.clone(),
                        report: r.clone(),
                    })
            })
            .collect();
        assigned.sort_by(|a, b| {
            b.report
                .created_at
                .cmp(&a.report.created_at)
                .then(b.report.id.cmp(&a.report.id))
        });
        Ok(assigned)
    }

    async fn update_status(&self, report_id: Uuid, status: ReportStatus) -> Result<Report> {
        let mut state = self.state.lock().unwrap();
        let report = state
            .reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;

        report.status = status;
        report.updated_at = Utc::now();
        Ok(report.clone())
    }

    async fn mark_viewed(
        &self,
        report_id: Uuid,
        organization_id: Uuid,
    ) -> Result<ReportAssignment> {
        let mut state = self.state.lock().unwrap();
        let assignment = state
            .assignments
            .iter_mut()
            .find(|a| a.report_id == report_id && a.organization_id == organization_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Report {} is not assigned to organization {}",
                    report_id, organization_id
                ))
            })?;

        assignment.viewed_at.get_or_insert_with(Utc::now);
        Ok(assignment.clone())
    }

    async fn delete(&self, report_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.reports.len();
        state.reports.retain(|r| r.id != report_id);
        if state.reports.len() == before {
            return Err(AppError::NotFound(format!("Report {} not found", report_id)));
        }
        state.assignments.retain(|a| a.report_id != report_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_report() -> NewReport {
        NewReport {
            title: "Dog".to_string(),
            description: "Dog left on a balcony".to_string(),
            street: None,
            city: None,
            postal_code: None,
            location: Coordinates::new(52.0, 21.0).unwrap(),
            image_url: None,
            reporter_name: None,
            reporter_email: None,
            reporter_phone: None,
            animal_categories: vec!["dogs".to_string()],
        }
    }

    #[tokio::test]
    async fn test_duplicate_pair_is_rejected_without_partial_write() {
        let store = InMemoryReportStore::default();
        let organization_id = Uuid::now_v7();
        let assignment = NewAssignment {
            organization_id,
            position: 1,
            distance_km: 1.0,
        };

        let result = store
            .create_with_assignments(new_report(), &[assignment.clone(), assignment])
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.report_count(), 0);
    }
}
