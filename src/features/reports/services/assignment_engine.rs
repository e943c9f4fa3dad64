use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::AssignmentConfig;
use crate::core::error::Result;
use crate::features::organizations::models::EligibleOrganization;
use crate::features::organizations::OrganizationDirectory;
use crate::shared::geo::Coordinates;

/// An eligible organization with its distance from the report
#[derive(Debug, Clone, PartialEq)]
pub struct RankedOrganization {
    pub organization_id: Uuid,
    pub name: String,
    pub distance_km: f64,
}

/// Order candidates by distance from `origin` and keep the nearest `limit`.
///
/// Candidates without a location are dropped, duplicate ids are collapsed
/// (first occurrence wins) and equal distances are ordered by id ascending.
pub fn rank_candidates(
    origin: &Coordinates,
    candidates: Vec<EligibleOrganization>,
    limit: usize,
) -> Vec<RankedOrganization> {
    let mut seen = HashSet::new();

    let mut ranked: Vec<RankedOrganization> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.id))
        .filter_map(|candidate| {
            let location = candidate.location?;
            Some(RankedOrganization {
                organization_id: candidate.id,
                name: candidate.name,
                distance_km: origin.distance_km(&location),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.organization_id.cmp(&b.organization_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Picks the organizations to notify about a new report
pub struct ReportAssignmentEngine {
    directory: Arc<dyn OrganizationDirectory>,
    max_assignments: usize,
}

impl ReportAssignmentEngine {
    pub fn new(directory: Arc<dyn OrganizationDirectory>, config: &AssignmentConfig) -> Self {
        Self {
            directory,
            max_assignments: config.max_organizations,
        }
    }

    /// Nearest eligible organizations for a report, closest first.
    ///
    /// An empty result is a valid outcome, not an error.
    pub async fn select(
        &self,
        origin: &Coordinates,
        categories: &[String],
    ) -> Result<Vec<RankedOrganization>> {
        let candidates = self.directory.find_eligible(categories).await?;
        let candidate_count = candidates.len();

        let ranked = rank_candidates(origin, candidates, self.max_assignments);

        tracing::info!(
            "Assignment for ({:.4}, {:.4}) categories={:?}: {} eligible, {} selected",
            origin.latitude,
            origin.longitude,
            categories,
            candidate_count,
            ranked.len()
        );

        Ok(ranked)
    }
}
