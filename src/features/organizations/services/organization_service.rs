use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::organizations::dtos::{
    OrganizationResponseDto, RegisterOrganizationDto, UpdateOrganizationSettingsDto,
};
use crate::features::organizations::models::{CreateOrganization, UpdateOrganizationSettings};
use crate::features::organizations::services::OrganizationRegistry;
use crate::modules::geocoding::{Geocoder, PostalAddress};
use crate::shared::geo::parse_location;
use crate::shared::validation::normalize_categories;

/// Service for organization registration and settings
pub struct OrganizationService {
    registry: Arc<dyn OrganizationRegistry>,
    geocoder: Arc<dyn Geocoder>,
}

impl OrganizationService {
    pub fn new(registry: Arc<dyn OrganizationRegistry>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { registry, geocoder }
    }

    /// Register an organization, geocoding its address when no coordinates are given.
    ///
    /// An address that cannot be geocoded does not block registration; the
    /// organization simply cannot receive report assignments until it has a location.
    pub async fn register(&self, dto: RegisterOrganizationDto) -> Result<OrganizationResponseDto> {
        let animal_categories = normalize_categories(&dto.animal_categories);
        if animal_categories.is_empty() {
            return Err(AppError::Validation(
                "At least one animal category is required".to_string(),
            ));
        }

        let address = PostalAddress::new(
            dto.street.clone(),
            dto.city.clone(),
            dto.postal_code.clone(),
        );

        let location = match parse_location(dto.latitude, dto.longitude)? {
            Some(location) => Some(location),
            None if address.is_empty() => None,
            None => {
                let resolved = self.geocoder.resolve(&address).await;
                if resolved.is_none() {
                    tracing::warn!(
                        "Could not geocode address for organization '{}'; registering without location",
                        dto.name
                    );
                }
                resolved
            }
        };

        let data = CreateOrganization {
            name: dto.name.trim().to_string(),
            krs: dto.krs,
            email: dto.email,
            phone: dto.phone,
            street: dto.street,
            city: dto.city,
            postal_code: dto.postal_code,
            location,
            accepts_reports: dto.accepts_reports,
            animal_categories,
        };

        let organization = self.registry.create(&data).await?;
        Ok(organization.into())
    }

    pub async fn list(&self) -> Result<Vec<OrganizationResponseDto>> {
        let organizations = self.registry.list().await?;
        Ok(organizations.into_iter().map(|o| o.into()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<OrganizationResponseDto> {
        Ok(self.registry.get_by_id(id).await?.into())
    }

    pub async fn update_settings(
        &self,
        id: Uuid,
        dto: UpdateOrganizationSettingsDto,
    ) -> Result<OrganizationResponseDto> {
        let animal_categories = match dto.animal_categories {
            Some(categories) => {
                let normalized = normalize_categories(&categories);
                if normalized.is_empty() {
                    return Err(AppError::Validation(
                        "At least one animal category is required".to_string(),
                    ));
                }
                Some(normalized)
            }
            None => None,
        };

        let data = UpdateOrganizationSettings {
            accepts_reports: dto.accepts_reports,
            animal_categories,
        };

        Ok(self.registry.update_settings(id, &data).await?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::geo::Coordinates;
    use crate::shared::test_helpers::{InMemoryOrganizations, StubGeocoder};

    fn registration(name: &str) -> RegisterOrganizationDto {
        RegisterOrganizationDto {
            name: name.to_string(),
            krs: None,
            email: None,
            phone: None,
            street: Some("Floriańska 10".to_string()),
            city: Some("Kraków".to_string()),
            postal_code: Some("31-019".to_string()),
            latitude: None,
            longitude: None,
            accepts_reports: true,
            animal_categories: vec![" Dogs ".to_string(), "cats".to_string()],
        }
    }

    fn service(geocoder: StubGeocoder) -> (OrganizationService, Arc<InMemoryOrganizations>) {
        let organizations = Arc::new(InMemoryOrganizations::default());
        let service = OrganizationService::new(organizations.clone(), Arc::new(geocoder));
        (service, organizations)
    }

    #[tokio::test]
    async fn test_register_geocodes_address() {
        let krakow = Coordinates::new(50.0647, 19.9450).unwrap();
        let (service, organizations) = service(StubGeocoder::found(krakow));

        let created = service.register(registration("Kraków Rescue")).await.unwrap();

        assert_eq!(created.location, Some(krakow));
        assert_eq!(created.animal_categories, vec!["cats", "dogs"]);
        assert_eq!(organizations.count(), 1);
    }

    #[tokio::test]
    async fn test_register_without_geocoding_match_has_no_location() {
        let (service, _) = service(StubGeocoder::not_found());

        let created = service.register(registration("Nowhere Shelter")).await.unwrap();

        assert_eq!(created.location, None);
    }

    #[tokio::test]
    async fn test_explicit_coordinates_skip_geocoder() {
        let geocoder = StubGeocoder::not_found();
        let calls = geocoder.calls();
        let (service, _) = service(geocoder);
        let mut dto = registration("Gdańsk Birds");
        dto.latitude = Some(54.3520);
        dto.longitude = Some(18.6466);

        let created = service.register(dto).await.unwrap();

        assert_eq!(created.location, Coordinates::new(54.3520, 18.6466));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_settings_rejects_blank_categories() {
        let (service, _) = service(StubGeocoder::not_found());
        let created = service.register(registration("Shelter")).await.unwrap();

        let result = service
            .update_settings(
                created.id,
                UpdateOrganizationSettingsDto {
                    accepts_reports: None,
                    animal_categories: Some(vec!["  ".to_string()]),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_settings_keeps_omitted_fields() {
        let (service, _) = service(StubGeocoder::not_found());
        let created = service.register(registration("Shelter")).await.unwrap();

        let updated = service
            .update_settings(
                created.id,
                UpdateOrganizationSettingsDto {
                    accepts_reports: Some(false),
                    animal_categories: None,
                },
            )
            .await
            .unwrap();

        assert!(!updated.accepts_reports);
        assert_eq!(updated.animal_categories, created.animal_categories);
    }
}
