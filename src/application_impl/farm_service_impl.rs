use crate::application_port::*;
use crate::domain_model::*;
use crate::session::SessionManager;

pub struct RealFarmService {
    session: SessionManager,
}

impl RealFarmService {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }
}

#[async_trait::async_trait]
impl FarmService for RealFarmService {
    async fn list_farms(&self) -> Result<Vec<Farm>, ApiError> {
        let listing: Listing<Farm> = self.session.get("/farms/").await?;
        Ok(listing.into_items())
    }

    async fn get_farm(&self, id: FarmId) -> Result<Farm, ApiError> {
        self.session.get(&format!("/farms/{}/", id)).await
    }

    async fn create_farm(&self, payload: FarmPayload) -> Result<Farm, ApiError> {
        self.session.post("/farms/", &payload).await
    }

    async fn update_farm(&self, id: FarmId, patch: FarmPatch) -> Result<Farm, ApiError> {
        self.session.patch(&format!("/farms/{}/", id), &patch).await
    }

    async fn delete_farm(&self, id: FarmId) -> Result<(), ApiError> {
        self.session.delete(&format!("/farms/{}/", id)).await
    }

    async fn list_fields(&self, farm: FarmId) -> Result<Vec<Field>, ApiError> {
        let listing: Listing<Field> = self.session.get(&format!("/farms/{}/fields/", farm)).await?;
        Ok(listing.into_items())
    }

    async fn create_field(&self, farm: FarmId, payload: FieldPayload) -> Result<Field, ApiError> {
        self.session
            .post(&format!("/farms/{}/fields/", farm), &payload)
            .await
    }

    async fn list_activities(&self, field: FieldId) -> Result<Vec<Activity>, ApiError> {
        let listing: Listing<Activity> = self
            .session
            .get(&format!("/fields/{}/activities/", field))
            .await?;
        Ok(listing.into_items())
    }

    async fn create_activity(
        &self,
        field: FieldId,
        payload: ActivityPayload,
    ) -> Result<Activity, ApiError> {
        self.session
            .post(&format!("/fields/{}/activities/", field), &payload)
            .await
    }
}
