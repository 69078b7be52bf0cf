use crate::application_port::ApiError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait FarmService: Send + Sync {
    async fn list_farms(&self) -> Result<Vec<Farm>, ApiError>;
    async fn get_farm(&self, id: FarmId) -> Result<Farm, ApiError>;
    async fn create_farm(&self, payload: FarmPayload) -> Result<Farm, ApiError>;
    async fn update_farm(&self, id: FarmId, patch: FarmPatch) -> Result<Farm, ApiError>;
    async fn delete_farm(&self, id: FarmId) -> Result<(), ApiError>;

    async fn list_fields(&self, farm: FarmId) -> Result<Vec<Field>, ApiError>;
    async fn create_field(&self, farm: FarmId, payload: FieldPayload) -> Result<Field, ApiError>;

    async fn list_activities(&self, field: FieldId) -> Result<Vec<Activity>, ApiError>;
    async fn create_activity(
        &self,
        field: FieldId,
        payload: ActivityPayload,
    ) -> Result<Activity, ApiError>;
}
