use crate::domain_model::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type FarmId = i64;
pub type FieldId = i64;
pub type ActivityId = i64;

// Decimal columns (areas, quantities, costs, coordinates) are kept as the
// strings the backend serializes them as.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: FarmId,
    pub owner: UserId,
    pub owner_email: String,
    pub name: String,
    pub location: String,
    pub total_area: String,
    pub soil_type: String,
    pub irrigation_type: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub established_date: Option<NaiveDate>,
    pub is_active: bool,
    pub active_field_count: u32,
    #[serde(deserialize_with = "decimal_as_string")]
    pub total_yield: String,
    pub last_activity_date: Option<NaiveDate>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub farm: FarmId,
    pub farm_name: String,
    pub field_name: String,
    pub field_number: u32,
    pub area: String,
    #[serde(default)]
    pub current_crop: Option<String>,
    #[serde(default)]
    pub crop_history: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub soil_ph: Option<String>,
    #[serde(default)]
    pub last_fertilized_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_harvest_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub is_active: bool,
    pub activity_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Planting,
    Fertilizing,
    Irrigation,
    PestControl,
    Weeding,
    Harvesting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub field: FieldId,
    pub field_name: String,
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: String,
    pub unit: String,
    pub cost: String,
    #[serde(default)]
    pub weather_conditions: serde_json::Map<String, serde_json::Value>,
    pub performed_by: Option<UserId>,
    #[serde(default)]
    pub performer_email: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmPayload {
    pub name: String,
    pub location: String,
    pub total_area: String,
    pub soil_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPayload {
    pub field_name: String,
    pub field_number: u32,
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_crop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPayload {
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_conditions: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<UserId>,
}

/// Accepts a decimal rendered either as a JSON string or as a JSON number.
fn decimal_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a decimal, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farm_accepts_numeric_total_yield() {
        let farm: Farm = serde_json::from_value(serde_json::json!({
            "id": 1,
            "owner": 7,
            "owner_email": "ada@example.com",
            "name": "North",
            "location": "Valley",
            "total_area": "12.50",
            "soil_type": "loam",
            "irrigation_type": "drip",
            "latitude": null,
            "longitude": null,
            "established_date": "2020-03-01",
            "is_active": true,
            "active_field_count": 2,
            "total_yield": 42.5,
            "last_activity_date": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(farm.total_yield, "42.5");
        assert_eq!(farm.fields, None);
    }

    #[test]
    fn activity_payload_omits_unset_fields() {
        let payload = ActivityPayload {
            activity_type: ActivityType::PestControl,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            description: None,
            quantity: Some("3.00".to_string()),
            unit: None,
            cost: None,
            weather_conditions: None,
            performed_by: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "activity_type": "pest_control",
                "date": "2024-05-01",
                "quantity": "3.00"
            })
        );
    }
}
