use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SportType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub max_people: i32,
    pub created_at: DateTime<Utc>,
}

impl SportType {
    pub fn new(name: String, description: Option<String>, max_people: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            max_people,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Court {
    pub id: String,
    pub name: String,
    pub sport_type_id: String,
    pub price_per_hour: f64,
    pub max_people: i32,
    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewCourtParams {
    pub name: String,
    pub sport_type_id: String,
    pub price_per_hour: f64,
    pub max_people: i32,
    pub image_url: Option<String>,
}

impl Court {
    pub fn new(params: NewCourtParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            sport_type_id: params.sport_type_id,
            price_per_hour: params.price_per_hour,
            max_people: params.max_people,
            image_url: params.image_url,
            active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct SportCourts {
    pub sport_type: SportType,
    pub courts: Vec<Court>,
}
