use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::Event;

/// Payload for creating or updating an event.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EventRequest {
    #[schema(example = "Spring REST API study")]
    pub name: String,
    #[schema(example = "Monthly study group")]
    pub description: String,
    /// Omit for an online-only event.
    #[schema(example = "Gangnam station")]
    pub location: Option<String>,
    #[schema(example = 100)]
    pub base_price: u32,
}

/// Event representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: Option<String>,
    pub base_price: u32,
    pub offline: bool,
    pub free: bool,
    /// Owner identity, absent until an owner is recorded.
    pub manager: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            location: event.location,
            base_price: event.base_price,
            offline: event.offline,
            free: event.free,
            manager: event.manager,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Items to skip.
    pub offset: Option<usize>,
    /// Page size, capped at 100.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
