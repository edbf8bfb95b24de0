pub mod auth;
pub mod events;

pub use auth::{TokenRequest, TokenResponse};
pub use events::{EventListResponse, EventRequest, EventResponse, PageQuery};
