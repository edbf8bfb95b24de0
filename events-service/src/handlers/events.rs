//! Events resource endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    dtos::{EventListResponse, EventRequest, EventResponse, PageQuery},
    error::AppError,
    middleware::MaybeAuth,
    models::Event,
    services::{authorize, check_owner, Operation},
    AppState,
};

const MAX_PAGE_SIZE: usize = 100;
const DEFAULT_PAGE_SIZE: usize = 20;

/// List events (public)
#[utoipa::path(
    get,
    path = "/api/events",
    params(PageQuery),
    responses(
        (status = 200, description = "Event page", body = EventListResponse)
    ),
    tag = "Events"
)]
pub async fn query_events(
    State(state): State<AppState>,
    MaybeAuth(ctx): MaybeAuth,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(Operation::QueryEvents, ctx.as_ref())?;

    let offset = page.offset.unwrap_or(0);
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let (events, total) = state.events.list(offset, limit);

    Ok(Json(EventListResponse {
        events: events.into_iter().map(EventResponse::from).collect(),
        total,
        offset,
        limit,
    }))
}

/// Fetch a single event (public)
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "The event", body = EventResponse),
        (status = 404, description = "No such event", body = ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    MaybeAuth(ctx): MaybeAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(Operation::GetEvent, ctx.as_ref())?;

    let event = state
        .events
        .get(&id)
        .ok_or_else(|| event_not_found(&id))?;
    Ok(Json(EventResponse::from(event)))
}

/// Create an event; the caller becomes its manager
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient scope", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    MaybeAuth(ctx): MaybeAuth,
    Json(req): Json<EventRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(Operation::CreateEvent, ctx.as_ref())?;
    let ctx = ctx.ok_or_else(missing_context)?;

    let mut event = Event::new(req.name, req.description, req.location, req.base_price);
    event.manager = Some(ctx.principal.email.clone());
    let event = state.events.insert(event);

    tracing::info!(event_id = %event.id, manager = %ctx.principal.email, "Event created");
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// Update an event; only its manager may, once one is recorded
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the event's manager", body = ErrorResponse),
        (status = 404, description = "No such event", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    MaybeAuth(ctx): MaybeAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<EventRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(Operation::UpdateEvent, ctx.as_ref())?;
    let ctx = ctx.ok_or_else(missing_context)?;

    // Ownership gate before any mutation; owner read at check time
    let event = state
        .events
        .get(&id)
        .ok_or_else(|| event_not_found(&id))?;
    check_owner(event.manager.as_deref(), &ctx.principal)?;

    let updated = state
        .events
        .update_with(&id, |event| {
            event.name = req.name;
            event.description = req.description;
            event.location = req.location;
            event.base_price = req.base_price;
            event.update_derived();
            // Updating an unowned event claims it; once set, never cleared
            if event.manager.is_none() {
                event.manager = Some(ctx.principal.email.clone());
            }
        })
        .ok_or_else(|| event_not_found(&id))?;

    Ok(Json(EventResponse::from(updated)))
}

fn event_not_found(id: &Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Event not found: {}", id))
}

// The route gate only passes mutations with a resolved context; reaching
// this means the gate and the extractor disagreed.
fn missing_context() -> AppError {
    AppError::Internal(anyhow::anyhow!(
        "Authenticated context missing after route gate"
    ))
}
