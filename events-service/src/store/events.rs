//! In-memory event store (resource collaborator).

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Event;

#[derive(Clone, Default)]
pub struct EventStore {
    events: Arc<DashMap<Uuid, Event>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, event: Event) -> Event {
        self.events.insert(event.id, event.clone());
        event
    }

    pub fn get(&self, id: &Uuid) -> Option<Event> {
        self.events.get(id).map(|entry| entry.clone())
    }

    /// Apply a mutation to an event under its map entry and return the
    /// updated copy. Returns None if the event no longer exists.
    pub fn update_with<F>(&self, id: &Uuid, apply: F) -> Option<Event>
    where
        F: FnOnce(&mut Event),
    {
        let mut entry = self.events.get_mut(id)?;
        apply(&mut entry);
        Some(entry.clone())
    }

    /// List events, newest first, with offset/limit paging.
    pub fn list(&self, offset: usize, limit: usize) -> (Vec<Event>, usize) {
        let mut all: Vec<Event> = self.events.iter().map(|entry| entry.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len();
        let page = all.into_iter().skip(offset).take(limit).collect();
        (page, total)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
