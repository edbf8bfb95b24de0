//! Event resource. Only the `manager` field matters to authorization; the
//! rest is ordinary domain data.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: Option<String>,
    pub base_price: u32,
    /// Derived: the event has a physical venue.
    pub offline: bool,
    /// Derived: the event costs nothing to attend.
    pub free: bool,
    /// Owner reference: the account that created the event. Optional; once
    /// set it is never cleared. Compared by account identity, not by object.
    pub manager: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        name: String,
        description: String,
        location: Option<String>,
        base_price: u32,
    ) -> Self {
        let mut event = Self {
            id: Uuid::new_v4(),
            name,
            description,
            location,
            base_price,
            offline: false,
            free: false,
            manager: None,
            created_at: Utc::now(),
        };
        event.update_derived();
        event
    }

    /// Recompute the derived flags after any change to price or location.
    pub fn update_derived(&mut self) {
        self.free = self.base_price == 0;
        self.offline = self
            .location
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_flags() {
        let event = Event::new("meetup".to_string(), "desc".to_string(), None, 0);
        assert!(event.free);
        assert!(!event.offline);

        let event = Event::new(
            "conf".to_string(),
            "desc".to_string(),
            Some("Seoul".to_string()),
            100,
        );
        assert!(!event.free);
        assert!(event.offline);
    }

    #[test]
    fn test_new_event_has_no_owner() {
        let event = Event::new("meetup".to_string(), "desc".to_string(), None, 0);
        assert!(event.manager.is_none());
    }
}
