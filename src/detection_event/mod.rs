//! Detection event store
//!
//! ## Responsibilities
//!
//! - Record detection events (with nested person detections)
//! - Query events, optionally filtered by camera and time range
//! - Define the violation category map shared with the dataset exporter

mod repository;
mod types;

pub use repository::{DetectionEventRepository, MySqlDetectionEventRepository};
pub use types::{
    parse_timestamp, DetectionEvent, EventQuery, NewDetectionEvent, PersonDetection, Violation,
};

use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolve an event query against a repository.
///
/// The filter is all-or-nothing: the camera/range lookup runs only when
/// camera_id, start and end are all present; any partial filter falls
/// through to the full listing. The dataset exporter performs its own
/// selection through this same function so the two surfaces cannot drift.
pub async fn select_events(
    repo: &dyn DetectionEventRepository,
    query: &EventQuery,
) -> Result<Vec<DetectionEvent>> {
    match (query.camera_id, &query.start, &query.end) {
        (Some(camera_id), Some(start), Some(end)) => {
            let start = parse_timestamp(start)?;
            let end = parse_timestamp(end)?;
            repo.get_by_camera_and_range(camera_id, start, end).await
        }
        _ => repo.list_events().await,
    }
}

/// Detection event store service
pub struct DetectionEventService {
    repo: Arc<dyn DetectionEventRepository>,
}

impl DetectionEventService {
    pub fn new(repo: Arc<dyn DetectionEventRepository>) -> Self {
        Self { repo }
    }

    /// Record one detection event, returning the stored form.
    pub async fn add_event(&self, event: NewDetectionEvent) -> Result<DetectionEvent> {
        let stored = self.repo.create_event(event).await?;
        info!(
            event_id = stored.event_id,
            camera_id = stored.camera_id,
            persons = stored.persons.len(),
            "Detection event recorded"
        );
        Ok(stored)
    }

    /// Query events with the all-or-nothing camera/time filter.
    pub async fn query(&self, query: &EventQuery) -> Result<Vec<DetectionEvent>> {
        let events = select_events(self.repo.as_ref(), query).await?;
        debug!(count = events.len(), "Detection events queried");
        Ok(events)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{event, person, InMemoryEventRepository};
    use super::*;
    use crate::error::Error;

    fn service_with(events: Vec<DetectionEvent>) -> DetectionEventService {
        DetectionEventService::new(Arc::new(InMemoryEventRepository::with_events(events)))
    }

    #[tokio::test]
    async fn test_query_without_filters_returns_all() {
        let service = service_with(vec![
            event(1, 0, vec![person(Violation::NoHelmet)]),
            event(2, 5, vec![]),
        ]);

        let events = service.query(&EventQuery::default()).await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_filter_is_ignored_entirely() {
        let service = service_with(vec![event(1, 0, vec![]), event(2, 5, vec![])]);

        // camera_id alone must behave exactly like no filter at all
        let query = EventQuery {
            camera_id: Some(1),
            ..Default::default()
        };
        let events = service.query(&query).await.unwrap();
        assert_eq!(events.len(), 2);

        // start+end without camera_id is just as partial
        let query = EventQuery {
            camera_id: None,
            start: Some("2026-08-30T00:00:00Z".to_string()),
            end: Some("2026-08-31T00:00:00Z".to_string()),
        };
        let events = service.query(&query).await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_full_filter_scopes_camera_and_range() {
        let service = service_with(vec![
            event(1, 0, vec![]),
            event(1, 90, vec![]),
            event(2, 10, vec![]),
        ]);

        let query = EventQuery {
            camera_id: Some(1),
            start: Some("2026-08-30T09:30:00Z".to_string()),
            end: Some("2026-08-30T10:30:00Z".to_string()),
        };
        let events = service.query(&query).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].camera_id, 1);
    }

    #[tokio::test]
    async fn test_full_filter_with_malformed_timestamp_fails() {
        let service = service_with(vec![event(1, 0, vec![])]);

        let query = EventQuery {
            camera_id: Some(1),
            start: Some("last tuesday".to_string()),
            end: Some("2026-08-31T00:00:00Z".to_string()),
        };
        let err = service.query(&query).await.unwrap_err();
        assert!(matches!(err, Error::MalformedTimestamp(_)));
    }

    #[tokio::test]
    async fn test_add_event_assigns_identity() {
        let service = service_with(vec![]);
        let stored = service
            .add_event(NewDetectionEvent {
                camera_id: 7,
                captured_at: chrono::Utc::now(),
                image_url: "frames/7/latest.jpg".to_string(),
                persons: vec![person(Violation::None)],
            })
            .await
            .unwrap();
        assert_eq!(stored.event_id, 1);
        assert_eq!(stored.persons.len(), 1);
    }
}
