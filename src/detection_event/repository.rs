//! Detection event repository - database operations

use super::types::{DetectionEvent, NewDetectionEvent, PersonDetection, Violation};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use sqlx::Row;

/// Storage interface for detection events.
///
/// Services and the exporter hold this as `Arc<dyn DetectionEventRepository>`
/// so storage backends can be swapped (and faked in tests).
#[async_trait]
pub trait DetectionEventRepository: Send + Sync {
    /// Persist one event with its nested person detections.
    async fn create_event(&self, event: NewDetectionEvent) -> Result<DetectionEvent>;

    /// All events, storage order.
    async fn list_events(&self) -> Result<Vec<DetectionEvent>>;

    /// Events for one camera captured within `[start, end]` inclusive.
    async fn get_by_camera_and_range(
        &self,
        camera_id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DetectionEvent>>;
}

/// Person detection as stored in the `persons` JSON column.
///
/// The violation arrives as a raw string; decoding it through
/// [`Violation::parse`] is the boundary where an unknown category value
/// surfaces as a data-integrity fault.
#[derive(Debug, Deserialize)]
struct PersonColumn {
    bbox_x: f64,
    bbox_y: f64,
    bbox_width: f64,
    bbox_height: f64,
    violation: String,
}

pub struct MySqlDetectionEventRepository {
    pool: MySqlPool,
}

impl MySqlDetectionEventRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a DetectionEvent
    fn row_to_event(&self, row: sqlx::mysql::MySqlRow) -> Result<DetectionEvent> {
        let persons_json: String = row.try_get("persons")?;
        let columns: Vec<PersonColumn> = serde_json::from_str(&persons_json)?;
        let persons = columns
            .into_iter()
            .map(|p| {
                Ok(PersonDetection {
                    bbox_x: p.bbox_x,
                    bbox_y: p.bbox_y,
                    bbox_width: p.bbox_width,
                    bbox_height: p.bbox_height,
                    violation: Violation::parse(&p.violation)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let captured_at: chrono::NaiveDateTime = row.try_get("captured_at")?;
        let created_at: chrono::NaiveDateTime = row.try_get("created_at")?;

        Ok(DetectionEvent {
            event_id: row.try_get("event_id")?,
            camera_id: row.try_get("camera_id")?,
            captured_at: DateTime::from_naive_utc_and_offset(captured_at, Utc),
            image_url: row.try_get("image_url")?,
            persons,
            created_at: DateTime::from_naive_utc_and_offset(created_at, Utc),
        })
    }
}

#[async_trait]
impl DetectionEventRepository for MySqlDetectionEventRepository {
    async fn create_event(&self, event: NewDetectionEvent) -> Result<DetectionEvent> {
        let persons_json = serde_json::to_string(&event.persons)?;

        let result = sqlx::query(
            r#"
            INSERT INTO detection_events (camera_id, captured_at, image_url, persons)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(event.camera_id)
        .bind(event.captured_at)
        .bind(&event.image_url)
        .bind(&persons_json)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        let event_id = result.last_insert_id();

        let row = sqlx::query(
            r#"
            SELECT event_id, camera_id, captured_at, image_url, persons, created_at
            FROM detection_events
            WHERE event_id = ?
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        self.row_to_event(row)
    }

    async fn list_events(&self) -> Result<Vec<DetectionEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, camera_id, captured_at, image_url, persons, created_at
            FROM detection_events
            ORDER BY event_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(|row| self.row_to_event(row)).collect()
    }

    async fn get_by_camera_and_range(
        &self,
        camera_id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DetectionEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT event_id, camera_id, captured_at, image_url, persons, created_at
            FROM detection_events
            WHERE camera_id = ? AND captured_at BETWEEN ? AND ?
            ORDER BY event_id
            "#,
        )
        .bind(camera_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(|row| self.row_to_event(row)).collect()
    }
}
