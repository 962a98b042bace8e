//! Camera repository - database operations

use super::types::{Camera, NewCamera};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

/// Storage interface for cameras.
#[async_trait]
pub trait CameraRepository: Send + Sync {
    async fn create(&self, camera: NewCamera) -> Result<Camera>;
    async fn get(&self, camera_id: u64) -> Result<Option<Camera>>;
    async fn get_all(&self) -> Result<Vec<Camera>>;
    /// Remove the camera if present; no existence check is made here.
    async fn delete(&self, camera_id: u64) -> Result<()>;
}

/// Database row for cameras
#[derive(Debug, sqlx::FromRow)]
struct CameraRow {
    pub camera_id: u64,
    pub name: String,
    pub location: Option<String>,
    pub stream_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<CameraRow> for Camera {
    fn from(row: CameraRow) -> Self {
        Camera {
            camera_id: row.camera_id,
            name: row.name,
            location: row.location,
            stream_url: row.stream_url,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        }
    }
}

pub struct MySqlCameraRepository {
    pool: MySqlPool,
}

impl MySqlCameraRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CameraRepository for MySqlCameraRepository {
    async fn create(&self, camera: NewCamera) -> Result<Camera> {
        let result = sqlx::query(
            r#"
            INSERT INTO cameras (name, location, stream_url)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&camera.name)
        .bind(&camera.location)
        .bind(&camera.stream_url)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        let camera_id = result.last_insert_id();

        self.get(camera_id)
            .await?
            .ok_or_else(|| Error::Database(format!("camera {camera_id} missing after insert")))
    }

    async fn get(&self, camera_id: u64) -> Result<Option<Camera>> {
        let row: Option<CameraRow> = sqlx::query_as(
            r#"
            SELECT camera_id, name, location, stream_url, created_at
            FROM cameras
            WHERE camera_id = ?
            "#,
        )
        .bind(camera_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(Camera::from))
    }

    async fn get_all(&self) -> Result<Vec<Camera>> {
        let rows: Vec<CameraRow> = sqlx::query_as(
            r#"
            SELECT camera_id, name, location, stream_url, created_at
            FROM cameras
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Camera::from).collect())
    }

    async fn delete(&self, camera_id: u64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM cameras
            WHERE camera_id = ?
            "#,
        )
        .bind(camera_id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
