//! Camera registry
//!
//! ## Responsibilities
//!
//! - Register cameras
//! - List and fetch camera records
//! - Delete cameras (silent when absent)

mod repository;
mod types;

pub use repository::{CameraRepository, MySqlCameraRepository};
pub use types::{Camera, NewCamera};

use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Camera registry service
pub struct CameraService {
    repo: Arc<dyn CameraRepository>,
}

impl CameraService {
    pub fn new(repo: Arc<dyn CameraRepository>) -> Self {
        Self { repo }
    }

    /// Register a camera, returning it with its assigned identity.
    pub async fn create(&self, camera: NewCamera) -> Result<Camera> {
        let camera = self.repo.create(camera).await?;
        info!(camera_id = camera.camera_id, name = %camera.name, "Camera registered");
        Ok(camera)
    }

    pub async fn get(&self, camera_id: u64) -> Result<Option<Camera>> {
        self.repo.get(camera_id).await
    }

    /// All cameras, storage order.
    pub async fn list(&self) -> Result<Vec<Camera>> {
        self.repo.get_all().await
    }

    /// Delete a camera. Succeeds silently if it does not exist.
    pub async fn delete(&self, camera_id: u64) -> Result<()> {
        self.repo.delete(camera_id).await?;
        info!(camera_id = camera_id, "Camera deleted");
        Ok(())
    }
}
